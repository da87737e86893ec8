pub mod app;
pub mod controls;
pub mod health_badge;
pub mod meta_box;
pub mod spectrograms;
pub mod toast;
