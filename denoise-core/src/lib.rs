pub mod api;
pub mod health;
pub mod meta;
pub mod notice;
pub mod page;
pub mod zoom;
