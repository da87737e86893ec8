use leptos::prelude::*;
use denoise_core::api::{cache_bust, SampleEndpoints, Variant};
use denoise_core::health::Connectivity;
use denoise_core::meta::SampleMeta;
use denoise_core::page::PageConfig;
use denoise_core::zoom::ZoomWindow;

#[derive(Clone, Copy)]
pub struct AppState {
    pub config: StoredValue<PageConfig>,
    pub endpoints: StoredValue<SampleEndpoints>,

    pub model: RwSignal<String>,
    pub zoom: RwSignal<ZoomWindow>,
    pub meta: RwSignal<Option<SampleMeta>>,
    pub meta_text: RwSignal<String>,

    /// Set once the first metadata load succeeded and the noisy images are up.
    pub ready: RwSignal<bool>,
    /// A denoise request is in flight.
    pub busy: RwSignal<bool>,
    pub noisy_loading: RwSignal<bool>,
    /// A denoise succeeded and hasn't been erased since.
    pub denoised_ready: RwSignal<bool>,

    pub noisy_src: RwSignal<Option<String>>,
    pub zoom_noisy_src: RwSignal<Option<String>>,
    pub denoised_src: RwSignal<Option<String>>,
    pub zoom_denoised_src: RwSignal<Option<String>>,

    pub connectivity: RwSignal<Connectivity>,
    pub toast: RwSignal<Option<String>>,
    /// Bumped per toast so a stale hide timer leaves a newer toast alone.
    pub toast_seq: RwSignal<u64>,
}

impl AppState {
    pub fn new(config: PageConfig) -> Self {
        let endpoints = SampleEndpoints::new(&config.sample_name);
        let model = config.initial_model();
        Self {
            config: StoredValue::new(config),
            endpoints: StoredValue::new(endpoints),
            model: RwSignal::new(model),
            zoom: RwSignal::new(ZoomWindow::default()),
            meta: RwSignal::new(None),
            meta_text: RwSignal::new(String::new()),
            ready: RwSignal::new(false),
            busy: RwSignal::new(false),
            noisy_loading: RwSignal::new(false),
            denoised_ready: RwSignal::new(false),
            noisy_src: RwSignal::new(None),
            zoom_noisy_src: RwSignal::new(None),
            denoised_src: RwSignal::new(None),
            zoom_denoised_src: RwSignal::new(None),
            connectivity: RwSignal::new(Connectivity::Unknown),
            toast: RwSignal::new(None),
            toast_seq: RwSignal::new(0),
        }
    }

    /// Controls that change server-side state are locked until startup
    /// finished and while a denoise runs.
    pub fn controls_locked(&self) -> bool {
        controls_locked(self.ready.get(), self.busy.get())
    }

    fn image_urls(&self, variant: Variant, now_ms: u64) -> (String, String) {
        let zoom = self.zoom.get_untracked();
        self.endpoints.with_value(|ep| {
            (
                cache_bust(&ep.spectrogram(variant), now_ms),
                cache_bust(&ep.zoom_spectrogram(variant, &zoom), now_ms),
            )
        })
    }

    pub fn show_noisy_images(&self, now_ms: u64) {
        let (full, zoomed) = self.image_urls(Variant::Noisy, now_ms);
        self.noisy_src.set(Some(full));
        self.zoom_noisy_src.set(Some(zoomed));
    }

    pub fn show_denoised_images(&self, now_ms: u64) {
        let (full, zoomed) = self.image_urls(Variant::Denoised, now_ms);
        self.denoised_src.set(Some(full));
        self.zoom_denoised_src.set(Some(zoomed));
    }

    /// Refresh every image that has something to show. Denoised images stay
    /// empty until a denoise has produced them.
    pub fn refresh_images(&self, now_ms: u64) {
        self.show_noisy_images(now_ms);
        if self.denoised_ready.get_untracked() {
            self.show_denoised_images(now_ms);
        }
    }

    /// Move the zoom window and refresh the images for it.
    pub fn set_zoom_start(&self, start_s: f64, now_ms: u64) {
        self.zoom.set(ZoomWindow::at(start_s));
        self.refresh_images(now_ms);
    }

    /// Claim the denoise slot. Returns false when a denoise is already running.
    pub fn begin_denoise(&self) -> bool {
        if self.busy.get_untracked() {
            return false;
        }
        self.busy.set(true);
        true
    }

    pub fn end_denoise(&self) {
        self.busy.set(false);
    }

    /// The server accepted a denoise: the denoised rendition can be shown.
    pub fn mark_denoised(&self, now_ms: u64) {
        self.denoised_ready.set(true);
        self.show_denoised_images(now_ms);
    }

    pub fn clear_denoised(&self) {
        self.denoised_ready.set(false);
        self.denoised_src.set(None);
        self.zoom_denoised_src.set(None);
    }
}

pub fn controls_locked(ready: bool, busy: bool) -> bool {
    !ready || busy
}

pub fn denoise_label(busy: bool) -> &'static str {
    if busy { "Denoising\u{2026}" } else { "Denoise" }
}
