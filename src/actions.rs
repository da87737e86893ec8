use std::future::Future;
use leptos::prelude::*;
use wasm_bindgen_futures::JsFuture;
use denoise_core::api::DenoiseRequest;
use denoise_core::health::{Connectivity, HEALTH_POLL_INTERVAL_MS};
use denoise_core::meta::{meta_text, SampleMeta};
use denoise_core::notice::{should_show_once, FlagStore, TAP_TO_ZOOM_KEY, TAP_TO_ZOOM_TIP, TOAST_DURATION_MS};
use denoise_core::zoom::{effective_duration_s, tap_to_zoom_start};
use crate::api;
use crate::browser::{self, LocalFlags};
use crate::state::AppState;

/// Run a fallible page task in the background, logging its error.
pub fn spawn_logged<F>(what: &'static str, fut: F)
where
    F: Future<Output = Result<(), String>> + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = fut.await {
            log::error!("{what} failed: {e}");
        }
    });
}

// ── Notices ───────────────────────────────────────────────────────────────────

pub fn show_toast(state: &AppState, msg: impl Into<String>) {
    state.toast_seq.update(|n| *n = n.wrapping_add(1));
    let seq = state.toast_seq.get_untracked();
    state.toast.set(Some(msg.into()));

    let st = *state;
    wasm_bindgen_futures::spawn_local(async move {
        browser::sleep_ms(TOAST_DURATION_MS).await;
        if st.toast_seq.get_untracked() == seq {
            st.toast.set(None);
        }
    });
}

pub fn show_toast_once(state: &AppState, key: &str, msg: &str) {
    let flags = LocalFlags::open();
    if should_show_once(flags.as_ref().map(|f| f as &dyn FlagStore), key) {
        show_toast(state, msg);
    }
}

// ── Images & metadata ─────────────────────────────────────────────────────────

pub fn set_noisy_images(state: &AppState) {
    state.show_noisy_images(browser::now_ms());
}

pub async fn load_meta(state: &AppState) -> Result<(), String> {
    let endpoints = state.endpoints.get_value();
    let meta = api::fetch_meta(&endpoints).await?;
    let text = meta_text(
        &meta,
        &state.model.get_untracked(),
        state.zoom.get_untracked().start_s,
    );
    state.meta_text.set(text);
    state.meta.set(Some(meta));
    Ok(())
}

// ── Server-side edits ─────────────────────────────────────────────────────────

/// Why a denoise run stopped. A failed metadata reload after an accepted
/// denoise leaves the denoised images in place.
#[derive(Debug, PartialEq)]
pub enum DenoiseError {
    Request(String),
    Reload(String),
}

impl DenoiseError {
    /// Toast text for the user, if any.
    pub fn toast(&self) -> Option<String> {
        match self {
            DenoiseError::Request(e) => Some(format!("Denoise failed: {e}")),
            DenoiseError::Reload(_) => None,
        }
    }
}

impl std::fmt::Display for DenoiseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DenoiseError::Request(e) => write!(f, "denoise request: {e}"),
            DenoiseError::Reload(e) => write!(f, "metadata reload after denoise: {e}"),
        }
    }
}

pub async fn denoise(state: &AppState) -> Result<(), String> {
    if !state.begin_denoise() {
        return Ok(());
    }
    let result = run_denoise(state).await;
    state.end_denoise();
    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            if let Some(msg) = e.toast() {
                show_toast(state, msg);
            }
            Err(e.to_string())
        }
    }
}

async fn run_denoise(state: &AppState) -> Result<(), DenoiseError> {
    let req = DenoiseRequest::new(&state.model.get_untracked(), &state.zoom.get_untracked());
    let endpoints = state.endpoints.get_value();
    let sample = state.config.with_value(|c| c.sample_name.clone());
    log::info!("Denoising {sample} with model {:?} at {:.3}s", req.model, req.zoom_start_s);
    api::request_denoise(&endpoints, &req)
        .await
        .map_err(DenoiseError::Request)?;

    state.mark_denoised(browser::now_ms());
    load_meta(state).await.map_err(DenoiseError::Reload)
}

pub async fn reset_zoom(state: &AppState) -> Result<(), String> {
    let url = state.endpoints.with_value(|ep| ep.reset_zoom());
    if let Err(e) = api::post_empty(&url).await {
        log::warn!("reset_zoom not acknowledged: {e}");
    }
    state.set_zoom_start(0.0, browser::now_ms());
    load_meta(state).await
}

pub async fn erase_edits(state: &AppState) {
    let url = state.endpoints.with_value(|ep| ep.erase_edits());
    if let Err(e) = api::post_empty(&url).await {
        log::warn!("erase_edits not acknowledged: {e}");
    }
    state.clear_denoised();
}

// ── Interaction ───────────────────────────────────────────────────────────────

/// Move the zoom window to where the long noisy spectrogram was clicked.
pub fn tap_to_zoom(state: &AppState, client_x: f64, rect_left: f64, rect_width: f64) {
    // The backend currently reports duration_ms 0, which maps over the
    // assumed 20 s; a real duration takes over once it is reported.
    let duration_s = effective_duration_s(
        state.meta.with_untracked(|m| m.as_ref().and_then(SampleMeta::duration_s)),
    );
    let start_s = tap_to_zoom_start(client_x, rect_left, rect_width, duration_s);
    state.set_zoom_start(start_s, browser::now_ms());

    let st = *state;
    spawn_logged("load_meta", async move { load_meta(&st).await });
}

pub fn play_noisy(state: &AppState) {
    let url = state.endpoints.with_value(|ep| ep.audio());
    let audio = match web_sys::HtmlAudioElement::new_with_src(&url) {
        Ok(a) => a,
        Err(e) => {
            log::error!("Failed to create audio element: {}", browser::js_err(&e));
            return;
        }
    };
    match audio.play() {
        Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::debug!("Playback rejected: {}", browser::js_err(&e));
            }
        }),
        Err(e) => log::debug!("Playback failed to start: {}", browser::js_err(&e)),
    }
}

pub fn play_denoised(_state: &AppState) {
    // The backend has no denoised audio endpoint yet.
    log::info!("Denoised playback is not available from this server");
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

pub async fn startup(state: &AppState) -> Result<(), String> {
    show_toast_once(state, TAP_TO_ZOOM_KEY, TAP_TO_ZOOM_TIP);

    state.noisy_loading.set(true);
    let result = load_meta(state).await;
    if result.is_ok() {
        set_noisy_images(state);
        state.ready.set(true);
    }
    state.noisy_loading.set(false);
    result
}

pub async fn poll_health(state: &AppState) {
    let reply_ok = match api::health().await {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Health probe failed: {e}");
            false
        }
    };
    let next = Connectivity::from_probe(reply_ok);
    let prev = state.connectivity.get_untracked();
    if prev != next {
        match next {
            Connectivity::Connected => log::info!("Backend reachable"),
            _ => log::warn!("Backend unreachable"),
        }
        state.connectivity.set(next);
    }
}

/// Probe health forever, one request at a time.
pub async fn watch_health(state: AppState) {
    loop {
        poll_health(&state).await;
        browser::sleep_ms(HEALTH_POLL_INTERVAL_MS).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failure_toasts() {
        let e = DenoiseError::Request("POST /x returned HTTP 500".into());
        assert_eq!(e.toast().as_deref(), Some("Denoise failed: POST /x returned HTTP 500"));
    }

    #[test]
    fn test_reload_failure_after_accepted_denoise_is_quiet() {
        let e = DenoiseError::Reload("GET /meta returned HTTP 502".into());
        assert_eq!(e.toast(), None);
        assert!(e.to_string().starts_with("metadata reload after denoise"));
    }
}
