use leptos::prelude::*;
use crate::actions;
use crate::state::AppState;

fn spinner_class(visible: bool) -> &'static str {
    if visible { "spinner" } else { "spinner hidden" }
}

#[component]
pub fn SpectrogramPanels() -> impl IntoView {
    let state = expect_context::<AppState>();
    let noisy_ref = NodeRef::<leptos::html::Img>::new();

    // Tap on the long noisy spectrogram picks the zoom window
    let on_noisy_click = move |ev: web_sys::MouseEvent| {
        if !state.ready.get_untracked() {
            return;
        }
        let Some(img) = noisy_ref.get_untracked() else { return };
        let rect = img.get_bounding_client_rect();
        actions::tap_to_zoom(&state, ev.client_x() as f64, rect.left(), rect.width());
    };

    view! {
        <div class="spectrograms">
            <div class="panel">
                <div class="panel-title">"Noisy"</div>
                <div class="panel-body">
                    <img
                        id="imgNoisy"
                        class="spectrogram-long"
                        node_ref=noisy_ref
                        src=move || state.noisy_src.get()
                        on:click=on_noisy_click
                        title="Tap to select a 1s window"
                    />
                    <div id="noisySpinner" class=move || spinner_class(state.noisy_loading.get())></div>
                </div>
            </div>

            <div class="panel">
                <div class="panel-title">"Denoised"</div>
                <div class="panel-body">
                    <img
                        id="imgDenoised"
                        class=move || if state.denoised_ready.get() {
                            "spectrogram-long"
                        } else {
                            "spectrogram-long placeholder"
                        }
                        src=move || state.denoised_src.get()
                    />
                    <div
                        id="denoisedPlaceholder"
                        class=move || if state.denoised_ready.get() { "placeholder-text hidden" } else { "placeholder-text" }
                    >"Press Denoise to compute the cleaned spectrogram"</div>
                    <div id="denoisedSpinner" class=move || spinner_class(state.busy.get())></div>
                </div>
            </div>

            <div class="zoom-row">
                <div class="panel">
                    <div class="panel-title">
                        {move || {
                            let w = state.zoom.get();
                            format!("Noisy {:.2}s \u{2013} {:.2}s", w.start_s, w.end_s())
                        }}
                    </div>
                    <img id="imgZoomNoisy" class="spectrogram-zoom" src=move || state.zoom_noisy_src.get() />
                </div>
                <div class="panel">
                    <div class="panel-title">"Denoised (zoom)"</div>
                    <img id="imgZoomDenoised" class="spectrogram-zoom" src=move || state.zoom_denoised_src.get() />
                </div>
            </div>
        </div>
    }
}
