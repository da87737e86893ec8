use leptos::prelude::*;
use crate::actions;
use crate::state::{denoise_label, AppState};

#[component]
pub fn Controls() -> impl IntoView {
    let state = expect_context::<AppState>();
    let locked = move || state.controls_locked();

    let models = state.config.with_value(|c| c.models.clone());
    let initial = state.model.get_untracked();

    let on_model_change = move |ev: web_sys::Event| {
        state.model.set(event_target_value(&ev));
        let st = state;
        actions::spawn_logged("load_meta", async move { actions::load_meta(&st).await });
    };

    view! {
        <div class="controls">
            <div class="setting-row">
                <span class="setting-label">"Model"</span>
                <select
                    id="modelSelect"
                    class="setting-select"
                    disabled=locked
                    on:change=on_model_change
                >
                    {if models.is_empty() {
                        view! { <option value="" selected=true>"(no models)"</option> }.into_any()
                    } else {
                        models.into_iter().map(|m| {
                            let selected = m == initial;
                            let value = m.clone();
                            view! { <option value=value selected=selected>{m}</option> }
                        }).collect_view().into_any()
                    }}
                </select>
            </div>

            <div class="button-row">
                <button
                    id="btnDenoise"
                    class="primary-btn"
                    disabled=locked
                    on:click=move |_| {
                        let st = state;
                        actions::spawn_logged("denoise", async move { actions::denoise(&st).await });
                    }
                >{move || denoise_label(state.busy.get())}</button>
                <button
                    id="btnResetZoom"
                    disabled=locked
                    on:click=move |_| {
                        let st = state;
                        actions::spawn_logged("reset_zoom", async move { actions::reset_zoom(&st).await });
                    }
                    title="Zoom back to the start of the sample"
                >"Reset zoom"</button>
                <button
                    id="btnErase"
                    disabled=locked
                    on:click=move |_| {
                        let st = state;
                        wasm_bindgen_futures::spawn_local(async move {
                            actions::erase_edits(&st).await;
                        });
                    }
                    title="Discard the denoised result"
                >"Erase"</button>
            </div>

            <div class="button-row">
                <button
                    id="btnPlayNoisy"
                    on:click=move |_| actions::play_noisy(&state)
                >"Play noisy"</button>
                <button
                    id="btnPlayDenoised"
                    disabled=move || !state.denoised_ready.get()
                    on:click=move |_| actions::play_denoised(&state)
                >"Play denoised"</button>
            </div>
        </div>
    }
}
