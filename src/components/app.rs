use leptos::prelude::*;
use crate::actions;
use crate::browser;
use crate::components::controls::Controls;
use crate::components::health_badge::HealthBadge;
use crate::components::meta_box::MetaBox;
use crate::components::spectrograms::SpectrogramPanels;
use crate::components::toast::Toast;
use crate::state::AppState;

#[component]
pub fn App() -> impl IntoView {
    match browser::read_page_config() {
        Ok(config) => {
            let state = AppState::new(config);
            provide_context(state);

            actions::spawn_logged("startup", async move { actions::startup(&state).await });
            wasm_bindgen_futures::spawn_local(actions::watch_health(state));

            view! { <DemoPage /> }.into_any()
        }
        Err(e) => {
            log::error!("Cannot start demo page: {e}");
            view! {
                <div class="app">
                    <div class="empty-state">{format!("Demo unavailable: {e}")}</div>
                </div>
            }.into_any()
        }
    }
}

#[component]
fn DemoPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let sample = state.config.with_value(|c| c.sample_name.clone());

    view! {
        <div class="app">
            <div class="toolbar">
                <span class="toolbar-brand">"Denoise demo"</span>
                <span class="toolbar-sample">{sample}</span>
                <div style="flex: 1;"></div>
                <HealthBadge />
            </div>
            <div class="main">
                <SpectrogramPanels />
                <div class="side">
                    <Controls />
                    <MetaBox />
                </div>
            </div>
            <Toast />
        </div>
    }
}
