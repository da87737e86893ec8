use leptos::prelude::*;
use crate::state::AppState;

#[component]
pub fn Toast() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div
            id="toast"
            class=move || if state.toast.get().is_some() { "toast" } else { "toast hidden" }
            on:click=move |_| state.toast.set(None)
        >
            {move || state.toast.get().unwrap_or_default()}
        </div>
    }
}
