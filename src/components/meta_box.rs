use leptos::prelude::*;
use crate::state::AppState;

#[component]
pub fn MetaBox() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <pre id="metaBox" class="meta-box">{move || state.meta_text.get()}</pre>
    }
}
