use leptos::prelude::*;
use crate::state::AppState;

#[component]
pub fn HealthBadge() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <span
            id="connBadge"
            class=move || state.connectivity.get().badge_class()
        >
            {move || state.connectivity.get().label()}
        </span>
    }
}
