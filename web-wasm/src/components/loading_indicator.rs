//! 読み取り中表示

use leptos::prelude::*;
use question_reader_common::capture::LOADING_TEXT;

#[component]
pub fn LoadingIndicator(loading: Signal<bool>) -> impl IntoView {
    view! {
        <Show when=move || loading.get()>
            <p class="loading">{LOADING_TEXT}</p>
        </Show>
    }
}
