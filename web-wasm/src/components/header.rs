//! ヘッダーコンポーネント

use leptos::prelude::*;
use question_reader_common::capture::TITLE;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h2>{TITLE}</h2>
        </header>
    }
}
