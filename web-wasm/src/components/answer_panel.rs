//! 回答表示コンポーネント

use leptos::prelude::*;
use question_reader_common::capture::ANSWER_HEADING;

/// 回答が空のときは何も表示しない
#[component]
pub fn AnswerPanel(answer: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || answer.with(Option::is_some)>
            <div class="answer">
                <h3>{ANSWER_HEADING}</h3>
                <pre class="answer-text">{move || answer.get().unwrap_or_default()}</pre>
            </div>
        </Show>
    }
}
