//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use question_reader_common::{analyze, CaptureSession, Outcome};
use wasm_bindgen::JsValue;
use web_sys::File;

use crate::api::{build_client, read_file_bytes};
use crate::components::{
    answer_panel::AnswerPanel,
    capture_button::CaptureButton,
    header::Header,
    loading_indicator::LoadingIndicator,
};
use crate::device::detect_device_class;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // 端末区分とAPI設定は起動時に一度だけ決める
    let device = detect_device_class();
    let client = build_client();
    let has_client = client.is_some();

    let session = RwSignal::new(CaptureSession::new());
    let loading = Signal::derive(move || session.with(CaptureSession::is_loading));
    let answer = Signal::derive(move || session.with(|s| s.answer().map(str::to_string)));
    let enabled = Signal::derive(move || has_client && !loading.get());

    // 画像選択ハンドラ
    let on_file = move |file: File| {
        let Some(client) = client.clone() else {
            return;
        };
        // 解析中の再選択は無視
        if !matches!(session.try_update(CaptureSession::begin), Some(Ok(()))) {
            return;
        }

        spawn_local(async move {
            let outcome = match read_file_bytes(&file).await {
                Ok(bytes) => analyze(&client, &bytes).await,
                Err(e) => Outcome::from(e),
            };
            log_outcome(&outcome);
            session.update(|s| s.finish(outcome));
        });
    };

    view! {
        <div class="container">
            <Header />

            <Show when=move || !has_client>
                <p class="notice">"GEMINI_API_KEY was not set when this app was built."</p>
            </Show>

            <CaptureButton device=device enabled=enabled on_file=on_file />

            <LoadingIndicator loading=loading />

            <AnswerPanel answer=answer />
        </div>
    }
}

/// 失敗の詳細はブラウザのコンソールにだけ出す
fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::DecodeError(detail) | Outcome::TransportError(detail) => {
            web_sys::console::error_1(&JsValue::from_str(&format!("{}: {}", outcome.kind(), detail)));
        }
        Outcome::Empty => {
            web_sys::console::warn_1(&JsValue::from_str("response contained no answer text"));
        }
        Outcome::Answer(_) => {}
    }
}
