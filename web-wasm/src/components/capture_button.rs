//! キャプチャボタンコンポーネント
//!
//! ボタン1つと非表示の `<input type="file">`。
//! モバイルでは背面カメラを開くよう `capture="environment"` を付ける。

use leptos::ev::{Event, MouseEvent};
use leptos::html::Input;
use leptos::prelude::*;
use question_reader_common::DeviceClass;
use web_sys::File;

#[component]
pub fn CaptureButton<F>(
    device: DeviceClass,
    enabled: Signal<bool>,
    on_file: F,
) -> impl IntoView
where
    F: Fn(File) + 'static,
{
    let input_ref = NodeRef::<Input>::new();

    if let Some(hint) = device.capture_hint() {
        Effect::new(move |_| {
            if let Some(input) = input_ref.get() {
                let _ = input.set_attribute("capture", hint);
            }
        });
    }

    let on_click = move |_: MouseEvent| {
        if !enabled.get_untracked() {
            return;
        }
        if let Some(input) = input_ref.get_untracked() {
            input.click();
        }
    };

    let on_change = move |_: Event| {
        let Some(input) = input_ref.get_untracked() else {
            return;
        };
        let file = input.files().and_then(|files| files.get(0));
        // 同じ画像を選び直しても change が発火するように
        input.set_value("");
        if let Some(file) = file {
            on_file(file);
        }
    };

    view! {
        <button
            class="capture-button"
            on:click=on_click
            prop:disabled=move || !enabled.get()
        >
            {device.action_label()}
        </button>
        <input
            node_ref=input_ref
            type="file"
            accept="image/*"
            style="display: none"
            on:change=on_change
        />
    }
}
