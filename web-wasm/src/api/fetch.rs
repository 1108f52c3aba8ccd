//! ブラウザの fetch による Transport 実装

use async_trait::async_trait;
use question_reader_common::{Error, HttpResponse, Result, Transport};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Clone, Copy, Debug, Default)]
pub struct FetchTransport;

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse> {
        post(url, &body)
            .await
            .map_err(|e| Error::Transport(js_error_message(&e)))
    }
}

async fn post(url: &str, body: &str) -> std::result::Result<HttpResponse, JsValue> {
    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(body));

    let request = Request::new_with_str_and_init(url, &opts)?;
    request.headers().set("Content-Type", "application/json")?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value.dyn_into()?;

    let text = JsFuture::from(resp.text()?).await?;

    Ok(HttpResponse {
        status: resp.status(),
        body: text.as_string().unwrap_or_default(),
    })
}

/// JSの例外をメッセージに変換
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

/// ファイル内容をバイト列で読む
pub async fn read_file_bytes(file: &web_sys::File) -> Result<Vec<u8>> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| Error::Decode(js_error_message(&e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
