//! Gemini API連携（ブラウザ版）
//!
//! APIキーとモデルはビルド時の環境変数から読む:
//! `GEMINI_API_KEY`（必須）, `GEMINI_MODEL`（任意）

pub mod fetch;

use question_reader_common::{InferenceClient, InferenceConfig};

pub use fetch::{read_file_bytes, FetchTransport};

pub type WebClient = InferenceClient<FetchTransport>;

/// ビルド時設定からクライアントを作る（キーがなければ None）
pub fn build_client() -> Option<WebClient> {
    inference_config(option_env!("GEMINI_API_KEY"), option_env!("GEMINI_MODEL"))
        .map(|config| InferenceClient::new(config, FetchTransport))
}

pub fn inference_config(api_key: Option<&str>, model: Option<&str>) -> Option<InferenceConfig> {
    let api_key = api_key.map(str::trim).filter(|k| !k.is_empty())?;
    let config = InferenceConfig::new(api_key);
    Some(match model.map(str::trim).filter(|m| !m.is_empty()) {
        Some(model) => config.with_model(model),
        None => config,
    })
}
