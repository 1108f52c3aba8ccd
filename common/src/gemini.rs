//! Gemini generateContent のリクエスト定義と回答の取り出し
//!
//! リクエストは snake_case 形式（`inline_data` / `mime_type`）で、
//! テキストパートを先、画像パートを後に置く。

use serde::Serialize;
use serde_json::Value;

use crate::normalizer::NormalizedPayload;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// 画像と一緒に送る固定プロンプト
pub const INSTRUCTION: &str = "Read the question from the image and give only the correct answer.";

/// Gemini APIリクエスト
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl GeminiRequest {
    /// 正規化済み画像から質問読み取りリクエストを作成
    pub fn for_payload(payload: &NormalizedPayload) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: INSTRUCTION.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: payload.mime_type().to_string(),
                            data: payload.data.clone(),
                        },
                    },
                ],
            }],
        }
    }
}

/// 回答テキストの位置（他の候補やパートの形は見ない）
pub const ANSWER_POINTER: &str = "/candidates/0/content/parts/0/text";

/// candidates[0].content.parts[0].text（空文字はなし扱い）
pub fn first_text(response: &Value) -> Option<&str> {
    response
        .pointer(ANSWER_POINTER)
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
}

/// generateContent のURLを組み立てる
///
/// # Arguments
/// * `base` - APIベースURL（末尾スラッシュ可）
/// * `model` - モデル名
/// * `api_key` - APIキー（クエリパラメータで渡す）
pub fn endpoint_url(base: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        base.trim_end_matches('/'),
        model,
        api_key
    )
}
