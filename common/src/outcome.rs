//! 解析結果（1回のキャプチャにつき1つ）

use serde::{Deserialize, Serialize};

/// 回答が得られなかったときの表示
pub const NO_ANSWER_TEXT: &str = "No answer found";

/// 処理に失敗したときの表示
pub const ERROR_TEXT: &str = "❌ Error processing image";

/// キャプチャ1回分の結果
///
/// 利用者向けの表示は `display_text` に集約し、
/// 失敗の種類は内部で区別できるようにしておく。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    /// モデルが回答を返した
    Answer(String),
    /// レスポンスに回答テキストがなかった
    Empty,
    /// 画像を読めなかった
    DecodeError(String),
    /// 通信失敗、またはJSONでないレスポンス
    TransportError(String),
}

impl Outcome {
    pub fn display_text(&self) -> &str {
        match self {
            Outcome::Answer(text) => text,
            Outcome::Empty => NO_ANSWER_TEXT,
            Outcome::DecodeError(_) | Outcome::TransportError(_) => ERROR_TEXT,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::DecodeError(_) | Outcome::TransportError(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Answer(_) => "answer",
            Outcome::Empty => "empty",
            Outcome::DecodeError(_) => "decode_error",
            Outcome::TransportError(_) => "transport_error",
        }
    }
}
