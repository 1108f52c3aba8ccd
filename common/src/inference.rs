//! 推論クライアント
//!
//! 正規化済み画像を Gemini に1回だけ送り、回答テキストを取り出す。
//! HTTPの実体は `Transport` で差し替える（CLIは reqwest、Webは fetch）。

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::gemini::{endpoint_url, first_text, GeminiRequest, DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::normalizer::{self, NormalizedPayload};
use crate::outcome::Outcome;

/// HTTPレスポンス（ステータスと本文のみ）
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// JSONをPOSTする通信層
#[async_trait(?Send)]
pub trait Transport {
    async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse>;
}

/// 推論設定（起動時に一度だけ作る）
#[derive(Clone)]
pub struct InferenceConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl InferenceConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn url(&self) -> String {
        endpoint_url(&self.api_base, &self.model, &self.api_key)
    }
}

// APIキーはログに出さない
impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish()
    }
}

#[derive(Clone)]
pub struct InferenceClient<T> {
    config: InferenceConfig,
    transport: T,
}

impl<T: Transport> InferenceClient<T> {
    pub fn new(config: InferenceConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// 画像1枚について質問を読み取らせる
    ///
    /// リトライはしない。通信エラーは `Outcome::TransportError` に畳み込む。
    pub async fn ask(&self, payload: &NormalizedPayload) -> Outcome {
        match self.request(payload).await {
            Ok(Some(text)) => Outcome::Answer(text),
            Ok(None) => Outcome::Empty,
            Err(e) => {
                warn!(error = %e, "inference request failed");
                Outcome::TransportError(e.to_string())
            }
        }
    }

    async fn request(&self, payload: &NormalizedPayload) -> Result<Option<String>> {
        let body = serde_json::to_string(&GeminiRequest::for_payload(payload))?;

        info!(model = %self.config.model, body_bytes = body.len(), "sending generateContent request");
        let response = self.transport.post_json(&self.config.url(), body).await?;

        if !(200..300).contains(&response.status) {
            warn!(status = response.status, "generateContent returned non-success status");
        }

        extract_answer(&response.body)
    }
}

/// レスポンス本文から回答を取り出す
///
/// * JSONでない → `Err`
/// * 想定外の形 / 回答なし → `Ok(None)`
pub fn extract_answer(body: &str) -> Result<Option<String>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let answer = first_text(&value).map(str::to_string);
    if answer.is_none() {
        debug!("response has no text at candidates[0].content.parts[0]");
    }
    Ok(answer)
}

/// 画像バイト列を正規化して問い合わせる
///
/// 画像を読めなかった場合はリクエストを送らずに `Outcome::DecodeError` を返す。
pub async fn analyze<T: Transport>(client: &InferenceClient<T>, bytes: &[u8]) -> Outcome {
    let payload = match normalizer::normalize(bytes) {
        Ok(payload) => payload,
        Err(e) => {
            warn!(error = %e, "image normalization failed");
            return e.into();
        }
    };

    let outcome = client.ask(&payload).await;
    info!(outcome = outcome.kind(), "analysis finished");
    outcome
}

impl From<Error> for Outcome {
    fn from(error: Error) -> Self {
        match error {
            Error::Decode(e) | Error::Encode(e) => Outcome::DecodeError(e),
            other => Outcome::TransportError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// 決まったレスポンスを返し、送信内容を記録する
    struct FakeTransport {
        response: std::result::Result<HttpResponse, String>,
        sent: RefCell<Vec<(String, String)>>,
    }

    impl FakeTransport {
        fn ok(body: &str) -> Self {
            Self {
                response: Ok(HttpResponse { status: 200, body: body.to_string() }),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn status(status: u16, body: &str) -> Self {
            Self {
                response: Ok(HttpResponse { status, body: body.to_string() }),
                sent: RefCell::new(Vec::new()),
            }
        }

        fn failing(message: &str) -> Self {
            Self {
                response: Err(message.to_string()),
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl Transport for FakeTransport {
        async fn post_json(&self, url: &str, body: String) -> Result<HttpResponse> {
            self.sent.borrow_mut().push((url.to_string(), body));
            self.response.clone().map_err(Error::Transport)
        }
    }

    fn payload() -> NormalizedPayload {
        NormalizedPayload {
            data: "AAAA".to_string(),
            width: 1,
            height: 1,
            source_width: 1,
            source_height: 1,
        }
    }

    fn client(transport: FakeTransport) -> InferenceClient<FakeTransport> {
        InferenceClient::new(InferenceConfig::new("secret-key").with_model("test-model"), transport)
    }

    #[tokio::test]
    async fn test_ask_answer() {
        let client = client(FakeTransport::ok(
            r#"{"candidates":[{"content":{"parts":[{"text":"42"}]}}]}"#,
        ));
        let outcome = client.ask(&payload()).await;
        assert_eq!(outcome, Outcome::Answer("42".into()));
        assert_eq!(outcome.display_text(), "42");
    }

    #[tokio::test]
    async fn test_ask_empty_object() {
        let client = client(FakeTransport::ok("{}"));
        let outcome = client.ask(&payload()).await;
        assert_eq!(outcome, Outcome::Empty);
        assert_eq!(outcome.display_text(), "No answer found");
    }

    #[tokio::test]
    async fn test_ask_transport_failure() {
        let client = client(FakeTransport::failing("connection reset"));
        let outcome = client.ask(&payload()).await;
        assert!(matches!(outcome, Outcome::TransportError(ref e) if e.contains("connection reset")));
        assert_eq!(outcome.display_text(), "❌ Error processing image");
    }

    #[tokio::test]
    async fn test_ask_non_json_body() {
        let client = client(FakeTransport::ok("<html>502 Bad Gateway</html>"));
        let outcome = client.ask(&payload()).await;
        assert!(matches!(outcome, Outcome::TransportError(_)));
    }

    #[tokio::test]
    async fn test_ask_error_status_with_json_body_is_empty() {
        let client = client(FakeTransport::status(
            400,
            r#"{"error":{"code":400,"message":"API key not valid"}}"#,
        ));
        assert_eq!(client.ask(&payload()).await, Outcome::Empty);
    }

    #[tokio::test]
    async fn test_ask_sends_one_request_with_key_and_model() {
        let client = client(FakeTransport::ok("{}"));
        client.ask(&payload()).await;

        let sent = client.transport.sent.borrow();
        assert_eq!(sent.len(), 1);
        let (url, body) = &sent[0];
        assert!(url.ends_with("/models/test-model:generateContent?key=secret-key"));

        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["contents"][0]["parts"][1]["inline_data"]["data"], "AAAA");
    }

    #[tokio::test]
    async fn test_analyze_decode_error_skips_request() {
        let client = client(FakeTransport::ok("{}"));
        let outcome = analyze(&client, b"not an image").await;
        assert!(matches!(outcome, Outcome::DecodeError(_)));
        assert!(client.transport.sent.borrow().is_empty());
    }

    #[test]
    fn test_extract_answer_shapes() {
        assert_eq!(
            extract_answer(r#"{"candidates":[{"content":{"parts":[{"text":"B"}]}}]}"#).unwrap(),
            Some("B".to_string())
        );
        assert_eq!(
            extract_answer(r#"{"candidates":[{"content":{"parts":[{"text":"42"},{"text":7}]}}]}"#).unwrap(),
            Some("42".to_string())
        );
        assert_eq!(
            extract_answer(r#"{"candidates":[{"content":{"parts":[{"text":"42"}]}},null]}"#).unwrap(),
            Some("42".to_string())
        );
        assert_eq!(extract_answer(r#"{"candidates":"oops"}"#).unwrap(), None);
        assert_eq!(extract_answer("[]").unwrap(), None);
        assert_eq!(extract_answer("null").unwrap(), None);
        assert!(extract_answer("").is_err());
    }

    #[test]
    fn test_config_debug_redacts_key() {
        let config = InferenceConfig::new("super-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains(DEFAULT_MODEL));
    }

    #[test]
    fn test_error_into_outcome() {
        let outcome: Outcome = Error::Decode("bad".into()).into();
        assert_eq!(outcome, Outcome::DecodeError("bad".into()));
        let outcome: Outcome = Error::Transport("down".into()).into();
        assert!(matches!(outcome, Outcome::TransportError(_)));
    }
}
