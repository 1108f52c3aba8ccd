//! reqwest による Transport 実装

use async_trait::async_trait;
use question_reader_common::{Error, HttpResponse, Transport};

use crate::error::{QuestionReaderError, Result};

/// タイムアウトは設定しない（reqwestの既定のまま）
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("question-reader/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| QuestionReaderError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: String) -> question_reader_common::Result<HttpResponse> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::Transport(describe(e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(describe(e)))?;

        Ok(HttpResponse { status, body })
    }
}

// reqwest のエラー表示はURL（APIキー入り）を含むので外す
fn describe(error: reqwest::Error) -> String {
    error.without_url().to_string()
}
