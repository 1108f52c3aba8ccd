//! キャプチャ画面の状態
//!
//! どの画面（Web / ターミナル / デスクトップ）も同じ状態遷移を使う:
//! `Idle → Loading → Idle`。処理中の再キャプチャは受け付けない。

use tracing::{debug, warn};

use crate::outcome::Outcome;

pub const CAMERA_LABEL: &str = "Open Camera";
pub const UPLOAD_LABEL: &str = "Upload Image";
pub const LOADING_TEXT: &str = "🔍 Reading question...";
pub const ANSWER_HEADING: &str = "🤖 Answer";
pub const TITLE: &str = "📸 Question Reader";

/// 端末区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceClass {
    Mobile,
    #[default]
    Desktop,
}

const MOBILE_MARKERS: &[&str] = &["android", "iphone", "ipad", "ipod"];

impl DeviceClass {
    /// User-Agent から判定（大文字小文字は無視）
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn action_label(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => CAMERA_LABEL,
            DeviceClass::Desktop => UPLOAD_LABEL,
        }
    }

    /// `<input capture>` に渡す値（背面カメラ）
    pub fn capture_hint(&self) -> Option<&'static str> {
        match self {
            DeviceClass::Mobile => Some("environment"),
            DeviceClass::Desktop => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Idle,
    Loading,
}

/// 処理中に begin が呼ばれた
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("analysis already in progress")]
pub struct Busy;

/// 回答と読み込み中フラグの組
#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    state: CaptureState,
    answer: String,
    last_outcome: Option<Outcome>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析開始。前回の回答を消して Loading に入る
    pub fn begin(&mut self) -> Result<(), Busy> {
        if self.state == CaptureState::Loading {
            warn!("capture ignored: analysis already in progress");
            return Err(Busy);
        }
        self.state = CaptureState::Loading;
        self.answer.clear();
        self.last_outcome = None;
        debug!("capture session: idle -> loading");
        Ok(())
    }

    /// 解析終了。結果の表示テキストを回答にする
    pub fn finish(&mut self, outcome: Outcome) {
        if self.state != CaptureState::Loading {
            debug!("finish called while idle");
        }
        self.answer = outcome.display_text().to_string();
        self.last_outcome = Some(outcome);
        self.state = CaptureState::Idle;
        debug!("capture session: loading -> idle");
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == CaptureState::Loading
    }

    /// 表示する回答（空なら None）
    pub fn answer(&self) -> Option<&str> {
        if self.answer.is_empty() {
            None
        } else {
            Some(&self.answer)
        }
    }

    pub fn last_outcome(&self) -> Option<&Outcome> {
        self.last_outcome.as_ref()
    }
}
