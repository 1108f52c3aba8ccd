use std::path::PathBuf;

use question_reader_common::{CaptureSession, DeviceClass, Outcome};

/// 画面の状態（回答と読み込み中フラグは CaptureSession が持つ）
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub session: CaptureSession,
    pub device: DeviceClass,
    pub current_file: Option<PathBuf>,
}

impl AppState {
    /// 画像選択時。解析中なら false
    pub fn start(&mut self, path: PathBuf) -> bool {
        if self.session.begin().is_err() {
            return false;
        }
        self.current_file = Some(path);
        true
    }

    /// 解析完了。選択欄は空に戻す
    pub fn complete(&mut self, outcome: Outcome) {
        self.session.finish(outcome);
        self.current_file = None;
    }

    pub fn can_capture(&self) -> bool {
        !self.session.is_loading()
    }
}
