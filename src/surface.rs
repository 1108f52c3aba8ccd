//! ターミナル版キャプチャ画面
//!
//! 画像パスを1つ受け取るたびに 正規化 → 問い合わせ → 回答表示 を行う。
//! 入力欄は毎回空から始まるので、同じ画像を何度でも選び直せる。

use std::path::Path;
use std::time::Duration;

use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use question_reader_common::capture::{ANSWER_HEADING, LOADING_TEXT, TITLE};
use question_reader_common::{analyze, CaptureSession, DeviceClass, InferenceClient, Outcome, Transport};
use tracing::debug;

use crate::error::{QuestionReaderError, Result};

pub struct TerminalSurface<T> {
    client: InferenceClient<T>,
    session: CaptureSession,
    device: DeviceClass,
    show_progress: bool,
}

impl<T: Transport> TerminalSurface<T> {
    /// ターミナルは常にデスクトップ扱い
    pub fn new(client: InferenceClient<T>) -> Self {
        Self {
            client,
            session: CaptureSession::new(),
            device: DeviceClass::Desktop,
            show_progress: true,
        }
    }

    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn action_label(&self) -> &'static str {
        self.device.action_label()
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// 選択された画像を解析する
    ///
    /// 画像でないファイルは選択前に弾く（`image/*` 相当）。
    /// 判定は拡張子ではなく先頭バイトで行う。
    /// 解析中に呼ばれた場合は何もせず `Ok(None)`。
    pub async fn capture_file(&mut self, path: &Path) -> Result<Option<Outcome>> {
        if !path.is_file() {
            return Err(QuestionReaderError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;
        if image::guess_format(&bytes).is_err() {
            return Err(QuestionReaderError::NotAnImage(path.display().to_string()));
        }

        if self.session.begin().is_err() {
            return Ok(None);
        }
        debug!(path = %path.display(), bytes = bytes.len(), "image selected");

        let spinner = self.show_progress.then(loading_spinner);
        let outcome = analyze(&self.client, &bytes).await;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        self.session.finish(outcome.clone());
        Ok(Some(outcome))
    }

    /// 対話ループ（空入力か `q` で終了）
    pub async fn run(&mut self) -> Result<()> {
        println!("{}\n", TITLE);

        loop {
            let input = Input::<String>::new()
                .with_prompt(format!("{} (画像パス / 空で終了)", self.action_label()))
                .allow_empty(true)
                .interact_text()
                .map_err(|e| QuestionReaderError::Dialog(e.to_string()))?;

            let Some(path) = parse_selection(&input) else {
                break;
            };

            match self.capture_file(Path::new(path)).await {
                Ok(Some(_)) => {
                    if let Some(answer) = self.session.answer() {
                        println!("{}", render_answer(answer));
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("{}", e),
            }
        }

        Ok(())
    }
}

fn loading_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(LOADING_TEXT);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// 入力をパスとして解釈（ドラッグ&ドロップ時の引用符は外す）
pub fn parse_selection(input: &str) -> Option<&str> {
    let trimmed = input.trim().trim_matches(|c: char| c == '"' || c == '\'');
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("q") {
        None
    } else {
        Some(trimmed)
    }
}

pub fn render_answer(answer: &str) -> String {
    format!("\n{}\n{}\n", ANSWER_HEADING, answer)
}
