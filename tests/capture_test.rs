//! キャプチャ処理テスト
//!
//! 画像選択 → 正規化 → 問い合わせ → 回答表示 の一連の流れを
//! 偽の Transport で検証

use async_trait::async_trait;
use question_reader::error::QuestionReaderError;
use question_reader::surface::TerminalSurface;
use question_reader_common::{
    CaptureState, Error, HttpResponse, InferenceClient, InferenceConfig, Outcome, Transport,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::{tempdir, TempDir};

/// 送信内容を記録して決まったレスポンスを返す
#[derive(Clone)]
struct RecordingTransport {
    reply: Result<String, String>,
    bodies: Rc<RefCell<Vec<String>>>,
}

impl RecordingTransport {
    fn replying(body: &str) -> Self {
        Self {
            reply: Ok(body.to_string()),
            bodies: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            bodies: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn request_count(&self) -> usize {
        self.bodies.borrow().len()
    }
}

#[async_trait(?Send)]
impl Transport for RecordingTransport {
    async fn post_json(&self, _url: &str, body: String) -> question_reader_common::Result<HttpResponse> {
        self.bodies.borrow_mut().push(body);
        match &self.reply {
            Ok(body) => Ok(HttpResponse { status: 200, body: body.clone() }),
            Err(message) => Err(Error::Transport(message.clone())),
        }
    }
}

fn surface(transport: RecordingTransport) -> TerminalSurface<RecordingTransport> {
    let client = InferenceClient::new(InferenceConfig::new("test-key"), transport);
    TerminalSurface::new(client).without_progress()
}

fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.path().join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb([240, 240, 240]))
        .save(&path)
        .expect("PNG保存失敗");
    path
}

const ANSWER_42: &str = r#"{"candidates":[{"content":{"parts":[{"text":"42"}]}}]}"#;

/// 回答ありのレスポンス
#[tokio::test]
async fn test_capture_shows_answer() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = write_png(&dir, "question.png", 320, 200);

    let transport = RecordingTransport::replying(ANSWER_42);
    let mut surface = surface(transport.clone());

    let outcome = surface.capture_file(&image).await.unwrap();
    assert_eq!(outcome, Some(Outcome::Answer("42".into())));
    assert_eq!(surface.session().answer(), Some("42"));
    assert_eq!(surface.session().state(), CaptureState::Idle);
    assert_eq!(transport.request_count(), 1);
}

/// candidatesなし
#[tokio::test]
async fn test_capture_empty_response() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = write_png(&dir, "blank.png", 16, 16);

    let mut surface = surface(RecordingTransport::replying("{}"));
    surface.capture_file(&image).await.unwrap();

    assert_eq!(surface.session().answer(), Some("No answer found"));
}

/// 通信失敗でもローディングは解除される
#[tokio::test]
async fn test_capture_transport_failure() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = write_png(&dir, "question.png", 16, 16);

    let mut surface = surface(RecordingTransport::failing("network unreachable"));
    let outcome = surface.capture_file(&image).await.unwrap().unwrap();

    assert!(matches!(outcome, Outcome::TransportError(_)));
    assert!(!surface.session().is_loading());
    assert_eq!(surface.session().answer(), Some("❌ Error processing image"));
}

/// 同じ画像を選び直しても再解析される
#[tokio::test]
async fn test_same_file_can_be_reselected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = write_png(&dir, "question.png", 16, 16);

    let transport = RecordingTransport::replying(ANSWER_42);
    let mut surface = surface(transport.clone());

    surface.capture_file(&image).await.unwrap();
    surface.capture_file(&image).await.unwrap();

    assert_eq!(transport.request_count(), 2);
}

/// 大きい画像は縮小されたJPEGとして送られる
#[tokio::test]
async fn test_large_image_is_sent_normalized() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = write_png(&dir, "large.png", 2048, 1024);

    let transport = RecordingTransport::replying(ANSWER_42);
    let mut surface = surface(transport.clone());
    surface.capture_file(&image).await.unwrap();

    let bodies = transport.bodies.borrow();
    let body: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["text"], question_reader_common::INSTRUCTION);
    assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");

    use base64::Engine as _;
    let data = parts[1]["inline_data"]["data"].as_str().unwrap();
    let jpeg = base64::engine::general_purpose::STANDARD.decode(data).unwrap();
    let sent = image::load_from_memory_with_format(&jpeg, image::ImageFormat::Jpeg).unwrap();
    assert_eq!((sent.width(), sent.height()), (1024, 512));
}

/// 壊れた画像はリクエストを送らずにエラー表示
#[tokio::test]
async fn test_corrupt_image_is_decode_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let image = dir.path().join("broken.jpg");
    std::fs::write(&image, b"\xFF\xD8\xFF\xE0 truncated").unwrap();

    let transport = RecordingTransport::replying(ANSWER_42);
    let mut surface = surface(transport.clone());
    let outcome = surface.capture_file(&image).await.unwrap().unwrap();

    assert!(matches!(outcome, Outcome::DecodeError(_)));
    assert_eq!(surface.session().answer(), Some("❌ Error processing image"));
    assert_eq!(transport.request_count(), 0);
}

/// 拡張子がなくても中身が画像なら解析する
#[tokio::test]
async fn test_image_detected_by_content_not_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let png = write_png(&dir, "question.png", 32, 32);
    let bare = dir.path().join("q");
    let dat = dir.path().join("q.dat");
    std::fs::copy(&png, &bare).unwrap();
    std::fs::copy(&png, &dat).unwrap();

    let transport = RecordingTransport::replying(ANSWER_42);
    let mut surface = surface(transport.clone());

    for path in [&bare, &dat] {
        let outcome = surface.capture_file(path).await.unwrap();
        assert_eq!(outcome, Some(Outcome::Answer("42".into())), "{}", path.display());
    }
    assert_eq!(transport.request_count(), 2);
}

/// 画像以外の中身は選択時点で弾く
#[tokio::test]
async fn test_non_image_is_rejected_before_analysis() {
    let dir = tempdir().expect("Failed to create temp dir");
    let notes = dir.path().join("notes.txt");
    std::fs::write(&notes, "hello").unwrap();

    let transport = RecordingTransport::replying(ANSWER_42);
    let mut surface = surface(transport.clone());
    let result = surface.capture_file(&notes).await;

    assert!(matches!(result, Err(QuestionReaderError::NotAnImage(_))));
    assert_eq!(surface.session().answer(), None);
    assert_eq!(transport.request_count(), 0);
}

/// 存在しないファイル
#[tokio::test]
async fn test_missing_file() {
    let mut surface = surface(RecordingTransport::replying(ANSWER_42));
    let result = surface.capture_file(Path::new("/nonexistent/q.png")).await;
    assert!(matches!(result, Err(QuestionReaderError::FileNotFound(_))));
}

/// ターミナルは常に「Upload Image」
#[test]
fn test_terminal_label() {
    let surface = surface(RecordingTransport::replying("{}"));
    assert_eq!(surface.action_label(), "Upload Image");
}
