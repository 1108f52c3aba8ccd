//! Question Reader Common Library
//!
//! CLI・Web(WASM)・デスクトップで共有される処理:
//! 画像の正規化、Gemini リクエスト、キャプチャ状態

pub mod capture;
pub mod error;
pub mod gemini;
pub mod inference;
pub mod normalizer;
pub mod outcome;

pub use capture::{Busy, CaptureSession, CaptureState, DeviceClass};
pub use error::{Error, Result};
pub use gemini::{INSTRUCTION, DEFAULT_MODEL, DEFAULT_API_BASE};
pub use inference::{analyze, HttpResponse, InferenceClient, InferenceConfig, Transport};
pub use normalizer::{normalize, NormalizedPayload, JPEG_QUALITY, MAX_DIMENSION};
pub use outcome::{Outcome, ERROR_TEXT, NO_ANSWER_TEXT};
