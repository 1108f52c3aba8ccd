//! 画像正規化モジュール
//!
//! 撮影・選択された画像を送信用に縮小・再圧縮する:
//! - 長辺を MAX_DIMENSION (1024px) 以下に収める
//! - JPEG品質 60 で再エンコード（元形式は問わない）
//! - Base64エンコード（Data URLヘッダなし）

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::debug;

use crate::error::{Error, Result};

/// 長辺の上限ピクセル
pub const MAX_DIMENSION: u32 = 1024;

/// JPEG品質 (1-100)
pub const JPEG_QUALITY: u8 = 60;

/// 送信ペイロードのMIMEタイプ
pub const PAYLOAD_MIME_TYPE: &str = "image/jpeg";

/// 正規化済み画像
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPayload {
    /// Base64エンコードされたJPEGデータ
    pub data: String,
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
}

impl NormalizedPayload {
    pub fn mime_type(&self) -> &'static str {
        PAYLOAD_MIME_TYPE
    }

    pub fn was_resized(&self) -> bool {
        self.width != self.source_width || self.height != self.source_height
    }

    /// `data:image/jpeg;base64,...` 形式
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", PAYLOAD_MIME_TYPE, self.data)
    }

    /// Base64をデコードしてJPEGバイト列を返す
    pub fn jpeg_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| Error::Decode(format!("base64: {}", e)))
    }
}

/// 出力サイズを計算
///
/// 横長（正方形含む）で幅が上限を超える場合は幅基準、
/// それ以外で高さが上限を超える場合は高さ基準で縮小する。
pub fn target_dimensions(width: u32, height: u32) -> (u32, u32) {
    if width >= height && width > MAX_DIMENSION {
        (MAX_DIMENSION, scale_side(height, width))
    } else if height > MAX_DIMENSION {
        (scale_side(width, height), MAX_DIMENSION)
    } else {
        (width, height)
    }
}

fn scale_side(side: u32, longer: u32) -> u32 {
    let scaled = side as f64 * MAX_DIMENSION as f64 / longer as f64;
    (scaled.round() as u32).max(1)
}

/// 画像バイト列を正規化
///
/// # Arguments
/// * `bytes` - 任意形式（JPEG, PNG, WebP, GIF, BMP）の画像データ
///
/// # Returns
/// 縮小・再圧縮・Base64化したペイロード
pub fn normalize(bytes: &[u8]) -> Result<NormalizedPayload> {
    let image = image::load_from_memory(bytes).map_err(|e| Error::Decode(e.to_string()))?;

    let (source_width, source_height) = (image.width(), image.height());
    let (width, height) = target_dimensions(source_width, source_height);

    let image = if (width, height) == (source_width, source_height) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEGはアルファを持てないのでRGBに落とす
    let rgb = image.to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(|e| Error::Encode(e.to_string()))?;

    debug!(
        source_width,
        source_height,
        width,
        height,
        input_bytes = bytes.len(),
        jpeg_bytes = jpeg.len(),
        "image normalized"
    );

    Ok(NormalizedPayload {
        data: STANDARD.encode(&jpeg),
        width,
        height,
        source_width,
        source_height,
    })
}

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
pub fn strip_data_url_header(data_url: &str) -> Option<&str> {
    data_url.split_once(',').map(|(_, data)| data)
}
