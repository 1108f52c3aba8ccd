use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuestionReaderError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("APIキーが設定されていません。GEMINI_API_KEY を設定するか `question-reader config --set-api-key YOUR_KEY` を実行してください")]
    MissingApiKey,

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像ファイルではありません: {0}")]
    NotAnImage(String),

    #[error("HTTPクライアント初期化エラー: {0}")]
    HttpClient(String),

    #[error("入力エラー: {0}")]
    Dialog(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] question_reader_common::Error),
}

impl QuestionReaderError {
    /// 終了時に標準エラーへ出す一行（Debug 表記ではなくメッセージ本文）
    pub fn report(&self) -> String {
        format!("エラー: {}", self)
    }
}

pub type Result<T> = std::result::Result<T, QuestionReaderError>;
