use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "question-reader")]
#[command(about = "画像の問題文を読み取り、AIに回答させるツール", long_about = None)]
pub struct Cli {
    /// 省略時は対話モード（capture）
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 使用するモデル（設定ファイルより優先）
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 対話的に画像を選んで回答を表示
    Capture,

    /// 画像1枚を解析して回答を出力
    Ask {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 送信用に縮小・再圧縮した画像を保存（APIは呼ばない）
    Normalize {
        /// 画像ファイルのパス
        #[arg(required = true)]
        image: PathBuf,

        /// 出力ファイル（デフォルト: <元ファイル名>.normalized.jpg）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// normalize の既定出力先
pub fn default_normalized_path(image: &std::path::Path) -> PathBuf {
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    image.with_file_name(format!("{stem}.normalized.jpg"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_capture() {
        let cli = Cli::try_parse_from(["question-reader"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_ask_with_json_and_model() {
        let cli = Cli::try_parse_from(["question-reader", "ask", "q.png", "--json", "--model", "m1", "-v"]).unwrap();
        assert_eq!(cli.model.as_deref(), Some("m1"));
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Ask { image, json }) => {
                assert_eq!(image, PathBuf::from("q.png"));
                assert!(json);
            }
            _ => panic!("ask expected"),
        }
    }

    #[test]
    fn test_ask_requires_image() {
        assert!(Cli::try_parse_from(["question-reader", "ask"]).is_err());
    }

    #[test]
    fn test_default_normalized_path() {
        assert_eq!(
            default_normalized_path(Path::new("/tmp/photos/q1.heic.png")),
            PathBuf::from("/tmp/photos/q1.heic.normalized.jpg")
        );
        assert_eq!(
            default_normalized_path(Path::new("scan.jpg")),
            PathBuf::from("scan.normalized.jpg")
        );
    }
}
