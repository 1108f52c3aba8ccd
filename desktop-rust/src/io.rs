use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use question_reader_common::Outcome;

/// 選択ダイアログで許可する拡張子（image/* 相当）
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// CLIの `ask --json` で画像1枚を解析
pub fn ask_via_cli(cli: &Path, image: &Path) -> Result<Outcome> {
    let output = Command::new(cli)
        .arg("ask")
        .arg(image)
        .arg("--json")
        .output()
        .with_context(|| format!("run {}", cli.display()))?;
    parse_cli_output(&output.stdout, &output.stderr)
}

/// 標準出力の最後の行をOutcomeとして読む
///
/// 解析失敗時もCLIはJSONを出力して終了コード1で終わるので、
/// 終了コードではなく出力の有無で判断する。
pub fn parse_cli_output(stdout: &[u8], stderr: &[u8]) -> Result<Outcome> {
    let stdout = String::from_utf8_lossy(stdout);
    let Some(line) = stdout.lines().rev().find(|l| !l.trim().is_empty()) else {
        let stderr = String::from_utf8_lossy(stderr);
        bail!("no output from cli: {}", stderr.trim());
    };
    serde_json::from_str(line.trim()).with_context(|| format!("parse cli output: {line}"))
}

pub fn resolve_cli_binary() -> PathBuf {
    let name = format!("question-reader{}", std::env::consts::EXE_SUFFIX);
    let exe = std::env::current_exe().ok();
    if let Some(base_dir) = exe.as_ref().and_then(|p| p.parent()) {
        let local = base_dir.join(&name);
        if local.exists() {
            return local;
        }
        if let Some(target_dir) = base_dir.parent() {
            for profile in ["debug", "release"] {
                let sibling = target_dir.join(profile).join(&name);
                if sibling.exists() {
                    return sibling;
                }
            }
        }
    }
    PathBuf::from(name)
}
