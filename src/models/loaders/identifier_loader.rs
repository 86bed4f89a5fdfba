use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从文本文件读取应用列表（每行一个）
///
/// 返回原始文本，拆分和校验交给 `BatchRequest::from_raw`
pub async fn load_identifiers_text(list_path: &Path) -> Result<String> {
    let content = fs::read_to_string(list_path)
        .await
        .with_context(|| format!("无法读取应用列表文件: {}", list_path.display()))?;

    tracing::debug!(
        "已读取应用列表: {} ({} 行)",
        list_path.display(),
        content.lines().count()
    );

    Ok(content)
}

/// 合并命令行中的应用名和列表文件内容
pub async fn collect_identifiers_text(inline: &[String], list_file: Option<&Path>) -> Result<String> {
    let mut lines: Vec<String> = inline.to_vec();

    if let Some(path) = list_file {
        lines.push(load_identifiers_text(path).await?);
    }

    Ok(lines.join("\n"))
}
