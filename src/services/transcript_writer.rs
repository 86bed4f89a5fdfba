//! 处理记录写入服务 - 业务能力层
//!
//! 只负责把处理记录追加到文件，不关心流程

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 处理记录写入服务
///
/// 职责：
/// - 运行开始时写入带时间的标题
/// - 之后只追加，不修改已有内容
pub struct TranscriptWriter {
    transcript_path: String,
}

impl TranscriptWriter {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            transcript_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.transcript_path
    }

    /// 写入本次运行的标题
    pub async fn write_header(&self) -> Result<()> {
        let header = format!(
            "{}\n报表生成记录 - {}\n{}\n",
            "=".repeat(60),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(60)
        );
        self.append(&header).await
    }

    /// 追加一行
    pub async fn write_line(&self, line: &str) -> Result<()> {
        self.append(&format!("{}\n", line)).await
    }

    async fn append(&self, text: &str) -> Result<()> {
        debug!("写入处理记录: {} 字节", text.len());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.transcript_path)
            .await
            .with_context(|| format!("无法打开处理记录文件: {}", self.transcript_path))?;

        file.write_all(text.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
