//! 批处理事件
//!
//! 编排层通过 `EventSink` 发出进度和日志，表现层（CLI / GUI）订阅 `BatchEvent`。
//! 接收端关闭后事件直接丢弃，不影响批处理。

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info, warn};

use crate::models::ReportOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// 批处理事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// 批处理开始
    Started { total: usize },
    /// 一行处理记录
    Log { level: LogLevel, line: String },
    /// 一个应用处理完毕（进度 = index / total）
    ItemFinished {
        index: usize,
        total: usize,
        outcome: ReportOutcome,
    },
    /// 全部完成
    Completed { failed: Vec<String> },
}

/// 事件发送端
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<UnboundedSender<BatchEvent>>,
}

impl EventSink {
    pub fn new(tx: UnboundedSender<BatchEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    /// 创建一对发送端 / 接收端
    pub fn channel() -> (Self, UnboundedReceiver<BatchEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self::new(tx), rx)
    }

    /// 不转发事件，只写 tracing 日志
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: BatchEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn info(&self, line: impl Into<String>) {
        let line = line.into();
        info!("{}", line);
        self.emit(BatchEvent::Log {
            level: LogLevel::Info,
            line,
        });
    }

    pub fn warn(&self, line: impl Into<String>) {
        let line = line.into();
        warn!("{}", line);
        self.emit(BatchEvent::Log {
            level: LogLevel::Warn,
            line,
        });
    }

    pub fn error(&self, line: impl Into<String>) {
        let line = line.into();
        error!("{}", line);
        self.emit(BatchEvent::Log {
            level: LogLevel::Error,
            line,
        });
    }

    /// 外部工具的原始输出：总是进入处理记录，控制台只在详细模式下显示
    pub fn tool_output(&self, text: &str, verbose: bool) {
        let text = text.trim_end();
        if text.is_empty() {
            return;
        }
        if verbose {
            info!("{}", text);
        } else {
            debug!("{}", text);
        }
        self.emit(BatchEvent::Log {
            level: LogLevel::Info,
            line: text.to_string(),
        });
    }
}
