//! 批处理数据模型
//!
//! - `BatchRequest`：一次批处理的输入，创建后不可变
//! - `ReportOutcome`：每个应用恰好一条，按输入顺序产生
//! - `BatchResult`：所有结果的汇总，失败列表由结果派生

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ValidationError;

/// 批处理请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    log_source: PathBuf,
    identifiers: Vec<String>,
    output_dir: PathBuf,
}

impl BatchRequest {
    /// 从用户输入的三个字符串构建请求
    ///
    /// 应用列表按 `\r` / `\n` 拆分，去掉首尾空白并丢弃空行，不去重。
    /// 两个路径中不能含有 `'` 或控制字符，它们会原样进入查询语句
    pub fn from_raw(
        log_source: &str,
        identifiers_text: &str,
        output_dir: &str,
    ) -> Result<Self, ValidationError> {
        let log_source = checked_path("log_source", log_source)?;
        let output_dir = checked_path("output_dir", output_dir)?;

        let identifiers = split_identifiers(identifiers_text);
        if identifiers.is_empty() {
            return Err(ValidationError::NoIdentifiers);
        }

        Ok(Self {
            log_source,
            identifiers,
            output_dir,
        })
    }

    pub fn log_source(&self) -> &Path {
        &self.log_source
    }

    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

fn checked_path(field: &'static str, value: &str) -> Result<PathBuf, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::BlankField { field });
    }
    match value.chars().find(|c| *c == '\'' || c.is_control()) {
        Some(ch) => Err(ValidationError::UnsafePath { field, ch }),
        None => Ok(PathBuf::from(value)),
    }
}

/// 按行拆分应用列表
pub fn split_identifiers(text: &str) -> Vec<String> {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 失败原因分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 应用名包含不安全字符，未调用外部工具
    UnsafeIdentifier,
    /// 外部进程无法启动
    ProcessLaunch,
    /// 外部工具向 stderr 输出了内容
    ToolReported,
    /// 工具正常结束但没有生成报表文件
    MissingOutput,
    /// 其他异常
    Unexpected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::UnsafeIdentifier => "不安全的应用名",
            FailureKind::ProcessLaunch => "进程启动失败",
            FailureKind::ToolReported => "工具报告错误",
            FailureKind::MissingOutput => "未生成报表",
            FailureKind::Unexpected => "意外错误",
        };
        f.write_str(label)
    }
}

/// 单个应用的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Success {
        identifier: String,
        output_file: PathBuf,
    },
    Failure {
        identifier: String,
        kind: FailureKind,
        reason: String,
    },
}

impl ReportOutcome {
    pub fn identifier(&self) -> &str {
        match self {
            ReportOutcome::Success { identifier, .. } | ReportOutcome::Failure { identifier, .. } => {
                identifier
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ReportOutcome::Success { .. })
    }
}

/// 批处理汇总结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    outcomes: Vec<ReportOutcome>,
}

impl BatchResult {
    pub fn new(outcomes: Vec<ReportOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[ReportOutcome] {
        &self.outcomes
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// 失败的应用名，按首次出现的顺序去重
    pub fn failed_identifiers(&self) -> Vec<&str> {
        let mut failed: Vec<&str> = Vec::new();
        for outcome in &self.outcomes {
            if !outcome.is_success() && !failed.contains(&outcome.identifier()) {
                failed.push(outcome.identifier());
            }
        }
        failed
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| !o.is_success())
    }

    /// 最终汇总消息
    pub fn summary_message(&self) -> String {
        summary_for(&self.failed_identifiers())
    }
}

/// 根据失败列表生成汇总消息
pub fn summary_for<S: AsRef<str>>(failed: &[S]) -> String {
    if failed.is_empty() {
        "所有报表均已成功生成。".to_string()
    } else {
        let names: Vec<&str> = failed.iter().map(AsRef::as_ref).collect();
        format!("以下应用的报表生成失败: {}。", names.join(", "))
    }
}
