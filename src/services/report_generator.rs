//! 报表生成能力 - 业务能力层
//!
//! `ReportGenerator` 只有一个能力：给定过滤条件和目标文件，生成报表或失败。
//! 流程层只依赖这个 trait，可以替换成其他后端（例如原生日志解析器）。

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppResult, GeneratorError};
use crate::infrastructure::{ProcessOutput, ProcessRunner};
use crate::services::query_builder::QueryBuilder;

/// 一次报表生成任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportJob {
    /// 原始应用名，作为 URI 子串过滤条件
    pub identifier: String,
    /// 日志目录
    pub log_source: PathBuf,
    /// 目标报表文件
    pub destination: PathBuf,
}

/// 报表生成器
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// 后端名称（仅用于日志）
    fn name(&self) -> &str;

    /// 生成报表
    ///
    /// 返回 `Ok` 只表示调用完成；是否成功由调用方根据 stderr 和目标文件判断
    async fn generate(&self, job: &ReportJob) -> Result<ProcessOutput, GeneratorError>;
}

/// 基于 LogParser 可执行文件的生成器
pub struct LogParserGenerator {
    runner: ProcessRunner,
    query_builder: QueryBuilder,
}

impl LogParserGenerator {
    pub fn new(runner: ProcessRunner, query_builder: QueryBuilder) -> Self {
        Self {
            runner,
            query_builder,
        }
    }

    /// 按配置解析工具路径并创建
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let tool_path = config.resolve_tool_path()?;
        Ok(Self::new(
            ProcessRunner::new(tool_path),
            QueryBuilder::new(config),
        ))
    }

    pub fn runner(&self) -> &ProcessRunner {
        &self.runner
    }
}

#[async_trait]
impl ReportGenerator for LogParserGenerator {
    fn name(&self) -> &str {
        "LogParser"
    }

    async fn generate(&self, job: &ReportJob) -> Result<ProcessOutput, GeneratorError> {
        let args = self
            .query_builder
            .build_args(&job.destination, &job.log_source, &job.identifier)
            .map_err(|e| GeneratorError::UnsafeInput(e.to_string()))?;

        debug!("LogParser 查询: {}", args[0]);

        self.runner.run(&args).await
    }
}
