//! # IIS Report Batch
//!
//! 按应用批量调用 LogParser，从 IIS 日志生成每个应用的 CSV 报表
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部可执行文件，只暴露能力
//! - `ProcessRunner` - 以参数数组启动进程，收集 stdout / stderr
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个应用
//! - `sanitize_file_name` - 应用名 → 安全的文件名
//! - `QueryBuilder` - 构建 LogParser 查询参数
//! - `ReportGenerator` - 可替换的报表生成能力（默认 `LogParserGenerator`）
//! - `TranscriptWriter` - 写处理记录文件
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个应用"的完整处理流程
//! - `ReportCtx` - 上下文封装（应用名 + 序号）
//! - `ReportFlow` - 流程编排（检查 → 生成 → 判定）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 顺序处理应用列表，汇总结果
//! - `orchestrator/batch_state` - 批处理状态机
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod events;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use events::{BatchEvent, EventSink};
pub use infrastructure::{ProcessOutput, ProcessRunner};
pub use models::{BatchRequest, BatchResult, FailureKind, ReportOutcome};
pub use orchestrator::{run_batch, App, BatchState};
pub use services::{LogParserGenerator, ReportGenerator, ReportJob};
pub use workflow::{ReportCtx, ReportFlow};
