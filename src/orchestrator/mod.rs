//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调度和统计，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量报表处理器
//! - 管理应用生命周期（初始化、运行）
//! - 顺序遍历应用列表（Vec<String>）
//! - 发出进度 / 日志事件
//! - 输出全局统计信息
//!
//! ### `batch_state` - 批处理状态机
//! - `Idle → Running → Completed`
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<应用名>)
//!     ↓
//! workflow::ReportFlow (处理单个应用)
//!     ↓
//! services (能力层：文件名 / 查询 / 报表生成 / 处理记录)
//!     ↓
//! infrastructure (基础设施：ProcessRunner)
//! ```

pub mod batch_processor;
pub mod batch_state;

pub use batch_processor::{run_batch, App};
pub use batch_state::{BatchState, TransitionError};
