//! 报表处理上下文
//!
//! 封装"我正在处理第几个应用"这一信息

use std::fmt::Display;

/// 报表处理上下文
#[derive(Debug, Clone)]
pub struct ReportCtx {
    /// 原始应用名
    pub identifier: String,

    /// 当前序号（从1开始）
    pub index: usize,

    /// 应用总数
    pub total: usize,
}

impl ReportCtx {
    pub fn new(identifier: impl Into<String>, index: usize, total: usize) -> Self {
        Self {
            identifier: identifier.into(),
            index,
            total,
        }
    }
}

impl Display for ReportCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[应用 {}/{} {}]", self.index, self.total, self.identifier)
    }
}
