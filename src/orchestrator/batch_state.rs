//! 批处理状态机
//!
//! `Idle → Running(0, N) → Running(1, N) → … → Running(N, N) → Completed`

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running { index: usize, total: usize },
    Completed { failed: Vec<String> },
}

/// 非法状态转换
#[derive(Debug, Error, PartialEq, Eq)]
#[error("非法状态转换: {from:?} --{action}-->")]
pub struct TransitionError {
    pub from: BatchState,
    pub action: &'static str,
}

impl BatchState {
    /// `Idle → Running(0, total)`
    pub fn start(self, total: usize) -> Result<Self, TransitionError> {
        match self {
            BatchState::Idle => Ok(BatchState::Running { index: 0, total }),
            from => Err(TransitionError { from, action: "start" }),
        }
    }

    /// `Running(i) → Running(i + 1)`，一个应用的结果记录完毕后调用
    pub fn advance(self) -> Result<Self, TransitionError> {
        match self {
            BatchState::Running { index, total } if index < total => Ok(BatchState::Running {
                index: index + 1,
                total,
            }),
            from => Err(TransitionError { from, action: "advance" }),
        }
    }

    /// `Running(N, N) → Completed`
    pub fn complete(self, failed: Vec<String>) -> Result<Self, TransitionError> {
        match self {
            BatchState::Running { index, total } if index == total => {
                Ok(BatchState::Completed { failed })
            }
            from => Err(TransitionError { from, action: "complete" }),
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, BatchState::Running { index, total } if index == total)
    }
}
