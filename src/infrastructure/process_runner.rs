//! 进程执行器 - 基础设施层
//!
//! 持有外部工具的可执行文件路径，只暴露"带参数运行并收集输出"的能力

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::error::GeneratorError;

/// Windows 下不弹出控制台窗口
#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// 一次进程调用的输出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// 被信号终止时为 None
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// stderr 中是否有非空白内容
    pub fn has_errors(&self) -> bool {
        !self.stderr.trim().is_empty()
    }
}

/// 进程执行器
///
/// 职责：
/// - 持有唯一的可执行文件路径
/// - 以参数数组方式启动进程，不经过 shell
/// - 等待退出并完整读取 stdout / stderr
/// - 不认识应用名 / 报表
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    program: PathBuf,
}

impl ProcessRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// 运行程序并等待结束
    ///
    /// stdout 和 stderr 同时读取，输出再多也不会因管道写满而卡住
    pub async fn run<I, S>(&self, args: I) -> Result<ProcessOutput, GeneratorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        #[cfg(windows)]
        command.creation_flags(CREATE_NO_WINDOW);

        debug!("启动进程: {:?}", command.as_std());

        let child = command.spawn().map_err(|source| GeneratorError::Launch {
            program: self.program.display().to_string(),
            source,
        })?;

        let output = child.wait_with_output().await.map_err(|e| {
            GeneratorError::Unexpected(format!(
                "等待 {} 结束时出错: {}",
                self.program.display(),
                e
            ))
        })?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code(),
        })
    }
}
