//! 报表处理流程 - 流程层
//!
//! 核心职责：定义"一个应用"的完整处理流程
//!
//! 流程顺序：
//! 1. 检查应用名 → 生成文件名 → 确定目标路径
//! 2. 删除上次留下的同名报表，再调用 `ReportGenerator`
//! 3. 判定结果：stderr 有内容或目标文件不存在都算失败
//!
//! 所有错误都在这里降级为 `ReportOutcome::Failure`，不会向上传播

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::FutureExt;

use crate::config::Config;
use crate::error::GeneratorError;
use crate::events::EventSink;
use crate::models::{BatchRequest, FailureKind, ReportOutcome};
use crate::services::{check_filter_value, is_blank_file_name, sanitize_file_name};
use crate::services::{ReportGenerator, ReportJob};
use crate::utils::logging::truncate_text;
use crate::workflow::report_ctx::ReportCtx;

/// 失败行中原因的最大显示长度，完整内容保留在结果里
const MAX_REASON_CHARS: usize = 300;

/// 报表处理流程
///
/// - 编排单个应用的处理步骤
/// - 不持有任何进程资源，只依赖 `ReportGenerator`
pub struct ReportFlow {
    generator: Arc<dyn ReportGenerator>,
    output_prefix: String,
    verbose_logging: bool,
}

impl ReportFlow {
    pub fn new(config: &Config, generator: Arc<dyn ReportGenerator>) -> Self {
        Self {
            generator,
            output_prefix: config.output_prefix.clone(),
            verbose_logging: config.verbose_logging,
        }
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// 应用对应的报表路径：`<输出目录>/<前缀><文件名>.csv`
    pub fn destination_for(&self, output_dir: &Path, identifier: &str) -> PathBuf {
        output_dir.join(format!(
            "{}{}",
            self.output_prefix,
            sanitize_file_name(identifier)
        ))
    }

    pub async fn run(
        &self,
        request: &BatchRequest,
        ctx: &ReportCtx,
        sink: &EventSink,
    ) -> ReportOutcome {
        sink.info(format!("{} 正在生成报表...", ctx));

        if let Err(e) = check_filter_value(&ctx.identifier) {
            return self.fail(ctx, sink, FailureKind::UnsafeIdentifier, e.to_string(), None);
        }

        if is_blank_file_name(&sanitize_file_name(&ctx.identifier)) {
            return self.fail(
                ctx,
                sink,
                FailureKind::UnsafeIdentifier,
                "应用名转换后的文件名为空".to_string(),
                None,
            );
        }

        let destination = self.destination_for(request.output_dir(), &ctx.identifier);
        let job = ReportJob {
            identifier: ctx.identifier.clone(),
            log_source: request.log_source().to_path_buf(),
            destination: destination.clone(),
        };

        // 上次运行留下的报表不能当作这次的结果
        if let Err(e) = tokio::fs::remove_file(&destination).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                return self.fail(
                    ctx,
                    sink,
                    FailureKind::Unexpected,
                    format!("无法清理旧报表文件: {}", e),
                    Some(&destination),
                );
            }
        }

        // 生成器内部 panic 也只算这一个应用失败
        let generated = AssertUnwindSafe(self.generator.generate(&job))
            .catch_unwind()
            .await;

        let output = match generated {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                let kind = match &e {
                    GeneratorError::Launch { .. } => FailureKind::ProcessLaunch,
                    // 应用名和路径都已检查过，这里只剩配置带来的问题
                    GeneratorError::UnsafeInput(_) => FailureKind::Unexpected,
                    GeneratorError::Unexpected(_) => FailureKind::Unexpected,
                };
                let reason = format!("执行 {} 时出错: {}", self.generator_name(), e);
                return self.fail(ctx, sink, kind, reason, Some(&destination));
            }
            Err(panic) => {
                let reason = format!(
                    "执行 {} 时出错: {}",
                    self.generator_name(),
                    panic_message(&*panic)
                );
                return self.fail(ctx, sink, FailureKind::Unexpected, reason, Some(&destination));
            }
        };

        sink.tool_output(&output.stdout, self.verbose_logging);

        if let Some(code) = output.exit_code.filter(|code| *code != 0) {
            sink.warn(format!(
                "{} ⚠️ {} 退出码为 {}",
                ctx,
                self.generator_name(),
                code
            ));
        }

        if output.has_errors() {
            let stderr = output.stderr.trim().to_string();
            sink.error(format!("{} 错误: {}", ctx, stderr));
            return self.fail(ctx, sink, FailureKind::ToolReported, stderr, Some(&destination));
        }

        match tokio::fs::try_exists(&destination).await {
            Ok(true) => {
                sink.info(format!(
                    "{} ✓ 报表生成成功，保存至: {}",
                    ctx,
                    destination.display()
                ));
                ReportOutcome::Success {
                    identifier: ctx.identifier.clone(),
                    output_file: destination,
                }
            }
            Ok(false) => self.fail(
                ctx,
                sink,
                FailureKind::MissingOutput,
                "工具已结束，但没有生成报表文件".to_string(),
                Some(&destination),
            ),
            Err(e) => self.fail(
                ctx,
                sink,
                FailureKind::Unexpected,
                format!("无法检查报表文件: {}", e),
                Some(&destination),
            ),
        }
    }

    fn fail(
        &self,
        ctx: &ReportCtx,
        sink: &EventSink,
        kind: FailureKind,
        reason: String,
        destination: Option<&Path>,
    ) -> ReportOutcome {
        match destination {
            Some(path) => sink.error(format!(
                "{} ❌ {} ({}): {}",
                ctx,
                kind,
                path.display(),
                truncate_text(&reason, MAX_REASON_CHARS)
            )),
            None => sink.error(format!(
                "{} ❌ {}: {}",
                ctx,
                kind,
                truncate_text(&reason, MAX_REASON_CHARS)
            )),
        }

        ReportOutcome::Failure {
            identifier: ctx.identifier.clone(),
            kind,
            reason,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "未知 panic".to_string()
    }
}
