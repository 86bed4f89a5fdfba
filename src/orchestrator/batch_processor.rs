//! 批量报表处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责按顺序处理应用列表并汇总结果。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：解析工具路径，创建 `ReportGenerator` 和 `ReportFlow`
//! 2. **顺序处理**：一次只处理一个应用，上一个进程退出且输出读完后才开始下一个
//! 3. **失败隔离**：单个应用失败不会中断批处理，也没有重试
//! 4. **事件输出**：日志、进度、完成信号通过 `EventSink` 发给表现层
//! 5. **全局统计**：汇总成功 / 失败的应用
//!
//! 没有取消机制，也不对外部进程设置超时。

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::events::{BatchEvent, EventSink};
use crate::models::{summary_for, BatchRequest, BatchResult};
use crate::orchestrator::batch_state::BatchState;
use crate::services::{LogParserGenerator, ReportGenerator, TranscriptWriter};
use crate::utils::logging::{log_progress, log_startup, print_final_stats};
use crate::workflow::{ReportCtx, ReportFlow};

/// 按顺序处理请求中的所有应用
///
/// 每个应用恰好产生一个结果，顺序与输入一致。单个应用的错误不会返回 `Err`
pub async fn run_batch(
    request: &BatchRequest,
    flow: &ReportFlow,
    step_delay: Duration,
    sink: &EventSink,
) -> AppResult<BatchResult> {
    let identifiers = request.identifiers();
    let total = identifiers.len();

    let mut state = BatchState::Idle.start(total)?;
    sink.emit(BatchEvent::Started { total });

    let mut outcomes = Vec::with_capacity(total);

    for (idx, identifier) in identifiers.iter().enumerate() {
        let ctx = ReportCtx::new(identifier.as_str(), idx + 1, total);

        let outcome = flow.run(request, &ctx, sink).await;
        outcomes.push(outcome.clone());

        state = state.advance()?;
        sink.emit(BatchEvent::ItemFinished {
            index: idx + 1,
            total,
            outcome,
        });

        // 仅用于让进度显示有时间刷新
        if !step_delay.is_zero() {
            sleep(step_delay).await;
        }
    }

    let result = BatchResult::new(outcomes);
    let failed: Vec<String> = result
        .failed_identifiers()
        .into_iter()
        .map(str::to_string)
        .collect();

    state = state.complete(failed.clone())?;
    debug!("批处理状态: {:?}", state);

    sink.info("所有报表均已处理完毕。");
    sink.emit(BatchEvent::Completed { failed });

    Ok(result)
}

/// 应用主结构
pub struct App {
    config: Config,
    flow: ReportFlow,
}

impl App {
    /// 使用 LogParser 后端初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        let generator = LogParserGenerator::from_config(&config)?;
        debug!("LogParser 路径: {}", generator.runner().program().display());
        Ok(Self::with_generator(config, Arc::new(generator)))
    }

    /// 使用指定的报表生成器
    pub fn with_generator(config: Config, generator: Arc<dyn ReportGenerator>) -> Self {
        let flow = ReportFlow::new(&config, generator);
        Self { config, flow }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行一次批处理
    pub async fn run(&self, request: &BatchRequest) -> Result<BatchResult> {
        log_startup(self.flow.generator_name(), request.identifiers().len());

        if self.config.create_output_dir {
            tokio::fs::create_dir_all(request.output_dir())
                .await
                .map_err(|e| {
                    AppError::file_write_failed(request.output_dir().display().to_string(), e)
                })?;
        }

        let transcript = self
            .config
            .transcript_file
            .as_deref()
            .map(TranscriptWriter::with_path);
        if let Some(writer) = &transcript {
            writer.write_header().await?;
        }

        let (sink, events) = EventSink::channel();
        let recorder = tokio::spawn(record_events(events, transcript));

        let result = run_batch(request, &self.flow, self.step_delay(), &sink).await?;

        // 关闭发送端，等待记录任务写完剩余事件
        drop(sink);
        recorder.await.context("处理记录任务异常退出")?;

        print_final_stats(&result, self.config.transcript_file.as_deref());

        Ok(result)
    }

    fn step_delay(&self) -> Duration {
        Duration::from_millis(self.config.step_delay_ms)
    }
}

/// 订阅批处理事件：输出进度，并把日志写入处理记录文件
async fn record_events(
    mut events: UnboundedReceiver<BatchEvent>,
    mut transcript: Option<TranscriptWriter>,
) {
    while let Some(event) = events.recv().await {
        let line = match event {
            BatchEvent::Started { total } => format!("开始处理 {} 个应用", total),
            BatchEvent::Log { line, .. } => line,
            BatchEvent::ItemFinished { index, total, .. } => {
                log_progress(index, total);
                continue;
            }
            BatchEvent::Completed { failed } => summary_for(&failed),
        };

        if let Some(writer) = &transcript {
            if let Err(e) = writer.write_line(&line).await {
                warn!("⚠️ 写入处理记录失败，后续不再写入: {:#}", e);
                transcript = None;
            }
        }
    }
}
