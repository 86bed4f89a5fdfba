use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use iis_report_batch::models::collect_identifiers_text;
use iis_report_batch::utils::logging;
use iis_report_batch::{App, AppError, BatchRequest, BatchResult, Config};

/// 按应用批量生成 IIS 日志 CSV 报表
#[derive(Parser, Debug)]
#[command(name = "iis-report-batch", version)]
struct Cli {
    /// IIS 日志目录
    #[arg(long, value_name = "DIR")]
    logs: Option<String>,

    /// 应用名（URI 中包含的子串），可重复
    #[arg(long = "app", value_name = "NAME")]
    apps: Vec<String>,

    /// 应用列表文件，每行一个
    #[arg(long, value_name = "FILE")]
    apps_file: Option<PathBuf>,

    /// 报表输出目录
    #[arg(long, value_name = "DIR")]
    output: Option<String>,

    /// TOML 配置文件
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// LogParser 可执行文件路径
    #[arg(long, value_name = "PATH")]
    tool: Option<PathBuf>,

    /// 处理记录文件
    #[arg(long, value_name = "FILE")]
    transcript: Option<String>,

    /// 每个应用处理完后的停顿（毫秒）
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// 显示详细日志（包括 LogParser 输出）
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 初始化日志
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(result) => {
            println!("{}", result.summary_message());
            if result.has_failures() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("错误: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<BatchResult> {
    // 加载配置
    let config = load_config(&cli)?;

    // 校验输入，失败时不会调用外部工具
    let identifiers_text = collect_identifiers_text(&cli.apps, cli.apps_file.as_deref()).await?;
    let request = BatchRequest::from_raw(
        cli.logs.as_deref().unwrap_or_default(),
        &identifiers_text,
        cli.output.as_deref().unwrap_or_default(),
    )
    .map_err(AppError::from)?;

    // 初始化并运行应用
    let app = App::initialize(config)?;
    app.run(&request).await
}

/// 配置优先级：命令行 > 环境变量 > 配置文件 > 默认值
fn load_config(cli: &Cli) -> Result<Config> {
    let base = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    let mut config = base.with_env();

    if let Some(tool) = &cli.tool {
        config.tool_path = Some(tool.clone());
    }
    if let Some(transcript) = &cli.transcript {
        config.transcript_file = Some(transcript.clone());
    }
    if let Some(delay) = cli.delay_ms {
        config.step_delay_ms = delay;
    }
    if cli.verbose {
        config.verbose_logging = true;
    }

    Ok(config)
}
