/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::BatchResult;

/// 初始化 tracing 日志
///
/// 使用 `RUST_LOG` 控制级别，默认 `info`；`verbose` 为真时默认 `debug`。
/// 重复调用不会报错（测试中常见）
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `generator`: 报表生成器名称
/// - `total`: 应用总数
pub fn log_startup(generator: &str, total: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量报表生成模式");
    info!("🔧 报表生成器: {}", generator);
    info!("📊 待处理应用: {} 个", total);
    info!("{}", "=".repeat(60));
}

/// 记录进度
pub fn log_progress(index: usize, total: usize) {
    info!("📦 进度: {}/{}", index, total);
}

/// 打印最终统计信息
///
/// # 参数
/// - `result`: 批处理结果
/// - `transcript_file`: 处理记录文件路径
pub fn print_final_stats(result: &BatchResult, transcript_file: Option<&str>) {
    let total = result.outcomes().len();
    let success = result.success_count();

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", total - success);
    info!("{}", "=".repeat(60));
    if let Some(path) = transcript_file {
        info!("\n处理记录已保存至: {}", path);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
