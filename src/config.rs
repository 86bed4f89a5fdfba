use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// 外部工具在安装目录下的相对位置
pub const TOOLS_DIR: &str = "tools";
pub const TOOL_EXECUTABLE: &str = "LogParser.exe";

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// 外部工具路径，为空时从安装目录解析
    pub tool_path: Option<PathBuf>,
    /// 输入日志格式
    pub input_format: String,
    /// 输出格式
    pub output_format: String,
    /// 日志目录下参与查询的文件模式
    pub log_file_pattern: String,
    /// 报表文件名前缀
    pub output_prefix: String,
    /// 每个应用处理完后的停顿（毫秒），0 表示不停顿
    pub step_delay_ms: u64,
    /// 输出目录不存在时是否自动创建
    pub create_output_dir: bool,
    /// 处理记录文件
    pub transcript_file: Option<String>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_path: None,
            input_format: "IISW3C".to_string(),
            output_format: "CSV".to_string(),
            log_file_pattern: "*.log".to_string(),
            output_prefix: "resultados_".to_string(),
            step_delay_ms: 50,
            create_output_dir: true,
            transcript_file: None,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    tool_path: Option<PathBuf>,
    input_format: Option<String>,
    output_format: Option<String>,
    log_file_pattern: Option<String>,
    output_prefix: Option<String>,
    step_delay_ms: Option<u64>,
    create_output_dir: Option<bool>,
    transcript_file: Option<String>,
    verbose_logging: Option<bool>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env(self) -> Self {
        Self {
            tool_path: std::env::var("LOGPARSER_PATH").ok().map(PathBuf::from).or(self.tool_path),
            input_format: std::env::var("LOGPARSER_INPUT_FORMAT").unwrap_or(self.input_format),
            output_format: std::env::var("LOGPARSER_OUTPUT_FORMAT").unwrap_or(self.output_format),
            log_file_pattern: std::env::var("LOG_FILE_PATTERN").unwrap_or(self.log_file_pattern),
            output_prefix: std::env::var("REPORT_PREFIX").unwrap_or(self.output_prefix),
            step_delay_ms: std::env::var("STEP_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.step_delay_ms),
            create_output_dir: std::env::var("CREATE_OUTPUT_DIR").ok().and_then(|v| v.parse().ok()).unwrap_or(self.create_output_dir),
            transcript_file: std::env::var("TRANSCRIPT_FILE").ok().or(self.transcript_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 从 TOML 文件加载配置，缺失的键使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|source| {
            AppError::File(FileError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })
        })
    }

    fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            tool_path: file.tool_path.or(default.tool_path),
            input_format: file.input_format.unwrap_or(default.input_format),
            output_format: file.output_format.unwrap_or(default.output_format),
            log_file_pattern: file.log_file_pattern.unwrap_or(default.log_file_pattern),
            output_prefix: file.output_prefix.unwrap_or(default.output_prefix),
            step_delay_ms: file.step_delay_ms.unwrap_or(default.step_delay_ms),
            create_output_dir: file.create_output_dir.unwrap_or(default.create_output_dir),
            transcript_file: file.transcript_file.or(default.transcript_file),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    /// 解析外部工具路径
    ///
    /// 未显式配置时使用 `<程序所在目录>/tools/LogParser.exe`
    pub fn resolve_tool_path(&self) -> AppResult<PathBuf> {
        if let Some(path) = &self.tool_path {
            return Ok(path.clone());
        }

        let exe = std::env::current_exe()
            .map_err(|e| ConfigError::InstallDirUnknown(e.to_string()))?;
        let install_dir = exe
            .parent()
            .ok_or_else(|| ConfigError::InstallDirUnknown(exe.display().to_string()))?;

        Ok(install_dir.join(TOOLS_DIR).join(TOOL_EXECUTABLE))
    }
}
