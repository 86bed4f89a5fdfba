use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 输入校验错误（批处理不会开始）
    #[error("输入错误: {0}")]
    Validation(#[from] ValidationError),
    /// 报表生成器错误
    #[error("生成器错误: {0}")]
    Generator(#[from] GeneratorError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 批处理状态错误
    #[error("状态错误: {0}")]
    State(#[from] crate::orchestrator::TransitionError),
}

/// 输入校验错误
///
/// 只会在批处理开始之前出现
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 必填字段为空
    #[error("字段 `{field}` 不能为空，请填写所有字段后再生成报表")]
    BlankField { field: &'static str },
    /// 路径中含有无法放进查询语句的字符
    #[error("字段 `{field}` 包含不允许的字符 {ch:?}")]
    UnsafePath { field: &'static str, ch: char },
    /// 应用列表去掉空行后为空
    #[error("应用列表中没有检测到有效的应用名称")]
    NoIdentifiers,
}

/// 报表生成器错误
///
/// 由 `ReportGenerator` 返回，流程层会把它降级为单条失败记录
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// 外部进程无法启动
    #[error("无法启动 {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// 输入无法安全地交给外部工具
    #[error("{0}")]
    UnsafeInput(String),
    /// 调用过程中的其他异常
    #[error("{0}")]
    Unexpected(String),
}

/// 文件相关错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件 {path} 失败: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件 {path} 失败: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("解析 TOML 文件 {path} 失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 无法确定程序所在目录
    #[error("无法确定应用程序所在目录: {0}")]
    InstallDirUnknown(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
