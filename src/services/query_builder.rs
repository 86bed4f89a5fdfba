//! 查询构建 - 业务能力层
//!
//! 为 LogParser 生成参数数组。不经过 shell，目标文件通过 `INTO` 子句指定

use std::path::Path;

use thiserror::Error;

use crate::config::Config;

/// 报表字段 `(日志字段, 列名)`，顺序和集合都固定
pub const REPORT_FIELDS: [(&str, &str); 14] = [
    ("date", "Fecha"),
    ("time", "Hora"),
    ("s-sitename", "Sitio"),
    ("s-ip", "IP_Servidor"),
    ("cs-method", "Metodo"),
    ("cs-uri-stem", "Ruta"),
    ("cs-uri-query", "Consulta_Ruta"),
    ("s-port", "Puerto_Servidor"),
    ("cs-username", "Usuario"),
    ("c-ip", "IP_Cliente"),
    ("cs(User-Agent)", "UserAgent"),
    ("sc-status", "Estado_Respuesta"),
    ("sc-substatus", "Subestado_Respuesta"),
    ("sc-win32-status", "Estado_Win32"),
];

/// 过滤条件所作用的字段
pub const FILTER_FIELD: &str = "cs-uri-stem";

/// 会破坏查询语句或被 shell 解释的字符
const UNSAFE_CHARS: [char; 9] = ['\'', '"', '`', '%', ';', '|', '&', '<', '>'];

/// 不能安全地放进查询语句的输入
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{what} 包含不安全的字符 {ch:?}: {value}")]
pub struct UnsafeInput {
    pub what: &'static str,
    pub value: String,
    pub ch: char,
}

/// 检查应用名能否作为过滤条件
pub fn check_filter_value(identifier: &str) -> Result<(), UnsafeInput> {
    check_text("应用名", identifier, |c| UNSAFE_CHARS.contains(&c) || c.is_control())
}

fn check_path(what: &'static str, path: &Path) -> Result<String, UnsafeInput> {
    let text = path.display().to_string();
    check_text(what, &text, |c| c == '\'' || c.is_control())?;
    Ok(text)
}

fn check_text(
    what: &'static str,
    value: &str,
    is_unsafe: impl Fn(char) -> bool,
) -> Result<(), UnsafeInput> {
    match value.chars().find(|c| is_unsafe(*c)) {
        Some(ch) => Err(UnsafeInput {
            what,
            value: value.to_string(),
            ch,
        }),
        None => Ok(()),
    }
}

/// 查询构建器
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    input_format: String,
    output_format: String,
    log_file_pattern: String,
}

impl QueryBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            input_format: config.input_format.clone(),
            output_format: config.output_format.clone(),
            log_file_pattern: config.log_file_pattern.clone(),
        }
    }

    /// 构建查询语句
    ///
    /// `SELECT <14 个字段> INTO '<目标文件>' FROM '<日志目录>/*.log' WHERE cs-uri-stem LIKE '%<应用名>%'`
    pub fn build_query(
        &self,
        destination: &Path,
        log_source: &Path,
        identifier: &str,
    ) -> Result<String, UnsafeInput> {
        check_filter_value(identifier)?;
        let destination = check_path("目标文件", destination)?;
        let source = check_path("日志目录", &log_source.join(&self.log_file_pattern))?;

        let fields = REPORT_FIELDS
            .iter()
            .map(|(field, alias)| format!("{} AS {}", field, alias))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!(
            "SELECT {} INTO '{}' FROM '{}' WHERE {} LIKE '%{}%'",
            fields, destination, source, FILTER_FIELD, identifier
        ))
    }

    /// 构建完整参数数组
    pub fn build_args(
        &self,
        destination: &Path,
        log_source: &Path,
        identifier: &str,
    ) -> Result<Vec<String>, UnsafeInput> {
        let query = self.build_query(destination, log_source, identifier)?;
        Ok(vec![
            query,
            format!("-i:{}", self.input_format),
            format!("-o:{}", self.output_format),
        ])
    }
}
