//! 报表文件名 - 业务能力层
//!
//! 纯函数，不做任何 I/O

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 报表文件扩展名
pub const REPORT_EXTENSION: &str = ".csv";

/// 文件系统中不能出现的字符，统一替换为下划线
const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// 把应用名转换成可用作文件名的字符串
///
/// 1. 空格和路径保留字符替换为 `_`
/// 2. NFD 分解后去掉组合附加符号（`é` → `e`）
/// 3. 去掉剩余的空白字符
/// 4. 没有 `.csv` 后缀时补上
///
/// ```
/// use iis_report_batch::services::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("Café App"), "Cafe_App.csv");
/// assert_eq!(sanitize_file_name("already.csv"), "already.csv");
/// ```
pub fn sanitize_file_name(identifier: &str) -> String {
    let mut name: String = identifier
        .chars()
        .map(|c| if c == ' ' || RESERVED_CHARS.contains(&c) { '_' } else { c })
        .nfd()
        .filter(|c| !c.is_whitespace() && !is_combining_mark(*c))
        .collect();

    if !name.ends_with(REPORT_EXTENSION) {
        name.push_str(REPORT_EXTENSION);
    }

    name
}

/// 去掉扩展名后是否为空
pub fn is_blank_file_name(file_name: &str) -> bool {
    file_name
        .strip_suffix(REPORT_EXTENSION)
        .map_or(file_name.is_empty(), str::is_empty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_and_spaces() {
        assert_eq!(sanitize_file_name("Café App"), "Cafe_App.csv");
        assert_eq!(sanitize_file_name("Gestión Nómina"), "Gestion_Nomina.csv");
        assert_eq!(sanitize_file_name("Ñandú"), "Nandu.csv");
    }

    #[test]
    fn test_no_double_extension() {
        assert_eq!(sanitize_file_name("already.csv"), "already.csv");
        assert_eq!(sanitize_file_name("report.CSV"), "report.CSV.csv");
    }

    #[test]
    fn test_other_whitespace_is_removed() {
        assert_eq!(sanitize_file_name("a\tb\u{00A0}c"), "abc.csv");
    }

    #[test]
    fn test_path_characters_cannot_escape_output_dir() {
        assert_eq!(sanitize_file_name("/api/v1"), "_api_v1.csv");
        assert_eq!(sanitize_file_name("..\\secret"), ".._secret.csv");
    }

    #[test]
    fn test_deterministic() {
        let first = sanitize_file_name("Módulo de Pagos");
        let second = sanitize_file_name("Módulo de Pagos");
        assert_eq!(first, second);
    }

    #[test]
    fn test_blank_file_name() {
        assert!(is_blank_file_name(&sanitize_file_name("\u{0301}\u{0308}")));
        assert!(is_blank_file_name(".csv"));
        assert!(!is_blank_file_name("a.csv"));
    }
}
