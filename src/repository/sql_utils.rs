// ==========================================
// 设备交付项目门禁系统 - 仓储公共工具
// ==========================================
// 职责: 连接加锁、IN 子句构建、编码字段解析
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

/// 仓储共享连接
pub type SharedConnection = Arc<Mutex<Connection>>;

/// 获取连接锁（锁中毒视为 LockError）
pub fn lock_conn(conn: &SharedConnection) -> RepositoryResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|e| RepositoryError::LockError(e.to_string()))
}

/// 构建 IN 子句的 SQL 片段
///
/// 空列表返回永假条件，保证 SQL 语法正确。
///
/// ```
/// use project_gate::repository::sql_utils::build_in_clause;
///
/// let types = vec!["DESIGN", "SCHEME"];
/// assert_eq!(build_in_clause("doc_type", &types), "doc_type IN (?, ?)");
///
/// let empty: Vec<String> = vec![];
/// assert_eq!(build_in_clause("doc_type", &empty), "1 = 0");
/// ```
pub fn build_in_clause<T: AsRef<str>>(column_name: &str, values: &[T]) -> String {
    if values.is_empty() {
        return "1 = 0".to_string();
    }

    let placeholders = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    format!("{} IN ({})", column_name, placeholders)
}

/// 构建 NOT IN 子句（空列表返回永真条件）
pub fn build_not_in_clause<T: AsRef<str>>(column_name: &str, values: &[T]) -> String {
    if values.is_empty() {
        return "1 = 1".to_string();
    }

    let placeholders = values.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
    format!("{} NOT IN ({})", column_name, placeholders)
}

/// 解析编码字段，未知编码视为字段错误
pub fn parse_code<T>(
    field: &str,
    raw: &str,
    parser: impl Fn(&str) -> Option<T>,
) -> RepositoryResult<T> {
    parser(raw).ok_or_else(|| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("未知编码 {}", raw),
    })
}

/// 解析可空编码字段（NULL / 空串视为 None）
pub fn parse_optional_code<T>(
    field: &str,
    raw: Option<String>,
    parser: impl Fn(&str) -> Option<T>,
) -> RepositoryResult<Option<T>> {
    match raw {
        Some(v) if !v.trim().is_empty() => parse_code(field, &v, parser).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::Stage;

    #[test]
    fn test_not_in_clause() {
        assert_eq!(
            build_not_in_clause("status", &["RESOLVED", "CLOSED"]),
            "status NOT IN (?, ?)"
        );
        let empty: [&str; 0] = [];
        assert_eq!(build_not_in_clause("status", &empty), "1 = 1");
    }

    #[test]
    fn test_parse_code() {
        assert_eq!(parse_code("stage", "S3", Stage::from_code).unwrap(), Stage::S3);
        let err = parse_code("stage", "S0", Stage::from_code).unwrap_err();
        assert!(matches!(err, RepositoryError::FieldValueError { .. }));
        assert_eq!(
            parse_optional_code("stage", Some(" ".to_string()), Stage::from_code).unwrap(),
            None
        );
    }
}
