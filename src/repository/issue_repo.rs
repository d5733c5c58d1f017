// ==========================================
// 设备交付项目门禁系统 - 项目问题数据仓储
// ==========================================
// 表: issue
// ==========================================

use crate::domain::types::IssueStatus;
use crate::repository::error::RepositoryResult;
use crate::repository::sql_utils::{build_not_in_clause, lock_conn, SharedConnection};
use rusqlite::params_from_iter;

/// 项目问题只读接口
pub trait IssueReader: Send + Sync {
    /// 统计阻塞问题数量（状态 ∉ status_not_in）
    fn count_blocking(
        &self,
        project_id: &str,
        status_not_in: &[IssueStatus],
    ) -> RepositoryResult<usize>;
}

pub struct IssueRepository {
    conn: SharedConnection,
}

impl IssueRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl IssueReader for IssueRepository {
    fn count_blocking(
        &self,
        project_id: &str,
        status_not_in: &[IssueStatus],
    ) -> RepositoryResult<usize> {
        let statuses: Vec<&str> = status_not_in.iter().map(|s| s.as_str()).collect();
        let sql = format!(
            "SELECT COUNT(*) FROM issue WHERE project_id = ? AND is_blocking = 1 AND {}",
            build_not_in_clause("status", &statuses)
        );

        let mut values: Vec<&str> = vec![project_id];
        values.extend(statuses.iter().copied());

        let conn = lock_conn(&self.conn)?;
        let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }
}
