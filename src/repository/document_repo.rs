// ==========================================
// 设备交付项目门禁系统 - 文档 / 评审数据仓储
// ==========================================
// 表: document / technical_review / review_issue
// ==========================================

use crate::domain::types::{DocStatus, DocType, IssueLevel, ReviewIssueStatus, ReviewStatus, ReviewType};
use crate::repository::error::RepositoryResult;
use crate::repository::sql_utils::{
    build_in_clause, build_not_in_clause, lock_conn, SharedConnection,
};
use rusqlite::{params, params_from_iter};

// ==========================================
// DocumentReader - 文档只读接口
// ==========================================
pub trait DocumentReader: Send + Sync {
    /// 统计项目下指定类型的已审批文档数量
    fn count_approved(&self, project_id: &str, doc_types: &[DocType]) -> RepositoryResult<usize>;
}

// ==========================================
// ReviewReader - 技术评审只读接口
// ==========================================
pub trait ReviewReader: Send + Sync {
    /// 是否存在指定类型的已完成评审
    fn exists_completed(
        &self,
        project_id: &str,
        review_types: &[ReviewType],
    ) -> RepositoryResult<bool>;

    /// 项目下全部评审ID
    fn list_review_ids(&self, project_id: &str) -> RepositoryResult<Vec<String>>;

    /// 统计评审问题数量（等级 ∈ level_in 且状态 ∉ status_not_in）
    fn count_issues(
        &self,
        review_ids: &[String],
        level_in: &[IssueLevel],
        status_not_in: &[ReviewIssueStatus],
    ) -> RepositoryResult<usize>;
}

// ==========================================
// DocumentRepository - SQLite 实现
// ==========================================
pub struct DocumentRepository {
    conn: SharedConnection,
}

impl DocumentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl DocumentReader for DocumentRepository {
    fn count_approved(&self, project_id: &str, doc_types: &[DocType]) -> RepositoryResult<usize> {
        let types: Vec<&str> = doc_types.iter().map(|t| t.as_str()).collect();
        let sql = format!(
            "SELECT COUNT(*) FROM document WHERE project_id = ? AND status = ? AND {}",
            build_in_clause("doc_type", &types)
        );

        let mut values: Vec<&str> = vec![project_id, DocStatus::Approved.as_str()];
        values.extend(types.iter().copied());

        let conn = lock_conn(&self.conn)?;
        let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl ReviewReader for DocumentRepository {
    fn exists_completed(
        &self,
        project_id: &str,
        review_types: &[ReviewType],
    ) -> RepositoryResult<bool> {
        let types: Vec<&str> = review_types.iter().map(|t| t.as_str()).collect();
        let sql = format!(
            "SELECT COUNT(*) FROM technical_review WHERE project_id = ? AND status = ? AND {}",
            build_in_clause("review_type", &types)
        );

        let mut values: Vec<&str> = vec![project_id, ReviewStatus::Completed.as_str()];
        values.extend(types.iter().copied());

        let conn = lock_conn(&self.conn)?;
        let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        Ok(count > 0)
    }

    fn list_review_ids(&self, project_id: &str) -> RepositoryResult<Vec<String>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt =
            conn.prepare("SELECT id FROM technical_review WHERE project_id = ?1 ORDER BY id")?;
        let ids = stmt
            .query_map(params![project_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids)
    }

    fn count_issues(
        &self,
        review_ids: &[String],
        level_in: &[IssueLevel],
        status_not_in: &[ReviewIssueStatus],
    ) -> RepositoryResult<usize> {
        if review_ids.is_empty() {
            return Ok(0);
        }

        let levels: Vec<&str> = level_in.iter().map(|l| l.as_str()).collect();
        let statuses: Vec<&str> = status_not_in.iter().map(|s| s.as_str()).collect();
        let sql = format!(
            "SELECT COUNT(*) FROM review_issue WHERE {} AND {} AND {}",
            build_in_clause("review_id", review_ids),
            build_in_clause("level", &levels),
            build_not_in_clause("status", &statuses)
        );

        let mut values: Vec<&str> = review_ids.iter().map(|s| s.as_str()).collect();
        values.extend(levels.iter().copied());
        values.extend(statuses.iter().copied());

        let conn = lock_conn(&self.conn)?;
        let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }
}
