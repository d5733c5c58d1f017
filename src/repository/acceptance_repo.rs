// ==========================================
// 设备交付项目门禁系统 - 验收 / 回款数据仓储
// ==========================================
// 表: acceptance_order / acceptance_report / acceptance_issue
//     payment_plan
// ==========================================

use crate::domain::acceptance::{AcceptanceOrder, PaymentPlan};
use crate::domain::types::{
    AcceptanceIssueStatus, AcceptanceResult, AcceptanceStatus, AcceptanceType, PaymentStatus,
};
use crate::repository::error::RepositoryResult;
use crate::repository::sql_utils::{
    build_in_clause, build_not_in_clause, lock_conn, parse_code, parse_optional_code,
    SharedConnection,
};
use rusqlite::{params, params_from_iter};

// ==========================================
// AcceptanceReader - 验收只读接口
// ==========================================
pub trait AcceptanceReader: Send + Sync {
    /// 按类型/状态/结论查询验收单（完成时间倒序）
    fn find_orders(
        &self,
        project_id: &str,
        acceptance_type: AcceptanceType,
        status: AcceptanceStatus,
        result: AcceptanceResult,
    ) -> RepositoryResult<Vec<AcceptanceOrder>>;

    /// 统计验收单已生成的报告数量
    fn count_reports(&self, order_ids: &[String]) -> RepositoryResult<usize>;

    /// 统计验收单下状态 ∉ status_not_in 的问题数量
    fn count_open_issues(
        &self,
        order_ids: &[String],
        status_not_in: &[AcceptanceIssueStatus],
    ) -> RepositoryResult<usize>;
}

// ==========================================
// PaymentReader - 回款计划只读接口
// ==========================================
pub trait PaymentReader: Send + Sync {
    fn list_plans(&self, project_id: &str) -> RepositoryResult<Vec<PaymentPlan>>;
}

// ==========================================
// AcceptanceRepository - SQLite 实现
// ==========================================
pub struct AcceptanceRepository {
    conn: SharedConnection,
}

impl AcceptanceRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

impl AcceptanceReader for AcceptanceRepository {
    fn find_orders(
        &self,
        project_id: &str,
        acceptance_type: AcceptanceType,
        status: AcceptanceStatus,
        result: AcceptanceResult,
    ) -> RepositoryResult<Vec<AcceptanceOrder>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, order_no, project_id, overall_result, completed_at
            FROM acceptance_order
            WHERE project_id = ?1 AND acceptance_type = ?2 AND status = ?3 AND overall_result = ?4
            ORDER BY completed_at DESC, id DESC
            "#,
        )?;

        let rows = stmt
            .query_map(
                params![
                    project_id,
                    acceptance_type.as_str(),
                    status.as_str(),
                    result.as_str()
                ],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, Option<chrono::NaiveDateTime>>(4)?,
                    ))
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, order_no, project_id, overall_result, completed_at)| {
                Ok(AcceptanceOrder {
                    id,
                    order_no,
                    project_id,
                    acceptance_type,
                    status,
                    overall_result: parse_optional_code(
                        "acceptance_order.overall_result",
                        overall_result,
                        AcceptanceResult::from_code,
                    )?,
                    completed_at,
                })
            })
            .collect()
    }

    fn count_reports(&self, order_ids: &[String]) -> RepositoryResult<usize> {
        if order_ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "SELECT COUNT(*) FROM acceptance_report WHERE {}",
            build_in_clause("order_id", order_ids)
        );
        let conn = lock_conn(&self.conn)?;
        let count: i64 = conn.query_row(&sql, params_from_iter(order_ids.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }

    fn count_open_issues(
        &self,
        order_ids: &[String],
        status_not_in: &[AcceptanceIssueStatus],
    ) -> RepositoryResult<usize> {
        if order_ids.is_empty() {
            return Ok(0);
        }
        let statuses: Vec<&str> = status_not_in.iter().map(|s| s.as_str()).collect();
        let sql = format!(
            "SELECT COUNT(*) FROM acceptance_issue WHERE {} AND {}",
            build_in_clause("order_id", order_ids),
            build_not_in_clause("status", &statuses)
        );

        let mut values: Vec<&str> = order_ids.iter().map(|s| s.as_str()).collect();
        values.extend(statuses.iter().copied());

        let conn = lock_conn(&self.conn)?;
        let count: i64 = conn.query_row(&sql, params_from_iter(values.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl PaymentReader for AcceptanceRepository {
    fn list_plans(&self, project_id: &str) -> RepositoryResult<Vec<PaymentPlan>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, project_id, plan_name, planned_amount, actual_amount, status
            FROM payment_plan
            WHERE project_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map(params![project_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<f64>>(3)?,
                    row.get::<_, Option<f64>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, project_id, plan_name, planned, actual, status)| {
                Ok(PaymentPlan {
                    id,
                    project_id,
                    plan_name,
                    planned_amount: planned.unwrap_or(0.0),
                    actual_amount: actual.unwrap_or(0.0),
                    status: parse_code("payment_plan.status", &status, PaymentStatus::from_code)?,
                })
            })
            .collect()
    }
}
