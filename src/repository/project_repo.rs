// ==========================================
// 设备交付项目门禁系统 - 项目数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 表: project / machine / contract / project_evaluation
// ==========================================

use crate::domain::project::{Contract, Machine, Project, ProjectEvaluation};
use crate::domain::types::{
    ContractStatus, EvaluationStatus, MachineStatus, ProjectStatus, Stage,
};
use crate::repository::error::RepositoryResult;
use crate::repository::sql_utils::{lock_conn, parse_code, SharedConnection};
use rusqlite::{params, OptionalExtension, Row};

// ==========================================
// ProjectReader - 项目只读接口
// ==========================================
pub trait ProjectReader: Send + Sync {
    /// 按ID查询项目快照
    fn find_project(&self, project_id: &str) -> RepositoryResult<Option<Project>>;

    /// 查询项目下全部设备（按设备编码排序）
    fn list_machines(&self, project_id: &str) -> RepositoryResult<Vec<Machine>>;

    /// 按ID查询合同
    fn find_contract(&self, contract_id: &str) -> RepositoryResult<Option<Contract>>;
}

// ==========================================
// EvaluationReader - 项目评估只读接口
// ==========================================
pub trait EvaluationReader: Send + Sync {
    /// 查询项目最近一次已确认的评估
    fn find_confirmed(&self, project_id: &str) -> RepositoryResult<Option<ProjectEvaluation>>;
}

// ==========================================
// ProjectRepository - SQLite 实现
// ==========================================
pub struct ProjectRepository {
    conn: SharedConnection,
}

impl ProjectRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn map_project(row: &Row<'_>) -> rusqlite::Result<(Project, String, String)> {
        let stage_raw: String = row.get(3)?;
        let status_raw: String = row.get(4)?;
        let mut project = Project::new(row.get::<_, String>(0)?, Stage::S1, ProjectStatus::Draft);
        project.project_no = row.get(1)?;
        project.project_name = row.get(2)?;
        project.customer_id = row.get(5)?;
        project.customer_name = row.get(6)?;
        project.contact_name = row.get(7)?;
        project.contact_phone = row.get(8)?;
        project.requirements = row.get(9)?;
        project.contract_id = row.get(10)?;
        project.contract_no = row.get(11)?;
        project.contract_amount = row.get(12)?;
        project.budget_amount = row.get(13)?;
        project.actual_cost = row.get(14)?;
        project.progress_pct = row.get::<_, Option<f64>>(15)?.unwrap_or(0.0);
        Ok((project, stage_raw, status_raw))
    }
}

impl ProjectReader for ProjectRepository {
    fn find_project(&self, project_id: &str) -> RepositoryResult<Option<Project>> {
        let conn = lock_conn(&self.conn)?;
        let raw = conn
            .query_row(
                r#"
                SELECT
                    id, project_no, project_name, stage, status,
                    customer_id, customer_name, contact_name, contact_phone,
                    requirements, contract_id, contract_no, contract_amount,
                    budget_amount, actual_cost, progress_pct
                FROM project
                WHERE id = ?1
                "#,
                params![project_id],
                Self::map_project,
            )
            .optional()?;

        match raw {
            Some((mut project, stage_raw, status_raw)) => {
                project.stage = parse_code("project.stage", &stage_raw, Stage::from_code)?;
                project.status =
                    parse_code("project.status", &status_raw, ProjectStatus::from_code)?;
                Ok(Some(project))
            }
            None => Ok(None),
        }
    }

    fn list_machines(&self, project_id: &str) -> RepositoryResult<Vec<Machine>> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, project_id, machine_code, machine_name, status, progress_pct
            FROM machine
            WHERE project_id = ?1
            ORDER BY machine_code ASC
            "#,
        )?;

        let rows = stmt
            .query_map(params![project_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Option<f64>>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, project_id, machine_code, machine_name, status, progress)| {
                Ok(Machine {
                    id,
                    project_id,
                    machine_code,
                    machine_name,
                    status: parse_code("machine.status", &status, MachineStatus::from_code)?,
                    progress_pct: progress.unwrap_or(0.0),
                })
            })
            .collect()
    }

    fn find_contract(&self, contract_id: &str) -> RepositoryResult<Option<Contract>> {
        let conn = lock_conn(&self.conn)?;
        let raw = conn
            .query_row(
                "SELECT id, contract_no, status, amount FROM contract WHERE id = ?1",
                params![contract_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<f64>>(3)?,
                    ))
                },
            )
            .optional()?;

        raw.map(|(id, contract_no, status, amount)| {
            Ok(Contract {
                id,
                contract_no,
                status: parse_code("contract.status", &status, ContractStatus::from_code)?,
                amount,
            })
        })
        .transpose()
    }
}

impl EvaluationReader for ProjectRepository {
    fn find_confirmed(&self, project_id: &str) -> RepositoryResult<Option<ProjectEvaluation>> {
        let conn = lock_conn(&self.conn)?;
        let evaluation = conn
            .query_row(
                r#"
                SELECT id, project_id, difficulty_score, workload_score, evaluated_at
                FROM project_evaluation
                WHERE project_id = ?1 AND status = ?2
                ORDER BY evaluated_at DESC
                LIMIT 1
                "#,
                params![project_id, EvaluationStatus::Confirmed.as_str()],
                |row| {
                    Ok(ProjectEvaluation {
                        id: row.get(0)?,
                        project_id: row.get(1)?,
                        status: EvaluationStatus::Confirmed,
                        difficulty_score: row.get(2)?,
                        workload_score: row.get(3)?,
                        evaluated_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(evaluation)
    }
}
