// ==========================================
// 设备交付项目门禁系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑，门禁引擎只读
// ==========================================
// 职责: 定义门禁所需的只读接口 (Reader trait)，并提供 SQLite 实现
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod acceptance_repo;
pub mod document_repo;
pub mod error;
pub mod issue_repo;
pub mod procurement_repo;
pub mod project_repo;
pub mod sql_utils;

// 重导出只读接口
pub use acceptance_repo::{AcceptanceReader, AcceptanceRepository, PaymentReader};
pub use document_repo::{DocumentReader, DocumentRepository, ReviewReader};
pub use error::{RepositoryError, RepositoryResult};
pub use issue_repo::{IssueReader, IssueRepository};
pub use procurement_repo::{BomReader, OutsourcingReader, ProcurementRepository};
pub use project_repo::{EvaluationReader, ProjectReader, ProjectRepository};
pub use sql_utils::SharedConnection;
