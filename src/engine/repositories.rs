// ==========================================
// 设备交付项目门禁系统 - 引擎层仓储聚合
// ==========================================
// 职责: 聚合门禁规则所需的全部只读接口
// 目标: 依赖显式注入，便于单元测试替换为内存实现
// ==========================================

use std::sync::Arc;

use crate::repository::{
    AcceptanceReader, AcceptanceRepository, BomReader, DocumentReader, DocumentRepository,
    EvaluationReader, IssueReader, IssueRepository, OutsourcingReader, PaymentReader,
    ProcurementRepository, ProjectReader, ProjectRepository, ReviewReader, SharedConnection,
};

/// 门禁仓储集合
///
/// 每条门禁规则只读取其需要的接口；同一实现可同时充当多个接口。
#[derive(Clone)]
pub struct GateRepositories {
    pub projects: Arc<dyn ProjectReader>,
    pub evaluations: Arc<dyn EvaluationReader>,
    pub documents: Arc<dyn DocumentReader>,
    pub reviews: Arc<dyn ReviewReader>,
    pub boms: Arc<dyn BomReader>,
    pub outsourcing: Arc<dyn OutsourcingReader>,
    pub acceptance: Arc<dyn AcceptanceReader>,
    pub payments: Arc<dyn PaymentReader>,
    pub issues: Arc<dyn IssueReader>,
}

impl GateRepositories {
    /// 基于同一 SQLite 连接装配全部仓储
    pub fn from_connection(conn: SharedConnection) -> Self {
        let project_repo = Arc::new(ProjectRepository::from_connection(conn.clone()));
        let document_repo = Arc::new(DocumentRepository::from_connection(conn.clone()));
        let procurement_repo = Arc::new(ProcurementRepository::from_connection(conn.clone()));
        let acceptance_repo = Arc::new(AcceptanceRepository::from_connection(conn.clone()));
        let issue_repo = Arc::new(IssueRepository::from_connection(conn));

        Self {
            projects: project_repo.clone(),
            evaluations: project_repo,
            documents: document_repo.clone(),
            reviews: document_repo,
            boms: procurement_repo.clone(),
            outsourcing: procurement_repo,
            acceptance: acceptance_repo.clone(),
            payments: acceptance_repo,
            issues: issue_repo,
        }
    }

    /// 由单个实现了全部接口的数据源装配（测试替身常用）
    pub fn from_source<S>(source: Arc<S>) -> Self
    where
        S: ProjectReader
            + EvaluationReader
            + DocumentReader
            + ReviewReader
            + BomReader
            + OutsourcingReader
            + AcceptanceReader
            + PaymentReader
            + IssueReader
            + 'static,
    {
        Self {
            projects: source.clone(),
            evaluations: source.clone(),
            documents: source.clone(),
            reviews: source.clone(),
            boms: source.clone(),
            outsourcing: source.clone(),
            acceptance: source.clone(),
            payments: source.clone(),
            issues: source,
        }
    }
}
