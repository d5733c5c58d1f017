// ==========================================
// 设备交付项目门禁系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、门禁结果模型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod acceptance;
pub mod gate;
pub mod procurement;
pub mod project;
pub mod types;

// 重导出核心类型
pub use acceptance::{AcceptanceOrder, PaymentPlan};
pub use gate::{
    list_gate_definitions, ConditionStatus, GateAction, GateCondition, GateDefinition,
    GateDetailResult, GateResult, GATE_DEFINITIONS,
};
pub use procurement::{BomHeader, BomItemLine, OutsourcingOrder, KEY_MATERIAL_CATEGORIES};
pub use project::{is_set, Contract, Machine, Project, ProjectEvaluation};
pub use types::{
    AcceptanceIssueStatus, AcceptanceResult, AcceptanceStatus, AcceptanceType, BomStatus,
    ContractStatus, DocStatus, DocType, EvaluationStatus, GateCode, IssueLevel, IssueStatus,
    KitRateBasis, MachineStatus, OutsourcingStatus, PaymentStatus, ProjectStatus,
    ReviewIssueStatus, ReviewStatus, ReviewType, Stage,
};
