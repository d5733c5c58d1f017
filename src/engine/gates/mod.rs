// ==========================================
// 设备交付项目门禁系统 - 门禁规则 (G1-G8)
// ==========================================
// 职责: 每个门禁一条规则，按固定顺序输出条件列表
// 红线: 只读、无副作用；条件未满足不返回错误
// ==========================================
// 条件顺序即 missing_items 顺序，属于对外契约
// ==========================================

pub mod g1_requirement;
pub mod g2_solution;
pub mod g3_contract;
pub mod g4_design;
pub mod g5_material;
pub mod g6_assembly;
pub mod g7_factory_acceptance;
pub mod g8_final_acceptance;

pub use g1_requirement::RequirementGate;
pub use g2_solution::SolutionGate;
pub use g3_contract::ContractGate;
pub use g4_design::DesignGate;
pub use g5_material::MaterialKitGate;
pub use g6_assembly::AssemblyGate;
pub use g7_factory_acceptance::FactoryAcceptanceGate;
pub use g8_final_acceptance::FinalAcceptanceGate;

use crate::config::GateConfig;
use crate::domain::gate::GateCondition;
use crate::domain::project::Project;
use crate::domain::types::GateCode;
use crate::engine::error::GateEngineResult;
use crate::engine::kit_rate::KitRateStrategy;
use crate::engine::repositories::GateRepositories;

/// 规则评估上下文
pub struct GateContext<'a> {
    pub repos: &'a GateRepositories,
    pub config: &'a GateConfig,
    pub kit_rate: &'a dyn KitRateStrategy,
}

/// 门禁规则
pub trait GateRule: Send + Sync {
    fn code(&self) -> GateCode;

    /// 按固定顺序评估全部子条件
    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>>;
}

/// 门禁编码到规则的固定映射
pub fn rule_for(code: GateCode) -> &'static dyn GateRule {
    match code {
        GateCode::G1 => &RequirementGate,
        GateCode::G2 => &SolutionGate,
        GateCode::G3 => &ContractGate,
        GateCode::G4 => &DesignGate,
        GateCode::G5 => &MaterialKitGate,
        GateCode::G6 => &AssemblyGate,
        GateCode::G7 => &FactoryAcceptanceGate,
        GateCode::G8 => &FinalAcceptanceGate,
    }
}

// ==========================================
// 处理指引 (reference, label)
// ==========================================
pub(crate) mod actions {
    pub const PROJECT_INFO: (&str, &str) = ("project_info", "项目信息");
    pub const EVALUATION: (&str, &str) = ("project_evaluation", "项目评估");
    pub const DOCUMENTS: (&str, &str) = ("documents", "文档管理");
    pub const REVIEWS: (&str, &str) = ("technical_reviews", "技术评审");
    pub const CONTRACTS: (&str, &str) = ("contracts", "合同管理");
    pub const BOM: (&str, &str) = ("bom", "BOM管理");
    pub const PROCUREMENT: (&str, &str) = ("procurement", "采购管理");
    pub const OUTSOURCING: (&str, &str) = ("outsourcing", "外协管理");
    pub const ASSEMBLY: (&str, &str) = ("assembly", "装配进度");
    pub const ISSUES: (&str, &str) = ("issues", "问题管理");
    pub const ACCEPTANCE: (&str, &str) = ("acceptance", "验收管理");
    pub const PAYMENTS: (&str, &str) = ("payments", "回款管理");
    pub const DELIVERY: (&str, &str) = ("delivery", "发运交付");
}

/// 百分比展示值：向零截断到 1 位小数
///
/// 判定始终使用原值；截断保证未达阈值的比例不会显示为达到阈值。
pub(crate) fn display_pct(value: f64) -> f64 {
    (value * 10.0).trunc() / 10.0
}

/// 附加处理指引
pub(crate) fn with_action(condition: GateCondition, action: (&str, &str)) -> GateCondition {
    condition.with_action(action.0, action.1)
}

#[cfg(test)]
pub(crate) mod test_support;
