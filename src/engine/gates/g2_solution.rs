// ==========================================
// G2 方案确认门 (S2 → S3)
// ==========================================
// 1. 至少一份已审批的需求/规格文档
// 2. 需求描述包含“验收标准”字样（关键字判定，非语义判定）
// ==========================================

use super::{actions, with_action, GateContext, GateRule};
use crate::domain::gate::GateCondition;
use crate::domain::project::Project;
use crate::domain::types::{DocType, GateCode};
use crate::engine::error::GateEngineResult;

/// 需求中必须出现的关键字
pub const ACCEPTANCE_CRITERIA_KEYWORD: &str = "验收标准";

const REQUIREMENT_DOC_TYPES: [DocType; 2] = [DocType::Requirement, DocType::Specification];

pub struct SolutionGate;

impl GateRule for SolutionGate {
    fn code(&self) -> GateCode {
        GateCode::G2
    }

    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        let approved = ctx
            .repos
            .documents
            .count_approved(&project.id, &REQUIREMENT_DOC_TYPES)?;

        let has_criteria = project
            .requirements
            .as_deref()
            .map(|r| r.contains(ACCEPTANCE_CRITERIA_KEYWORD))
            .unwrap_or(false);

        Ok(vec![
            with_action(
                GateCondition::check(
                    "requirement_document",
                    "需求/规格文档已审批",
                    approved > 0,
                    format!("已审批需求/规格文档 {} 份", approved),
                    "缺少已审批的需求/规格文档",
                ),
                actions::DOCUMENTS,
            ),
            with_action(
                GateCondition::check(
                    "acceptance_criteria",
                    "需求描述包含验收标准",
                    has_criteria,
                    "需求描述已包含验收标准",
                    "需求描述中未包含验收标准",
                ),
                actions::PROJECT_INFO,
            ),
        ])
    }
}
