// ==========================================
// G4 设计冻结门 (S4 → S5)
// ==========================================
// 1. 方案/设计评审已完成，或存在已审批的设计/方案文档
// 2. 项目已有已发布 BOM；有设备时逐台检查设备 BOM
// 3. 存在已审批的设计类文档
// ==========================================

use super::{actions, with_action, GateContext, GateRule};
use crate::domain::gate::GateCondition;
use crate::domain::project::Project;
use crate::domain::types::{DocType, GateCode, ReviewType};
use crate::engine::error::GateEngineResult;

const DESIGN_REVIEW_TYPES: [ReviewType; 3] =
    [ReviewType::Ddr, ReviewType::Scheme, ReviewType::Design];

const DESIGN_REVIEW_DOC_TYPES: [DocType; 2] = [DocType::Design, DocType::Scheme];

const DESIGN_DOC_TYPES: [DocType; 5] = [
    DocType::Design,
    DocType::Scheme,
    DocType::Drawing,
    DocType::Electrical,
    DocType::Software,
];

pub struct DesignGate;

impl GateRule for DesignGate {
    fn code(&self) -> GateCode {
        GateCode::G4
    }

    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        let repos = ctx.repos;
        let mut conditions = Vec::new();

        // 评审记录优先，没有时再看文档
        let reviewed = repos
            .reviews
            .exists_completed(&project.id, &DESIGN_REVIEW_TYPES)?
            || repos
                .documents
                .count_approved(&project.id, &DESIGN_REVIEW_DOC_TYPES)?
                > 0;
        conditions.push(with_action(
            GateCondition::check(
                "design_review",
                "方案/设计评审已完成",
                reviewed,
                "方案/设计评审已完成",
                "方案/设计评审未完成",
            ),
            actions::REVIEWS,
        ));

        let released = repos.boms.count_released_for_project(&project.id)?;
        conditions.push(with_action(
            GateCondition::check(
                "project_bom",
                "项目BOM已发布",
                released > 0,
                format!("已发布BOM {} 份", released),
                "项目BOM未发布",
            ),
            actions::BOM,
        ));

        if released > 0 {
            for machine in repos.projects.list_machines(&project.id)? {
                let has_bom = repos.boms.find_released_for_machine(&machine.id)?.is_some();
                conditions.push(with_action(
                    GateCondition::check(
                        format!("machine_bom:{}", machine.machine_code),
                        format!("设备{}的BOM已发布", machine.machine_code),
                        has_bom,
                        format!("设备{}的BOM已发布", machine.machine_code),
                        format!("设备{}的BOM未发布", machine.machine_code),
                    ),
                    actions::BOM,
                ));
            }
        }

        let design_docs = repos
            .documents
            .count_approved(&project.id, &DESIGN_DOC_TYPES)?;
        conditions.push(with_action(
            GateCondition::check(
                "design_documents",
                "设计文档已审批",
                design_docs > 0,
                format!("已审批设计文档 {} 份", design_docs),
                "缺少已审批的设计文档",
            ),
            actions::DOCUMENTS,
        ));

        Ok(conditions)
    }
}
