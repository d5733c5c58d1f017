// ==========================================
// G3 立项签约门 (S3 → S4)
// ==========================================
// 1. (gate_require_contract 开启时) 已关联合同；关联合同ID时合同状态须为 SIGNED
// 2. 已完成立项类评审；无评审记录时以项目状态是否处于审批通过之后兜底
// ==========================================

use super::{actions, with_action, GateContext, GateRule};
use crate::domain::gate::GateCondition;
use crate::domain::project::{is_set, Project};
use crate::domain::types::{ContractStatus, GateCode, ReviewType};
use crate::engine::error::GateEngineResult;

const APPROVAL_REVIEW_TYPES: [ReviewType; 3] = [
    ReviewType::Proposal,
    ReviewType::Approval,
    ReviewType::ProjectApproval,
];

pub struct ContractGate;

impl ContractGate {
    fn contract_conditions(
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        if !project.has_contract_link() {
            return Ok(vec![with_action(
                GateCondition::failed("contract_linked", "已关联合同", "未关联合同"),
                actions::CONTRACTS,
            )]);
        }

        let mut conditions = vec![GateCondition::passed(
            "contract_linked",
            "已关联合同",
            "已关联合同",
        )];

        let contract_id = match project.contract_id.as_deref() {
            Some(id) if is_set(&project.contract_id) => id.trim(),
            _ => return Ok(conditions),
        };

        let signed = match ctx.repos.projects.find_contract(contract_id)? {
            None => GateCondition::failed("contract_signed", "合同已签订", "关联合同不存在"),
            Some(contract) if contract.status == ContractStatus::Signed => {
                GateCondition::passed("contract_signed", "合同已签订", "合同已签订")
            }
            Some(contract) => GateCondition::failed(
                "contract_signed",
                "合同已签订",
                format!("合同未签订（当前状态：{}）", contract.status),
            ),
        };
        conditions.push(with_action(signed, actions::CONTRACTS));
        Ok(conditions)
    }
}

impl GateRule for ContractGate {
    fn code(&self) -> GateCode {
        GateCode::G3
    }

    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        let mut conditions = if ctx.config.require_contract {
            Self::contract_conditions(ctx, project)?
        } else {
            Vec::new()
        };

        let reviewed = ctx
            .repos
            .reviews
            .exists_completed(&project.id, &APPROVAL_REVIEW_TYPES)?;
        let approved = reviewed || project.status.is_post_approval();
        if !reviewed && approved {
            tracing::debug!(
                project_id = %project.id,
                status = %project.status,
                "无立项评审记录，按项目状态判定审批已通过"
            );
        }

        conditions.push(with_action(
            GateCondition::check(
                "project_approval",
                "立项审批已完成",
                approved,
                "立项审批已完成",
                "立项审批未完成",
            ),
            actions::REVIEWS,
        ));

        Ok(conditions)
    }
}
