// ==========================================
// G7 出厂验收门 (S7 → S8)
// ==========================================
// 1. 存在已完成且结论为通过的 FAT
//    否则区分“FAT 未通过”与“FAT 未完成”
// 2. FAT 通过时: 已生成验收报告，且无未关闭的验收问题
// ==========================================

use super::{actions, with_action, GateContext, GateRule};
use crate::domain::gate::GateCondition;
use crate::domain::project::Project;
use crate::domain::types::{
    AcceptanceIssueStatus, AcceptanceResult, AcceptanceStatus, AcceptanceType, GateCode,
};
use crate::engine::error::GateEngineResult;

const ACCEPTANCE_ISSUE_DONE: [AcceptanceIssueStatus; 2] =
    [AcceptanceIssueStatus::Resolved, AcceptanceIssueStatus::Closed];

pub struct FactoryAcceptanceGate;

impl GateRule for FactoryAcceptanceGate {
    fn code(&self) -> GateCode {
        GateCode::G7
    }

    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        let acceptance = &ctx.repos.acceptance;
        let passed_orders = acceptance.find_orders(
            &project.id,
            AcceptanceType::Fat,
            AcceptanceStatus::Completed,
            AcceptanceResult::Passed,
        )?;

        if passed_orders.is_empty() {
            let failed = !acceptance
                .find_orders(
                    &project.id,
                    AcceptanceType::Fat,
                    AcceptanceStatus::Completed,
                    AcceptanceResult::Failed,
                )?
                .is_empty();
            let message = if failed {
                "FAT验收未通过，需整改后重新验收"
            } else {
                "FAT验收未完成"
            };
            return Ok(vec![with_action(
                GateCondition::failed("fat_passed", "FAT验收已通过", message),
                actions::ACCEPTANCE,
            )]);
        }

        let order_ids: Vec<String> = passed_orders.into_iter().map(|o| o.id).collect();
        let mut conditions = vec![GateCondition::passed(
            "fat_passed",
            "FAT验收已通过",
            "FAT验收已通过",
        )];

        let reports = acceptance.count_reports(&order_ids)?;
        conditions.push(with_action(
            GateCondition::check(
                "fat_report",
                "FAT验收报告已生成",
                reports > 0,
                "FAT验收报告已生成",
                "FAT验收报告未生成",
            ),
            actions::ACCEPTANCE,
        ));

        let open_issues = acceptance.count_open_issues(&order_ids, &ACCEPTANCE_ISSUE_DONE)?;
        conditions.push(with_action(
            GateCondition::check(
                "fat_issues",
                "FAT验收问题已关闭",
                open_issues == 0,
                "FAT验收问题已全部关闭",
                format!("FAT存在{}个未关闭的验收问题", open_issues),
            ),
            actions::ACCEPTANCE,
        ));

        Ok(conditions)
    }
}
