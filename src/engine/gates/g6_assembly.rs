// ==========================================
// G6 装配完工门 (S6 → S7)
// ==========================================
// 无设备直接失败，不再查询文档与问题。
// 1. 每台设备 进度 == 100 且状态 ∈ {ASSEMBLED, READY, COMPLETED}
// 2. 存在已审批的调试/测试文档
// 3. 无未解决的阻塞问题
// 4. 无未关闭的 A/B 类评审问题
// ==========================================

use super::{actions, with_action, GateContext, GateRule};
use crate::domain::gate::GateCondition;
use crate::domain::project::Project;
use crate::domain::types::{
    DocType, GateCode, IssueLevel, IssueStatus, MachineStatus, ReviewIssueStatus,
};
use crate::engine::error::GateEngineResult;

const ASSEMBLED_STATUSES: [MachineStatus; 3] = [
    MachineStatus::Assembled,
    MachineStatus::Ready,
    MachineStatus::Completed,
];

const DEBUG_DOC_TYPES: [DocType; 3] = [DocType::Debug, DocType::Test, DocType::Commissioning];

const BLOCKING_DONE: [IssueStatus; 2] = [IssueStatus::Resolved, IssueStatus::Closed];

const REVIEW_ISSUE_LEVELS: [IssueLevel; 2] = [IssueLevel::A, IssueLevel::B];

const REVIEW_ISSUE_DONE: [ReviewIssueStatus; 3] = [
    ReviewIssueStatus::Resolved,
    ReviewIssueStatus::Verified,
    ReviewIssueStatus::Closed,
];

pub struct AssemblyGate;

impl GateRule for AssemblyGate {
    fn code(&self) -> GateCode {
        GateCode::G6
    }

    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        let repos = ctx.repos;
        let machines = repos.projects.list_machines(&project.id)?;
        if machines.is_empty() {
            return Ok(vec![with_action(
                GateCondition::failed("machines", "项目下有设备", "项目下无设备"),
                actions::PROJECT_INFO,
            )]);
        }

        let mut conditions = Vec::with_capacity(machines.len() + 3);

        for machine in &machines {
            let done = machine.progress_pct == 100.0 && ASSEMBLED_STATUSES.contains(&machine.status);
            conditions.push(with_action(
                GateCondition::check(
                    format!("assembly:{}", machine.machine_code),
                    format!("设备{}装配完成", machine.machine_code),
                    done,
                    format!("设备{}装配已完成", machine.machine_code),
                    format!(
                        "设备{}装配未完成（进度{}%，状态{}）",
                        machine.machine_code, machine.progress_pct, machine.status
                    ),
                ),
                actions::ASSEMBLY,
            ));
        }

        let debug_docs = repos.documents.count_approved(&project.id, &DEBUG_DOC_TYPES)?;
        conditions.push(with_action(
            GateCondition::check(
                "debug_documents",
                "调试/测试文档已审批",
                debug_docs > 0,
                format!("已审批调试/测试文档 {} 份", debug_docs),
                "缺少已审批的调试/测试文档",
            ),
            actions::DOCUMENTS,
        ));

        let blocking = repos.issues.count_blocking(&project.id, &BLOCKING_DONE)?;
        conditions.push(with_action(
            GateCondition::check(
                "blocking_issues",
                "无未解决的阻塞问题",
                blocking == 0,
                "无未解决的阻塞问题",
                format!("存在{}个未解决的阻塞问题", blocking),
            ),
            actions::ISSUES,
        ));

        let review_ids = repos.reviews.list_review_ids(&project.id)?;
        let open_review_issues = if review_ids.is_empty() {
            0
        } else {
            repos
                .reviews
                .count_issues(&review_ids, &REVIEW_ISSUE_LEVELS, &REVIEW_ISSUE_DONE)?
        };
        conditions.push(with_action(
            GateCondition::check(
                "review_issues",
                "无未关闭的A/B类评审问题",
                open_review_issues == 0,
                "无未关闭的A/B类评审问题",
                format!("存在{}个未关闭的A/B类评审问题", open_review_issues),
            ),
            actions::REVIEWS,
        ));

        Ok(conditions)
    }
}
