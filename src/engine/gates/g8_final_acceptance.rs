// ==========================================
// G8 终验结项门 (S8 → S9)
// ==========================================
// 1. 终验收 (FINAL) 已完成且通过；否则按 SAT 结果给出提示
// 2. 回款: 有回款计划时 实收 / max(合同金额, 计划合计) >= 阈值
//          无计划且合同金额 > 0 时要求建立回款计划
// 3. 项目处于 S8 时，每台设备须已交付或已完成
// ==========================================

use super::{actions, display_pct, with_action, GateContext, GateRule};
use crate::domain::acceptance::PaymentPlan;
use crate::domain::gate::GateCondition;
use crate::domain::project::Project;
use crate::domain::types::{
    AcceptanceResult, AcceptanceStatus, AcceptanceType, GateCode, MachineStatus, Stage,
};
use crate::engine::error::GateEngineResult;

const DELIVERED_STATUSES: [MachineStatus; 2] = [MachineStatus::Delivered, MachineStatus::Completed];

pub struct FinalAcceptanceGate;

/// 回款比例 (0-100，不取整)；分母 <= 0 时返回 None
pub fn payment_rate_pct(plans: &[PaymentPlan], contract_amount: f64) -> Option<f64> {
    let planned: f64 = plans.iter().map(|p| p.planned_amount).sum();
    let paid: f64 = plans.iter().map(|p| p.actual_amount).sum();
    let base = contract_amount.max(planned);
    if base <= 0.0 {
        return None;
    }
    Some(paid * 100.0 / base)
}

impl FinalAcceptanceGate {
    fn acceptance_condition(
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<GateCondition> {
        let acceptance = &ctx.repos.acceptance;
        let completed = |kind, result| {
            acceptance
                .find_orders(&project.id, kind, AcceptanceStatus::Completed, result)
                .map(|orders| !orders.is_empty())
        };

        if completed(AcceptanceType::Final, AcceptanceResult::Passed)? {
            return Ok(GateCondition::passed(
                "final_acceptance",
                "终验收已通过",
                "终验收已通过",
            ));
        }

        let message = if completed(AcceptanceType::Sat, AcceptanceResult::Passed)? {
            "SAT已通过，终验收待完成"
        } else if completed(AcceptanceType::Sat, AcceptanceResult::Failed)? {
            "SAT验收未通过，需整改后重新验收"
        } else {
            "终验收/SAT验收未完成"
        };
        Ok(with_action(
            GateCondition::failed("final_acceptance", "终验收已通过", message),
            actions::ACCEPTANCE,
        ))
    }

    fn payment_condition(
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Option<GateCondition>> {
        let plans = ctx.repos.payments.list_plans(&project.id)?;
        let contract_amount = project.contract_amount_or_zero();
        let threshold = ctx.config.payment_rate_threshold_pct;

        if plans.is_empty() {
            if contract_amount > 0.0 {
                return Ok(Some(with_action(
                    GateCondition::failed("payment_plan", "已设置回款计划", "未设置回款计划"),
                    actions::PAYMENTS,
                )));
            }
            return Ok(None);
        }

        let condition = match payment_rate_pct(&plans, contract_amount) {
            None => GateCondition::passed(
                "payment_rate",
                format!("回款比例≥{}%", threshold),
                "无应收金额",
            ),
            Some(rate) => GateCondition::check(
                "payment_rate",
                format!("回款比例≥{}%", threshold),
                rate >= threshold,
                format!("回款比例{:.1}%", display_pct(rate)),
                format!("回款比例{:.1}%，需≥{}%", display_pct(rate), threshold),
            ),
        };
        Ok(Some(with_action(condition, actions::PAYMENTS)))
    }
}

impl GateRule for FinalAcceptanceGate {
    fn code(&self) -> GateCode {
        GateCode::G8
    }

    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        let mut conditions = vec![Self::acceptance_condition(ctx, project)?];

        if let Some(payment) = Self::payment_condition(ctx, project)? {
            conditions.push(payment);
        }

        if project.stage == Stage::S8 {
            for machine in ctx.repos.projects.list_machines(&project.id)? {
                conditions.push(with_action(
                    GateCondition::check(
                        format!("delivery:{}", machine.machine_code),
                        format!("设备{}已交付", machine.machine_code),
                        DELIVERED_STATUSES.contains(&machine.status),
                        format!("设备{}已交付", machine.machine_code),
                        format!(
                            "设备{}未完成交付（状态{}）",
                            machine.machine_code, machine.status
                        ),
                    ),
                    actions::DELIVERY,
                ));
            }
        }

        Ok(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{PaymentStatus, ProjectStatus};
    use crate::engine::gates::test_support::{run_rule, MemoryGateSource};

    fn project(stage: Stage, contract_amount: Option<f64>) -> Project {
        let mut project = Project::new("P1", stage, ProjectStatus::SatPending);
        project.contract_amount = contract_amount;
        project
    }

    fn final_passed(source: &mut MemoryGateSource) {
        source.add_acceptance(
            "FIN1",
            "P1",
            AcceptanceType::Final,
            AcceptanceStatus::Completed,
            Some(AcceptanceResult::Passed),
        );
    }

    #[test]
    fn test_acceptance_incomplete_and_low_payment() {
        let mut source = MemoryGateSource::default();
        source.add_payment("P1", 300_000.0, 300_000.0, PaymentStatus::Paid);
        source.add_payment("P1", 700_000.0, 200_000.0, PaymentStatus::Partial);

        let (_, missing, _) =
            run_rule(&FinalAcceptanceGate, source, &project(Stage::S8, Some(1_000_000.0)));
        assert_eq!(missing, vec!["终验收/SAT验收未完成", "回款比例50.0%，需≥80%"]);
    }

    #[test]
    fn test_sat_outcomes() {
        let mut source = MemoryGateSource::default();
        source.add_acceptance("SAT1", "P1", AcceptanceType::Sat, AcceptanceStatus::Completed, Some(AcceptanceResult::Passed));
        let (_, missing, _) = run_rule(&FinalAcceptanceGate, source, &project(Stage::S8, None));
        assert_eq!(missing, vec!["SAT已通过，终验收待完成"]);

        let mut source = MemoryGateSource::default();
        source.add_acceptance("SAT1", "P1", AcceptanceType::Sat, AcceptanceStatus::Completed, Some(AcceptanceResult::Failed));
        let (_, missing, _) = run_rule(&FinalAcceptanceGate, source, &project(Stage::S8, None));
        assert_eq!(missing, vec!["SAT验收未通过，需整改后重新验收"]);
    }

    #[test]
    fn test_payment_plan_required_only_with_contract_amount() {
        let mut source = MemoryGateSource::default();
        final_passed(&mut source);
        let (_, missing, _) =
            run_rule(&FinalAcceptanceGate, source, &project(Stage::S8, Some(500_000.0)));
        assert_eq!(missing, vec!["未设置回款计划"]);

        let mut source = MemoryGateSource::default();
        final_passed(&mut source);
        let (conditions, missing, _) =
            run_rule(&FinalAcceptanceGate, source, &project(Stage::S8, None));
        assert!(missing.is_empty());
        assert_eq!(conditions.len(), 1);
    }

    #[test]
    fn test_planned_total_above_contract_is_denominator() {
        let plans = vec![PaymentPlan {
            id: "PAY1".to_string(),
            project_id: "P1".to_string(),
            plan_name: None,
            planned_amount: 200.0,
            actual_amount: 160.0,
            status: PaymentStatus::Partial,
        }];
        assert_eq!(payment_rate_pct(&plans, 100.0), Some(80.0));
        assert_eq!(payment_rate_pct(&plans, 400.0), Some(40.0));
        assert_eq!(payment_rate_pct(&[], 0.0), None);
    }

    #[test]
    fn test_payment_rate_just_under_threshold_fails() {
        for paid in [79_996.0, 79_960.0] {
            let mut source = MemoryGateSource::default();
            final_passed(&mut source);
            source.add_payment("P1", 100_000.0, paid, PaymentStatus::Partial);
            let (_, missing, _) =
                run_rule(&FinalAcceptanceGate, source, &project(Stage::S9, Some(100_000.0)));
            assert_eq!(missing, vec!["回款比例79.9%，需≥80%"], "实收 {}", paid);
        }

        let mut source = MemoryGateSource::default();
        final_passed(&mut source);
        source.add_payment("P1", 100_000.0, 80_000.0, PaymentStatus::Partial);
        let (_, missing, _) =
            run_rule(&FinalAcceptanceGate, source, &project(Stage::S9, Some(100_000.0)));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_zero_denominator_passes() {
        let mut source = MemoryGateSource::default();
        final_passed(&mut source);
        source.add_payment("P1", 0.0, 0.0, PaymentStatus::Pending);
        let (conditions, missing, _) =
            run_rule(&FinalAcceptanceGate, source, &project(Stage::S8, Some(0.0)));
        assert!(missing.is_empty());
        assert_eq!(conditions.len(), 2);
    }

    #[test]
    fn test_delivery_checked_only_at_s8() {
        let mut source = MemoryGateSource::default();
        final_passed(&mut source);
        source.add_machine("P1", "M01", MachineStatus::Delivered, 100.0);
        source.add_machine("P1", "M02", MachineStatus::Shipped, 100.0);
        let (_, missing, _) = run_rule(&FinalAcceptanceGate, source, &project(Stage::S8, None));
        assert_eq!(missing, vec!["设备M02未完成交付（状态SHIPPED）"]);

        let mut source = MemoryGateSource::default();
        final_passed(&mut source);
        source.add_machine("P1", "M02", MachineStatus::Shipped, 100.0);
        let (_, missing, source) =
            run_rule(&FinalAcceptanceGate, source, &project(Stage::S7, None));
        assert!(missing.is_empty());
        assert!(!source.was_called("list_machines"));
    }
}
