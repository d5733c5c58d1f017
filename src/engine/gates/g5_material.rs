// ==========================================
// G5 物料齐套门 (S5 → S6)
// ==========================================
// 无设备直接失败。逐台设备（按列表顺序）:
//   1. 已发布 BOM（缺失时跳过该设备的齐套/关键件检查）
//   2. 齐套率 >= 阈值（默认 80%，含等于）
//   3. 关键物料 库存 + 已到货 >= 需求
//   4. 该设备未完成/未关闭的外协单全部到齐
// 最后检查未关联设备的项目级外协单
// ==========================================

use super::{actions, display_pct, with_action, GateContext, GateRule};
use crate::domain::gate::GateCondition;
use crate::domain::procurement::OutsourcingOrder;
use crate::domain::project::{Machine, Project};
use crate::domain::types::GateCode;
use crate::engine::error::GateEngineResult;

pub struct MaterialKitGate;

impl MaterialKitGate {
    fn machine_material_conditions(
        ctx: &GateContext<'_>,
        machine: &Machine,
        conditions: &mut Vec<GateCondition>,
    ) -> GateEngineResult<()> {
        let code = &machine.machine_code;

        let bom = match ctx.repos.boms.find_released_for_machine(&machine.id)? {
            Some(bom) => bom,
            None => {
                conditions.push(with_action(
                    GateCondition::failed(
                        format!("machine_bom:{}", code),
                        format!("设备{}的BOM已发布", code),
                        format!("设备{}的BOM未发布", code),
                    ),
                    actions::BOM,
                ));
                return Ok(());
            }
        };

        let lines = ctx.repos.boms.list_item_lines(&bom.id)?;
        let threshold = ctx.config.kit_rate_threshold_pct;
        let rate = ctx.kit_rate.compute(&lines, ctx.config.kit_rate_basis);
        tracing::debug!(
            machine = %code,
            bom_id = %bom.id,
            kit_rate_pct = rate.kit_rate_pct,
            short_lines = rate.short_lines,
            "齐套率计算完成"
        );
        let shown = display_pct(rate.kit_rate_pct);
        conditions.push(with_action(
            GateCondition::check(
                format!("kit_rate:{}", code),
                format!("设备{}齐套率≥{}%", code, threshold),
                rate.kit_rate_pct >= threshold,
                format!("设备{}齐套率{:.1}%", code, shown),
                format!("设备{}齐套率{:.1}%，需≥{}%", code, shown, threshold),
            ),
            actions::PROCUREMENT,
        ));

        for line in lines.iter().filter(|l| l.is_key()) {
            let material = line.material_name.as_deref().unwrap_or(&line.material_code);
            let available = line.available_qty();
            conditions.push(with_action(
                GateCondition::check(
                    format!("key_material:{}:{}", code, line.material_code),
                    format!("设备{}关键物料{}到齐", code, material),
                    available >= line.quantity,
                    format!("设备{}关键物料{}已到齐", code, material),
                    format!(
                        "设备{}关键物料{}缺料（可用{}/需求{}）",
                        code, material, available, line.quantity
                    ),
                ),
                actions::PROCUREMENT,
            ));
        }

        Ok(())
    }
}

/// 外协单到货检查（已完成/已关闭的单据不参与）
fn outsourcing_conditions(orders: Vec<OutsourcingOrder>, conditions: &mut Vec<GateCondition>) {
    for order in orders.into_iter().filter(|o| !o.status.is_finished()) {
        conditions.push(with_action(
            GateCondition::check(
                format!("outsourcing:{}", order.order_no),
                format!("外协单{}到齐", order.order_no),
                order.is_fully_delivered(),
                format!("外协单{}已到齐", order.order_no),
                format!(
                    "外协单{}未到齐（已到{}/订购{}）",
                    order.order_no, order.delivered_qty, order.ordered_qty
                ),
            ),
            actions::OUTSOURCING,
        ));
    }
}

impl GateRule for MaterialKitGate {
    fn code(&self) -> GateCode {
        GateCode::G5
    }

    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        let machines = ctx.repos.projects.list_machines(&project.id)?;
        if machines.is_empty() {
            return Ok(vec![with_action(
                GateCondition::failed("machines", "项目下有设备", "项目下无设备"),
                actions::PROJECT_INFO,
            )]);
        }

        let mut conditions = Vec::new();
        for machine in &machines {
            Self::machine_material_conditions(ctx, machine, &mut conditions)?;
            let orders = ctx
                .repos
                .outsourcing
                .list_orders(&project.id, Some(&machine.id))?;
            outsourcing_conditions(orders, &mut conditions);
        }

        let project_orders = ctx.repos.outsourcing.list_orders(&project.id, None)?;
        outsourcing_conditions(project_orders, &mut conditions);

        Ok(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;
    use crate::domain::types::{
        KitRateBasis, MachineStatus, OutsourcingStatus, ProjectStatus, Stage,
    };
    use crate::engine::gates::test_support::{run_rule, run_rule_with, MemoryGateSource};

    fn project() -> Project {
        Project::new("P1", Stage::S5, ProjectStatus::Purchasing)
    }

    fn order(no: &str, machine: Option<&str>, status: OutsourcingStatus, ordered: f64, delivered: f64) -> OutsourcingOrder {
        OutsourcingOrder {
            id: format!("ID-{}", no),
            order_no: no.to_string(),
            project_id: "P1".to_string(),
            machine_id: machine.map(|m| format!("MID-{}", m)),
            status,
            ordered_qty: ordered,
            delivered_qty: delivered,
        }
    }

    /// 单台设备，BOM 一行，可用量决定齐套率
    fn single_machine(quantity: f64, available: f64) -> MemoryGateSource {
        let mut source = MemoryGateSource::default();
        source.add_machine("P1", "M01", MachineStatus::Purchasing, 0.0);
        let bom = source.add_released_bom("P1", Some("M01"));
        source.add_bom_line(&bom, "MAT-001", quantity, available, false);
        source
    }

    #[test]
    fn test_no_machines_fails_immediately() {
        let (conditions, missing, source) =
            run_rule(&MaterialKitGate, MemoryGateSource::default(), &project());
        assert_eq!(conditions.len(), 1);
        assert_eq!(missing, vec!["项目下无设备"]);
        assert!(!source.was_called("list_orders"));
    }

    #[test]
    fn test_kit_rate_sixty_percent_fails_with_formatted_message() {
        let (_, missing, _) = run_rule(&MaterialKitGate, single_machine(10.0, 6.0), &project());
        assert_eq!(missing.len(), 1);
        assert!(missing[0].contains("M01"));
        assert!(missing[0].contains("60.0%"));
        assert!(missing[0].contains("需≥80%"));
    }

    #[test]
    fn test_kit_rate_exactly_at_threshold_passes() {
        let (_, missing, _) = run_rule(&MaterialKitGate, single_machine(10.0, 8.0), &project());
        assert!(missing.is_empty());
    }

    #[test]
    fn test_kit_rate_just_below_threshold_fails() {
        let (_, missing, _) = run_rule(&MaterialKitGate, single_machine(1000.0, 799.0), &project());
        assert_eq!(missing, vec!["设备M01齐套率79.9%，需≥80%"]);
    }

    #[test]
    fn test_rate_just_under_threshold_is_not_rounded_up() {
        // 79.996%
        let (_, missing, _) =
            run_rule(&MaterialKitGate, single_machine(100_000.0, 79_996.0), &project());
        assert_eq!(missing, vec!["设备M01齐套率79.9%，需≥80%"]);

        // 79.96% 展示为 79.9%，不会显示为 80.0%
        let (_, missing, _) =
            run_rule(&MaterialKitGate, single_machine(10_000.0, 7_996.0), &project());
        assert_eq!(missing, vec!["设备M01齐套率79.9%，需≥80%"]);
    }

    #[test]
    fn test_key_material_shortage_reported_even_when_rate_ok() {
        let mut source = single_machine(100.0, 100.0);
        let bom = source.boms[0].id.clone();
        source.add_bom_line(&bom, "SERVO-01", 2.0, 1.0, true);

        let (_, missing, _) = run_rule(&MaterialKitGate, source, &project());
        assert_eq!(missing, vec!["设备M01关键物料SERVO-01缺料（可用1/需求2）"]);
    }

    #[test]
    fn test_missing_bom_skips_kit_checks_but_not_outsourcing() {
        let mut source = MemoryGateSource::default();
        source.add_machine("P1", "M01", MachineStatus::Purchasing, 0.0);
        source
            .outsourcing
            .push(order("WX-01", Some("M01"), OutsourcingStatus::Ordered, 10.0, 4.0));

        let (_, missing, source) = run_rule(&MaterialKitGate, source, &project());
        assert_eq!(
            missing,
            vec!["设备M01的BOM未发布", "外协单WX-01未到齐（已到4/订购10）"]
        );
        assert!(!source.was_called("list_item_lines"));
    }

    #[test]
    fn test_completed_and_closed_orders_skipped_and_project_orders_checked_last() {
        let mut source = single_machine(10.0, 10.0);
        source
            .outsourcing
            .push(order("WX-01", Some("M01"), OutsourcingStatus::Closed, 10.0, 0.0));
        source
            .outsourcing
            .push(order("WX-02", Some("M01"), OutsourcingStatus::Cancelled, 10.0, 0.0));
        source
            .outsourcing
            .push(order("WX-03", None, OutsourcingStatus::PartialDelivered, 5.0, 3.0));
        source
            .outsourcing
            .push(order("WX-04", Some("M01"), OutsourcingStatus::Delivered, 5.0, 5.0));

        source
            .outsourcing
            .push(order("WX-05", Some("M01"), OutsourcingStatus::Completed, 8.0, 2.0));

        let (_, missing, _) = run_rule(&MaterialKitGate, source, &project());
        // 已取消的外协单仍需到齐
        assert_eq!(
            missing,
            vec![
                "外协单WX-02未到齐（已到0/订购10）",
                "外协单WX-03未到齐（已到3/订购5）",
            ]
        );
    }

    #[test]
    fn test_configured_threshold_and_value_basis() {
        let mut source = MemoryGateSource::default();
        source.add_machine("P1", "M01", MachineStatus::Purchasing, 0.0);
        let bom = source.add_released_bom("P1", Some("M01"));
        source.add_bom_line(&bom, "CHEAP", 10.0, 0.0, false);
        source.add_bom_line(&bom, "PRICY", 1.0, 1.0, false);
        source.bom_lines[0].unit_price = Some(1.0);
        source.bom_lines[1].unit_price = Some(90.0);

        let config = GateConfig {
            kit_rate_basis: KitRateBasis::Value,
            kit_rate_threshold_pct: 90.0,
            ..GateConfig::default()
        };
        let (_, missing, _) = run_rule_with(&MaterialKitGate, source, &project(), config);
        assert!(missing.is_empty());
    }
}
