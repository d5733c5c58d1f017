// ==========================================
// 门禁规则单元测试 - 内存数据源
// ==========================================

use crate::domain::acceptance::{AcceptanceOrder, PaymentPlan};
use crate::domain::procurement::{BomHeader, BomItemLine, OutsourcingOrder};
use crate::domain::project::{Contract, Machine, Project, ProjectEvaluation};
use crate::domain::types::*;
use crate::repository::*;
use std::sync::Mutex;

/// 内存数据源：同时实现门禁所需的全部只读接口
#[derive(Default)]
pub struct MemoryGateSource {
    pub projects: Vec<Project>,
    pub machines: Vec<Machine>,
    pub contracts: Vec<Contract>,
    pub evaluations: Vec<ProjectEvaluation>,
    /// (project_id, doc_type, status)
    pub documents: Vec<(String, DocType, DocStatus)>,
    /// (review_id, project_id, review_type, status)
    pub reviews: Vec<(String, String, ReviewType, ReviewStatus)>,
    /// (review_id, level, status)
    pub review_issues: Vec<(String, IssueLevel, ReviewIssueStatus)>,
    pub boms: Vec<BomHeader>,
    pub bom_lines: Vec<BomItemLine>,
    pub outsourcing: Vec<OutsourcingOrder>,
    pub acceptance_orders: Vec<AcceptanceOrder>,
    /// order_id
    pub reports: Vec<String>,
    /// (order_id, status)
    pub acceptance_issues: Vec<(String, AcceptanceIssueStatus)>,
    pub payments: Vec<PaymentPlan>,
    /// (project_id, is_blocking, status)
    pub issues: Vec<(String, bool, IssueStatus)>,
    /// 调用记录（接口方法名）
    pub calls: Mutex<Vec<&'static str>>,
}

impl MemoryGateSource {
    fn record(&self, call: &'static str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn was_called(&self, call: &str) -> bool {
        self.calls.lock().map(|c| c.iter().any(|x| *x == call)).unwrap_or(false)
    }

    pub fn add_machine(&mut self, project_id: &str, code: &str, status: MachineStatus, progress: f64) {
        self.machines.push(Machine {
            id: format!("MID-{}", code),
            project_id: project_id.to_string(),
            machine_code: code.to_string(),
            machine_name: None,
            status,
            progress_pct: progress,
        });
    }

    pub fn add_document(&mut self, project_id: &str, doc_type: DocType, status: DocStatus) {
        self.documents.push((project_id.to_string(), doc_type, status));
    }

    pub fn add_review(&mut self, id: &str, project_id: &str, review_type: ReviewType, status: ReviewStatus) {
        self.reviews
            .push((id.to_string(), project_id.to_string(), review_type, status));
    }

    /// 为设备添加已发布 BOM，返回 BOM ID
    pub fn add_released_bom(&mut self, project_id: &str, machine_code: Option<&str>) -> String {
        let id = format!("BOM-{}", self.boms.len() + 1);
        self.boms.push(BomHeader {
            id: id.clone(),
            project_id: project_id.to_string(),
            machine_id: machine_code.map(|c| format!("MID-{}", c)),
            bom_no: None,
            status: BomStatus::Released,
        });
        id
    }

    pub fn add_bom_line(&mut self, bom_id: &str, material: &str, quantity: f64, available: f64, is_key: bool) {
        self.bom_lines.push(BomItemLine {
            item_id: format!("{}-{}", bom_id, self.bom_lines.len() + 1),
            bom_id: bom_id.to_string(),
            material_code: material.to_string(),
            material_name: None,
            quantity,
            unit_price: None,
            current_stock: available,
            received_qty: 0.0,
            is_key_material: is_key,
            category: None,
        });
    }

    pub fn add_acceptance(
        &mut self,
        id: &str,
        project_id: &str,
        acceptance_type: AcceptanceType,
        status: AcceptanceStatus,
        result: Option<AcceptanceResult>,
    ) {
        self.acceptance_orders.push(AcceptanceOrder {
            id: id.to_string(),
            order_no: Some(id.to_string()),
            project_id: project_id.to_string(),
            acceptance_type,
            status,
            overall_result: result,
            completed_at: None,
        });
    }

    pub fn add_payment(&mut self, project_id: &str, planned: f64, actual: f64, status: PaymentStatus) {
        self.payments.push(PaymentPlan {
            id: format!("PAY-{}", self.payments.len() + 1),
            project_id: project_id.to_string(),
            plan_name: None,
            planned_amount: planned,
            actual_amount: actual,
            status,
        });
    }
}

impl ProjectReader for MemoryGateSource {
    fn find_project(&self, project_id: &str) -> RepositoryResult<Option<Project>> {
        self.record("find_project");
        Ok(self.projects.iter().find(|p| p.id == project_id).cloned())
    }

    fn list_machines(&self, project_id: &str) -> RepositoryResult<Vec<Machine>> {
        self.record("list_machines");
        Ok(self
            .machines
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }

    fn find_contract(&self, contract_id: &str) -> RepositoryResult<Option<Contract>> {
        self.record("find_contract");
        Ok(self.contracts.iter().find(|c| c.id == contract_id).cloned())
    }
}

impl EvaluationReader for MemoryGateSource {
    fn find_confirmed(&self, project_id: &str) -> RepositoryResult<Option<ProjectEvaluation>> {
        self.record("find_confirmed");
        Ok(self
            .evaluations
            .iter()
            .find(|e| e.project_id == project_id && e.status == EvaluationStatus::Confirmed)
            .cloned())
    }
}

impl DocumentReader for MemoryGateSource {
    fn count_approved(&self, project_id: &str, doc_types: &[DocType]) -> RepositoryResult<usize> {
        self.record("count_approved");
        Ok(self
            .documents
            .iter()
            .filter(|(p, t, s)| p == project_id && doc_types.contains(t) && *s == DocStatus::Approved)
            .count())
    }
}

impl ReviewReader for MemoryGateSource {
    fn exists_completed(&self, project_id: &str, review_types: &[ReviewType]) -> RepositoryResult<bool> {
        self.record("exists_completed");
        Ok(self.reviews.iter().any(|(_, p, t, s)| {
            p == project_id && review_types.contains(t) && *s == ReviewStatus::Completed
        }))
    }

    fn list_review_ids(&self, project_id: &str) -> RepositoryResult<Vec<String>> {
        self.record("list_review_ids");
        Ok(self
            .reviews
            .iter()
            .filter(|(_, p, _, _)| p == project_id)
            .map(|(id, _, _, _)| id.clone())
            .collect())
    }

    fn count_issues(
        &self,
        review_ids: &[String],
        level_in: &[IssueLevel],
        status_not_in: &[ReviewIssueStatus],
    ) -> RepositoryResult<usize> {
        self.record("count_issues");
        Ok(self
            .review_issues
            .iter()
            .filter(|(r, l, s)| review_ids.contains(r) && level_in.contains(l) && !status_not_in.contains(s))
            .count())
    }
}

impl BomReader for MemoryGateSource {
    fn count_released_for_project(&self, project_id: &str) -> RepositoryResult<usize> {
        self.record("count_released_for_project");
        Ok(self
            .boms
            .iter()
            .filter(|b| b.project_id == project_id && b.status == BomStatus::Released)
            .count())
    }

    fn find_released_for_machine(&self, machine_id: &str) -> RepositoryResult<Option<BomHeader>> {
        self.record("find_released_for_machine");
        Ok(self
            .boms
            .iter()
            .rev()
            .find(|b| b.machine_id.as_deref() == Some(machine_id) && b.status == BomStatus::Released)
            .cloned())
    }

    fn list_item_lines(&self, bom_id: &str) -> RepositoryResult<Vec<BomItemLine>> {
        self.record("list_item_lines");
        Ok(self.bom_lines.iter().filter(|l| l.bom_id == bom_id).cloned().collect())
    }
}

impl OutsourcingReader for MemoryGateSource {
    fn list_orders(&self, project_id: &str, machine_id: Option<&str>) -> RepositoryResult<Vec<OutsourcingOrder>> {
        self.record("list_orders");
        Ok(self
            .outsourcing
            .iter()
            .filter(|o| o.project_id == project_id && o.machine_id.as_deref() == machine_id)
            .cloned()
            .collect())
    }
}

impl AcceptanceReader for MemoryGateSource {
    fn find_orders(
        &self,
        project_id: &str,
        acceptance_type: AcceptanceType,
        status: AcceptanceStatus,
        result: AcceptanceResult,
    ) -> RepositoryResult<Vec<AcceptanceOrder>> {
        self.record("find_orders");
        Ok(self
            .acceptance_orders
            .iter()
            .filter(|o| {
                o.project_id == project_id
                    && o.acceptance_type == acceptance_type
                    && o.status == status
                    && o.overall_result == Some(result)
            })
            .cloned()
            .collect())
    }

    fn count_reports(&self, order_ids: &[String]) -> RepositoryResult<usize> {
        self.record("count_reports");
        Ok(self.reports.iter().filter(|r| order_ids.contains(*r)).count())
    }

    fn count_open_issues(
        &self,
        order_ids: &[String],
        status_not_in: &[AcceptanceIssueStatus],
    ) -> RepositoryResult<usize> {
        self.record("count_open_issues");
        Ok(self
            .acceptance_issues
            .iter()
            .filter(|(o, s)| order_ids.contains(o) && !status_not_in.contains(s))
            .count())
    }
}

impl PaymentReader for MemoryGateSource {
    fn list_plans(&self, project_id: &str) -> RepositoryResult<Vec<PaymentPlan>> {
        self.record("list_plans");
        Ok(self.payments.iter().filter(|p| p.project_id == project_id).cloned().collect())
    }
}

impl IssueReader for MemoryGateSource {
    fn count_blocking(&self, project_id: &str, status_not_in: &[IssueStatus]) -> RepositoryResult<usize> {
        self.record("count_blocking");
        Ok(self
            .issues
            .iter()
            .filter(|(p, blocking, s)| p == project_id && *blocking && !status_not_in.contains(s))
            .count())
    }
}

/// 以默认配置评估单条规则，返回 (条件列表, missing_items)
pub fn run_rule(
    rule: &dyn super::GateRule,
    source: MemoryGateSource,
    project: &Project,
) -> (Vec<crate::domain::gate::GateCondition>, Vec<String>, std::sync::Arc<MemoryGateSource>) {
    run_rule_with(rule, source, project, crate::config::GateConfig::default())
}

pub fn run_rule_with(
    rule: &dyn super::GateRule,
    source: MemoryGateSource,
    project: &Project,
    config: crate::config::GateConfig,
) -> (Vec<crate::domain::gate::GateCondition>, Vec<String>, std::sync::Arc<MemoryGateSource>) {
    let source = std::sync::Arc::new(source);
    let repos = crate::engine::repositories::GateRepositories::from_source(source.clone());
    let ctx = super::GateContext {
        repos: &repos,
        config: &config,
        kit_rate: &crate::engine::kit_rate::WeightedKitRate,
    };
    let conditions = rule.evaluate(&ctx, project).unwrap();
    let (_, missing) = crate::domain::gate::GateResult::from_conditions(&conditions).into_parts();
    (conditions, missing, source)
}
