// ==========================================
// 设备交付项目门禁系统 - 门禁详细结果
// ==========================================
// 职责: 在 GateResult 之上补充门禁元数据、条件统计、进度与处理建议
// ==========================================

use tracing::debug;

use crate::domain::gate::{GateCondition, GateDetailResult};
use crate::domain::project::Project;
use crate::engine::error::GateEngineResult;
use crate::engine::registry::GateRegistry;

/// 待处理事项摘要最多展示条数
const SUMMARY_ITEM_LIMIT: usize = 3;

pub struct GateDetailEngine {
    registry: GateRegistry,
}

impl GateDetailEngine {
    pub fn new(registry: GateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &GateRegistry {
        &self.registry
    }

    /// 门禁详细检查
    pub fn check_gate_detailed(
        &self,
        target_stage: &str,
        project: &Project,
    ) -> GateEngineResult<GateDetailResult> {
        let evaluation = match self.registry.evaluate(target_stage, project)? {
            Some(evaluation) => evaluation,
            None => return Ok(GateDetailResult::unconstrained(target_stage)),
        };

        let definition = evaluation.definition;
        let (passed, missing_items) = evaluation.result.into_parts();
        let conditions = evaluation.conditions;

        let (total, passed_count) = if conditions.is_empty() {
            let total = missing_items.len();
            (total, total - missing_items.len())
        } else {
            (
                conditions.len(),
                conditions.iter().filter(|c| c.is_passed()).count(),
            )
        };
        let failed_count = total - passed_count;

        let suggestions = if passed {
            Vec::new()
        } else {
            build_suggestions(failed_count, &missing_items, &conditions)
        };
        debug!(
            gate = %definition.gate_code,
            total,
            passed_count,
            suggestions = suggestions.len(),
            "门禁详细结果生成"
        );

        Ok(GateDetailResult {
            gate_code: definition.gate_code.to_string(),
            gate_name: definition.gate_name.to_string(),
            from_stage: definition.from_stage.to_string(),
            to_stage: definition.to_stage.to_string(),
            passed,
            total_conditions: total,
            passed_conditions: passed_count,
            failed_conditions: failed_count,
            conditions,
            missing_items,
            suggestions,
            progress_pct: progress_pct(passed_count, total),
        })
    }

    /// 按项目ID加载后做详细检查
    pub fn check_gate_detailed_by_id(
        &self,
        target_stage: &str,
        project_id: &str,
    ) -> GateEngineResult<GateDetailResult> {
        let project = self.registry.load_project(project_id)?;
        self.check_gate_detailed(target_stage, &project)
    }
}

/// 通过百分比，保留 1 位小数；无条件时为 100
pub fn progress_pct(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    (passed as f64 / total as f64 * 1000.0).round() / 10.0
}

fn build_suggestions(
    failed_count: usize,
    missing_items: &[String],
    conditions: &[GateCondition],
) -> Vec<String> {
    let mut suggestions = vec![format!(
        "共有{}项条件未满足，请处理后再推进阶段",
        failed_count
    )];

    if !missing_items.is_empty() {
        let head: Vec<&str> = missing_items
            .iter()
            .take(SUMMARY_ITEM_LIMIT)
            .map(String::as_str)
            .collect();
        let more = if missing_items.len() > SUMMARY_ITEM_LIMIT {
            "…"
        } else {
            ""
        };
        suggestions.push(format!("待处理事项：{}{}", head.join("；"), more));
    }

    let mut labels: Vec<&str> = Vec::new();
    for action in conditions
        .iter()
        .filter(|c| !c.is_passed())
        .filter_map(|c| c.action.as_ref())
    {
        if !labels.contains(&action.label.as_str()) {
            labels.push(action.label.as_str());
        }
    }
    suggestions.extend(labels.into_iter().map(|label| format!("请前往「{}」处理", label)));

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GateConfig;
    use crate::domain::types::{DocStatus, DocType, ProjectStatus, Stage};
    use crate::engine::gates::test_support::MemoryGateSource;
    use crate::engine::repositories::GateRepositories;
    use std::sync::Arc;

    fn engine(source: MemoryGateSource) -> GateDetailEngine {
        GateDetailEngine::new(GateRegistry::new(
            GateRepositories::from_source(Arc::new(source)),
            GateConfig::default(),
        ))
    }

    #[test]
    fn test_progress_rounding() {
        assert_eq!(progress_pct(0, 0), 100.0);
        assert_eq!(progress_pct(1, 3), 33.3);
        assert_eq!(progress_pct(2, 3), 66.7);
        assert_eq!(progress_pct(9, 9), 100.0);
    }

    #[test]
    fn test_unknown_target_shell() {
        let project = Project::new("P1", Stage::S1, ProjectStatus::Draft);
        let detail = engine(MemoryGateSource::default())
            .check_gate_detailed("S99", &project)
            .unwrap();
        assert!(detail.passed);
        assert_eq!(detail.gate_code, "");
        assert_eq!(detail.to_stage, "S99");
        assert_eq!(detail.total_conditions, 0);
        assert_eq!(detail.progress_pct, 100.0);
        assert!(detail.suggestions.is_empty());
    }

    #[test]
    fn test_failed_gate_statistics_and_suggestions() {
        // G1: 全部字段缺失 + 无评估 => 7 个条件全部失败
        let project = Project::new("P1", Stage::S1, ProjectStatus::Draft);
        let detail = engine(MemoryGateSource::default())
            .check_gate_detailed("S2", &project)
            .unwrap();

        assert_eq!(detail.gate_code, "G1");
        assert_eq!(detail.gate_name, "需求评估门");
        assert_eq!(detail.from_stage, "S1");
        assert_eq!(detail.to_stage, "S2");
        assert!(!detail.passed);
        assert_eq!(detail.total_conditions, 7);
        assert_eq!(detail.passed_conditions, 0);
        assert_eq!(detail.failed_conditions, 7);
        assert_eq!(detail.progress_pct, 0.0);
        assert_eq!(
            detail.suggestions,
            vec![
                "共有7项条件未满足，请处理后再推进阶段".to_string(),
                "待处理事项：项目名称未填写；未关联客户；客户名称未填写…".to_string(),
                "请前往「项目信息」处理".to_string(),
                "请前往「项目评估」处理".to_string(),
            ]
        );
    }

    #[test]
    fn test_partial_progress() {
        // G2: 文档已审批，缺验收标准 => 1/2
        let mut source = MemoryGateSource::default();
        source.add_document("P1", DocType::Requirement, DocStatus::Approved);
        let project = Project::new("P1", Stage::S2, ProjectStatus::SolutionReviewing);

        let detail = engine(source).check_gate_detailed("S3", &project).unwrap();
        assert_eq!(detail.total_conditions, 2);
        assert_eq!(detail.passed_conditions, 1);
        assert_eq!(detail.progress_pct, 50.0);
        assert_eq!(
            detail.suggestions,
            vec![
                "共有1项条件未满足，请处理后再推进阶段".to_string(),
                "待处理事项：需求描述中未包含验收标准".to_string(),
                "请前往「项目信息」处理".to_string(),
            ]
        );
        assert_eq!(
            detail.progress_pct,
            progress_pct(detail.passed_conditions, detail.total_conditions)
        );
    }

    #[test]
    fn test_detail_serializes_snake_case() {
        let project = Project::new("P1", Stage::S1, ProjectStatus::Draft);
        let detail = engine(MemoryGateSource::default())
            .check_gate_detailed("S2", &project)
            .unwrap();
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["gate_code"], "G1");
        assert_eq!(json["total_conditions"], 7);
        assert_eq!(json["conditions"][0]["status"], "FAILED");
    }
}
