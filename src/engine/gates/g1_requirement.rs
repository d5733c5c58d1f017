// ==========================================
// G1 需求评估门 (S1 → S2)
// ==========================================
// 1. 项目名称 / 客户 / 客户名称 / 联系人 / 联系电话 / 需求描述 逐项检查
// 2. 存在已确认的项目评估，且难度评分、工作量评分均非空
// ==========================================

use super::{actions, with_action, GateContext, GateRule};
use crate::domain::gate::GateCondition;
use crate::domain::project::{is_set, Project};
use crate::domain::types::GateCode;
use crate::engine::error::GateEngineResult;

pub struct RequirementGate;

/// 文本字段必填检查
fn required_field(
    name: &str,
    label: &str,
    value: &Option<String>,
    failed_message: &str,
) -> GateCondition {
    with_action(
        GateCondition::check(
            name,
            format!("{}已填写", label),
            is_set(value),
            format!("{}已填写", label),
            failed_message,
        ),
        actions::PROJECT_INFO,
    )
}

impl GateRule for RequirementGate {
    fn code(&self) -> GateCode {
        GateCode::G1
    }

    fn evaluate(
        &self,
        ctx: &GateContext<'_>,
        project: &Project,
    ) -> GateEngineResult<Vec<GateCondition>> {
        let mut conditions = vec![
            required_field("project_name", "项目名称", &project.project_name, "项目名称未填写"),
            required_field("customer_id", "关联客户", &project.customer_id, "未关联客户"),
            required_field("customer_name", "客户名称", &project.customer_name, "客户名称未填写"),
            required_field("contact_name", "客户联系人", &project.contact_name, "客户联系人未填写"),
            required_field("contact_phone", "客户联系电话", &project.contact_phone, "客户联系电话未填写"),
            required_field("requirements", "需求描述", &project.requirements, "需求描述未填写"),
        ];

        match ctx.repos.evaluations.find_confirmed(&project.id)? {
            None => {
                conditions.push(with_action(
                    GateCondition::failed("evaluation_confirmed", "项目评估已确认", "项目评估未确认"),
                    actions::EVALUATION,
                ));
            }
            Some(evaluation) => {
                conditions.push(GateCondition::passed(
                    "evaluation_confirmed",
                    "项目评估已确认",
                    "项目评估已确认",
                ));
                conditions.push(with_action(
                    GateCondition::check(
                        "difficulty_score",
                        "项目评估包含难度评分",
                        evaluation.difficulty_score.is_some(),
                        "难度评分已填写",
                        "项目评估缺少难度评分",
                    ),
                    actions::EVALUATION,
                ));
                conditions.push(with_action(
                    GateCondition::check(
                        "workload_score",
                        "项目评估包含工作量评分",
                        evaluation.workload_score.is_some(),
                        "工作量评分已填写",
                        "项目评估缺少工作量评分",
                    ),
                    actions::EVALUATION,
                ));
            }
        }

        Ok(conditions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ProjectEvaluation;
    use crate::domain::types::{EvaluationStatus, ProjectStatus, Stage};
    use crate::engine::gates::test_support::{run_rule, MemoryGateSource};

    fn complete_project() -> Project {
        let mut project = Project::new("P1", Stage::S1, ProjectStatus::Evaluated);
        project.project_name = Some("包装线改造".to_string());
        project.customer_id = Some("C001".to_string());
        project.customer_name = Some("华东食品".to_string());
        project.contact_name = Some("王工".to_string());
        project.contact_phone = Some("13800000000".to_string());
        project.requirements = Some("产能 120 包/分钟".to_string());
        project
    }

    fn evaluation(difficulty: Option<f64>, workload: Option<f64>) -> ProjectEvaluation {
        ProjectEvaluation {
            id: "E1".to_string(),
            project_id: "P1".to_string(),
            status: EvaluationStatus::Confirmed,
            difficulty_score: difficulty,
            workload_score: workload,
            evaluated_at: None,
        }
    }

    #[test]
    fn test_complete_project_passes() {
        let mut source = MemoryGateSource::default();
        source.evaluations.push(evaluation(Some(3.0), Some(5.0)));

        let (conditions, missing, _) = run_rule(&RequirementGate, source, &complete_project());
        assert!(missing.is_empty());
        assert_eq!(conditions.len(), 9);
    }

    #[test]
    fn test_one_message_per_missing_field_in_order() {
        let mut source = MemoryGateSource::default();
        source.evaluations.push(evaluation(Some(3.0), Some(5.0)));
        let project = Project::new("P1", Stage::S1, ProjectStatus::Draft);

        let (_, missing, _) = run_rule(&RequirementGate, source, &project);
        assert_eq!(
            missing,
            vec![
                "项目名称未填写",
                "未关联客户",
                "客户名称未填写",
                "客户联系人未填写",
                "客户联系电话未填写",
                "需求描述未填写",
            ]
        );
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let mut source = MemoryGateSource::default();
        source.evaluations.push(evaluation(Some(3.0), Some(5.0)));
        let mut project = complete_project();
        project.contact_phone = Some("   ".to_string());

        let (_, missing, _) = run_rule(&RequirementGate, source, &project);
        assert_eq!(missing, vec!["客户联系电话未填写"]);
    }

    #[test]
    fn test_missing_evaluation_yields_single_message() {
        let mut source = MemoryGateSource::default();
        let mut draft = evaluation(Some(3.0), Some(5.0));
        draft.status = EvaluationStatus::Submitted;
        source.evaluations.push(draft);

        let (_, missing, _) = run_rule(&RequirementGate, source, &complete_project());
        assert_eq!(missing, vec!["项目评估未确认"]);
    }

    #[test]
    fn test_each_missing_score_has_own_message() {
        let mut source = MemoryGateSource::default();
        source.evaluations.push(evaluation(None, None));

        let (_, missing, _) = run_rule(&RequirementGate, source, &complete_project());
        assert_eq!(missing, vec!["项目评估缺少难度评分", "项目评估缺少工作量评分"]);
    }
}
