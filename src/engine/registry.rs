// ==========================================
// 设备交付项目门禁系统 - 门禁注册表
// ==========================================
// 职责: 目标阶段 → 门禁规则分派，归约为 GateResult
// 映射: S2→G1, S3→G2, ..., S9→G8
// 红线: 只读；条件未满足不返回错误，协作方错误原样传播
// ==========================================

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::{GateConfig, GateConfigReader, UnknownStagePolicy};
use crate::domain::gate::{GateCondition, GateDefinition, GateResult};
use crate::domain::project::Project;
use crate::domain::types::GateCode;
use crate::engine::error::{GateEngineError, GateEngineResult};
use crate::engine::gates::{rule_for, GateContext};
use crate::engine::kit_rate::{KitRateStrategy, WeightedKitRate};
use crate::engine::repositories::GateRepositories;
use crate::perf::GateEvalGuard;

/// 单次门禁评估的完整产出
#[derive(Debug, Clone)]
pub struct GateEvaluation {
    pub definition: &'static GateDefinition,
    pub conditions: Vec<GateCondition>,
    pub result: GateResult,
}

// ==========================================
// GateRegistry - 门禁注册表
// ==========================================
pub struct GateRegistry {
    repos: GateRepositories,
    config: GateConfig,
    kit_rate: Arc<dyn KitRateStrategy>,
}

impl GateRegistry {
    /// 使用默认齐套率策略创建
    pub fn new(repos: GateRepositories, config: GateConfig) -> Self {
        Self {
            repos,
            config,
            kit_rate: Arc::new(WeightedKitRate),
        }
    }

    /// 通过配置读取接口加载配置后创建
    pub fn from_config_reader(
        repos: GateRepositories,
        reader: &dyn GateConfigReader,
    ) -> GateEngineResult<Self> {
        Ok(Self::new(repos, reader.load_gate_config()?))
    }

    /// 替换齐套率计算策略
    pub fn with_kit_rate_strategy(mut self, strategy: Arc<dyn KitRateStrategy>) -> Self {
        self.kit_rate = strategy;
        self
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    pub fn repositories(&self) -> &GateRepositories {
        &self.repos
    }

    /// 评估目标阶段对应的门禁
    ///
    /// 目标阶段无门禁时按未知阶段策略处理：
    /// AUTO_PASS 返回 `Ok(None)`，REJECT 返回 `UnknownGateTarget`。
    #[instrument(skip(self, project), fields(project_id = %project.id))]
    pub fn evaluate(
        &self,
        target_stage: &str,
        project: &Project,
    ) -> GateEngineResult<Option<GateEvaluation>> {
        let definition = match GateDefinition::for_target(target_stage) {
            Some(definition) => definition,
            None => {
                return match self.config.unknown_stage_policy {
                    UnknownStagePolicy::AutoPass => {
                        debug!(target_stage, "目标阶段无门禁约束，直接放行");
                        Ok(None)
                    }
                    UnknownStagePolicy::Reject => {
                        Err(GateEngineError::UnknownGateTarget(target_stage.to_string()))
                    }
                };
            }
        };

        let _perf = GateEvalGuard::new(perf_op(definition.gate_code), &project.id);
        let ctx = GateContext {
            repos: &self.repos,
            config: &self.config,
            kit_rate: self.kit_rate.as_ref(),
        };
        let conditions = rule_for(definition.gate_code).evaluate(&ctx, project)?;

        for condition in conditions.iter().filter(|c| !c.is_passed()) {
            debug!(
                gate = %definition.gate_code,
                condition = %condition.name,
                message = %condition.message,
                "门禁条件未满足"
            );
        }

        let result = GateResult::from_conditions(&conditions);
        info!(
            project_id = %project.id,
            gate = %definition.gate_code,
            passed = result.passed(),
            missing = result.missing_items().len(),
            "门禁评估完成"
        );

        Ok(Some(GateEvaluation {
            definition,
            conditions,
            result,
        }))
    }

    /// 检查推进到目标阶段的门禁
    pub fn check_gate(&self, target_stage: &str, project: &Project) -> GateEngineResult<GateResult> {
        Ok(self
            .evaluate(target_stage, project)?
            .map(|evaluation| evaluation.result)
            .unwrap_or_else(GateResult::pass))
    }

    /// 按项目ID加载后检查
    pub fn check_gate_by_id(&self, target_stage: &str, project_id: &str) -> GateEngineResult<GateResult> {
        let project = self.load_project(project_id)?;
        self.check_gate(target_stage, &project)
    }

    /// 检查推进到下一阶段的门禁（已处于 S9 时直接放行）
    pub fn check_next_gate(&self, project: &Project) -> GateEngineResult<GateResult> {
        match project.stage.next() {
            Some(next) => self.check_gate(next.as_str(), project),
            None => Ok(GateResult::pass()),
        }
    }

    pub fn load_project(&self, project_id: &str) -> GateEngineResult<Project> {
        self.repos
            .projects
            .find_project(project_id)?
            .ok_or_else(|| GateEngineError::ProjectNotFound(project_id.to_string()))
    }
}

fn perf_op(code: GateCode) -> &'static str {
    match code {
        GateCode::G1 => "gate.G1",
        GateCode::G2 => "gate.G2",
        GateCode::G3 => "gate.G3",
        GateCode::G4 => "gate.G4",
        GateCode::G5 => "gate.G5",
        GateCode::G6 => "gate.G6",
        GateCode::G7 => "gate.G7",
        GateCode::G8 => "gate.G8",
    }
}
