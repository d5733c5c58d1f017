// ==========================================
// 设备交付项目门禁系统 - 门禁结果模型
// ==========================================
// 职责: 门禁结果 / 门禁条件 / 门禁元数据 / 详细结果
// 红线: 结果为临时值对象，不持久化
// ==========================================

use crate::domain::types::{GateCode, Stage};
use serde::Serialize;

// ==========================================
// GateResult - 门禁判定结果
// ==========================================
// 不变式: passed ⇔ missing_items 为空
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateResult {
    passed: bool,
    missing_items: Vec<String>,
}

impl GateResult {
    /// 直接放行
    pub fn pass() -> Self {
        Self {
            passed: true,
            missing_items: Vec::new(),
        }
    }

    /// 由缺失项构造（保持不变式）
    pub fn from_missing(missing_items: Vec<String>) -> Self {
        Self {
            passed: missing_items.is_empty(),
            missing_items,
        }
    }

    /// 由条件列表归约：按顺序收集未通过条件的提示
    pub fn from_conditions(conditions: &[GateCondition]) -> Self {
        Self::from_missing(
            conditions
                .iter()
                .filter(|c| !c.is_passed())
                .map(|c| c.message.clone())
                .collect(),
        )
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn missing_items(&self) -> &[String] {
        &self.missing_items
    }

    pub fn into_parts(self) -> (bool, Vec<String>) {
        (self.passed, self.missing_items)
    }
}

// ==========================================
// GateCondition - 单项门禁条件
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionStatus {
    Passed,
    Failed,
}

/// 处理指引（跳转目标 + 按钮文案）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateAction {
    pub reference: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateCondition {
    /// 条件标识（如 project_name / kit_rate:M-01）
    pub name: String,
    /// 条件描述
    pub description: String,
    pub status: ConditionStatus,
    /// 面向用户的提示
    pub message: String,
    pub action: Option<GateAction>,
}

impl GateCondition {
    pub fn passed(
        name: impl Into<String>,
        description: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: ConditionStatus::Passed,
            message: message.into(),
            action: None,
        }
    }

    pub fn failed(
        name: impl Into<String>,
        description: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: ConditionStatus::Failed,
            message: message.into(),
            action: None,
        }
    }

    /// 按判定值选择通过/未通过提示
    pub fn check(
        name: impl Into<String>,
        description: impl Into<String>,
        ok: bool,
        passed_message: impl Into<String>,
        failed_message: impl Into<String>,
    ) -> Self {
        if ok {
            Self::passed(name, description, passed_message)
        } else {
            Self::failed(name, description, failed_message)
        }
    }

    /// 附加处理指引（仅未通过条件在建议中展示）
    pub fn with_action(mut self, reference: &str, label: &str) -> Self {
        self.action = Some(GateAction {
            reference: reference.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn is_passed(&self) -> bool {
        self.status == ConditionStatus::Passed
    }
}

// ==========================================
// GateDefinition - 门禁静态元数据
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GateDefinition {
    pub gate_code: GateCode,
    pub gate_name: &'static str,
    pub from_stage: Stage,
    pub to_stage: Stage,
}

/// 门禁定义表（按目标阶段 S2..S9 排列）
pub const GATE_DEFINITIONS: [GateDefinition; 8] = [
    GateDefinition {
        gate_code: GateCode::G1,
        gate_name: "需求评估门",
        from_stage: Stage::S1,
        to_stage: Stage::S2,
    },
    GateDefinition {
        gate_code: GateCode::G2,
        gate_name: "方案确认门",
        from_stage: Stage::S2,
        to_stage: Stage::S3,
    },
    GateDefinition {
        gate_code: GateCode::G3,
        gate_name: "立项签约门",
        from_stage: Stage::S3,
        to_stage: Stage::S4,
    },
    GateDefinition {
        gate_code: GateCode::G4,
        gate_name: "设计冻结门",
        from_stage: Stage::S4,
        to_stage: Stage::S5,
    },
    GateDefinition {
        gate_code: GateCode::G5,
        gate_name: "物料齐套门",
        from_stage: Stage::S5,
        to_stage: Stage::S6,
    },
    GateDefinition {
        gate_code: GateCode::G6,
        gate_name: "装配完工门",
        from_stage: Stage::S6,
        to_stage: Stage::S7,
    },
    GateDefinition {
        gate_code: GateCode::G7,
        gate_name: "出厂验收门",
        from_stage: Stage::S7,
        to_stage: Stage::S8,
    },
    GateDefinition {
        gate_code: GateCode::G8,
        gate_name: "终验结项门",
        from_stage: Stage::S8,
        to_stage: Stage::S9,
    },
];

impl GateDefinition {
    /// 按目标阶段编码查找门禁定义
    pub fn for_target(target_stage: &str) -> Option<&'static GateDefinition> {
        let stage = Stage::from_code(target_stage)?;
        GATE_DEFINITIONS.iter().find(|d| d.to_stage == stage)
    }

    pub fn for_gate(gate_code: GateCode) -> &'static GateDefinition {
        GATE_DEFINITIONS
            .iter()
            .find(|d| d.gate_code == gate_code)
            .unwrap_or(&GATE_DEFINITIONS[0])
    }
}

impl GateCode {
    /// 目标阶段对应的门禁（S1 及未知阶段无门禁）
    pub fn for_target(target_stage: &str) -> Option<GateCode> {
        GateDefinition::for_target(target_stage).map(|d| d.gate_code)
    }
}

/// 全部门禁定义
pub fn list_gate_definitions() -> &'static [GateDefinition] {
    &GATE_DEFINITIONS
}

// ==========================================
// GateDetailResult - 门禁详细结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateDetailResult {
    pub gate_code: String,
    pub gate_name: String,
    pub from_stage: String,
    pub to_stage: String,
    pub passed: bool,
    pub total_conditions: usize,
    pub passed_conditions: usize,
    pub failed_conditions: usize,
    pub conditions: Vec<GateCondition>,
    pub missing_items: Vec<String>,
    pub suggestions: Vec<String>,
    /// 通过百分比（保留 1 位小数）
    pub progress_pct: f64,
}

impl GateDetailResult {
    /// 无门禁约束的空壳结果
    pub fn unconstrained(target_stage: &str) -> Self {
        Self {
            gate_code: String::new(),
            gate_name: String::new(),
            from_stage: String::new(),
            to_stage: target_stage.to_string(),
            passed: true,
            total_conditions: 0,
            passed_conditions: 0,
            failed_conditions: 0,
            conditions: Vec::new(),
            missing_items: Vec::new(),
            suggestions: Vec::new(),
            progress_pct: 100.0,
        }
    }
}
