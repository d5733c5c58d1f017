// ==========================================
// 设备交付项目门禁系统 - 项目领域模型
// ==========================================
// 职责: 项目 / 设备 / 合同 / 项目评估
// 红线: 只读快照，门禁引擎不回写
// ==========================================

use crate::domain::types::{
    ContractStatus, EvaluationStatus, MachineStatus, ProjectStatus, Stage,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Project - 项目（聚合根）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub project_no: Option<String>,
    pub project_name: Option<String>,
    pub stage: Stage,
    pub status: ProjectStatus,

    // ===== 客户信息 =====
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,

    /// 需求描述（自由文本）
    pub requirements: Option<String>,

    // ===== 合同信息 =====
    pub contract_id: Option<String>,
    pub contract_no: Option<String>,
    pub contract_amount: Option<f64>,

    // ===== 成本与进度 =====
    pub budget_amount: Option<f64>,
    pub actual_cost: Option<f64>,
    pub progress_pct: f64,
}

impl Project {
    /// 创建仅含标识、阶段与状态的项目快照
    pub fn new(id: impl Into<String>, stage: Stage, status: ProjectStatus) -> Self {
        Self {
            id: id.into(),
            project_no: None,
            project_name: None,
            stage,
            status,
            customer_id: None,
            customer_name: None,
            contact_name: None,
            contact_phone: None,
            requirements: None,
            contract_id: None,
            contract_no: None,
            contract_amount: None,
            budget_amount: None,
            actual_cost: None,
            progress_pct: 0.0,
        }
    }

    /// 是否已关联合同（合同ID或合同编号任一非空）
    pub fn has_contract_link(&self) -> bool {
        is_set(&self.contract_id) || is_set(&self.contract_no)
    }

    /// 合同金额（缺失视为 0）
    pub fn contract_amount_or_zero(&self) -> f64 {
        self.contract_amount.unwrap_or(0.0)
    }
}

/// 文本字段是否已填写（去除首尾空白后非空）
pub fn is_set(value: &Option<String>) -> bool {
    value.as_deref().map(|v| !v.trim().is_empty()).unwrap_or(false)
}

// ==========================================
// Machine - 设备（项目交付单元）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: String,
    pub project_id: String,
    pub machine_code: String,
    pub machine_name: Option<String>,
    pub status: MachineStatus,
    /// 进度 (0-100)
    pub progress_pct: f64,
}

// ==========================================
// Contract - 合同
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub contract_no: Option<String>,
    pub status: ContractStatus,
    pub amount: Option<f64>,
}

// ==========================================
// ProjectEvaluation - 项目评估
// ==========================================
// G1 的前置条件: 已确认且难度/工作量评分齐全
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectEvaluation {
    pub id: String,
    pub project_id: String,
    pub status: EvaluationStatus,
    pub difficulty_score: Option<f64>,
    pub workload_score: Option<f64>,
    pub evaluated_at: Option<NaiveDateTime>,
}
