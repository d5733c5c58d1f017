// ==========================================
// 设备交付项目门禁系统 - 验收与回款领域模型
// ==========================================

use crate::domain::types::{AcceptanceResult, AcceptanceStatus, AcceptanceType, PaymentStatus};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 验收单 (FAT / SAT / FINAL)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceOrder {
    pub id: String,
    pub order_no: Option<String>,
    pub project_id: String,
    pub acceptance_type: AcceptanceType,
    pub status: AcceptanceStatus,
    pub overall_result: Option<AcceptanceResult>,
    pub completed_at: Option<NaiveDateTime>,
}

/// 回款计划
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    pub id: String,
    pub project_id: String,
    pub plan_name: Option<String>,
    pub planned_amount: f64,
    pub actual_amount: f64,
    pub status: PaymentStatus,
}
