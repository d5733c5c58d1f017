// ==========================================
// 设备交付项目门禁系统 - 物料与外协领域模型
// ==========================================
// 职责: BOM 表头 / BOM 明细（含库存快照）/ 外协单
// ==========================================

use crate::domain::types::{BomStatus, OutsourcingStatus};
use serde::{Deserialize, Serialize};

/// 关键件分类编码
pub const KEY_MATERIAL_CATEGORIES: [&str; 3] = ["关键件", "核心件", "KEY"];

// ==========================================
// BomHeader - BOM 表头
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomHeader {
    pub id: String,
    pub project_id: String,
    /// 设备级 BOM 关联设备；项目级 BOM 为空
    pub machine_id: Option<String>,
    pub bom_no: Option<String>,
    pub status: BomStatus,
}

// ==========================================
// BomItemLine - BOM 明细（已关联物料库存）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomItemLine {
    pub item_id: String,
    pub bom_id: String,
    pub material_code: String,
    pub material_name: Option<String>,
    /// 需求数量
    pub quantity: f64,
    pub unit_price: Option<f64>,
    /// 当前库存
    pub current_stock: f64,
    /// 已到货数量
    pub received_qty: f64,
    pub is_key_material: bool,
    pub category: Option<String>,
}

impl BomItemLine {
    /// 可用数量 = 库存 + 已到货
    pub fn available_qty(&self) -> f64 {
        self.current_stock + self.received_qty
    }

    /// 是否关键物料
    pub fn is_key(&self) -> bool {
        self.is_key_material
            || self
                .category
                .as_deref()
                .map(|c| KEY_MATERIAL_CATEGORIES.contains(&c.trim()))
                .unwrap_or(false)
    }
}

// ==========================================
// OutsourcingOrder - 外协单（明细数量已汇总）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutsourcingOrder {
    pub id: String,
    pub order_no: String,
    pub project_id: String,
    pub machine_id: Option<String>,
    pub status: OutsourcingStatus,
    /// 订购数量合计
    pub ordered_qty: f64,
    /// 到货数量合计
    pub delivered_qty: f64,
}

impl OutsourcingOrder {
    pub fn is_fully_delivered(&self) -> bool {
        self.delivered_qty >= self.ordered_qty
    }
}
