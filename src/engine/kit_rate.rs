// ==========================================
// 设备交付项目门禁系统 - 齐套率计算策略
// ==========================================
// 职责: 由 BOM 明细计算齐套率（可替换策略）
// 红线: 纯函数，无 I/O
// ==========================================

use crate::domain::procurement::BomItemLine;
use crate::domain::types::KitRateBasis;
use serde::Serialize;

/// 齐套率计算结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KitRate {
    /// 齐套率 (0-100，不取整；展示时再截断)
    pub kit_rate_pct: f64,
    /// 加权需求合计
    pub required_total: f64,
    /// 加权可用合计（单行以需求封顶）
    pub available_total: f64,
    /// 缺料行数
    pub short_lines: usize,
}

/// 齐套率计算策略
pub trait KitRateStrategy: Send + Sync {
    fn compute(&self, items: &[BomItemLine], basis: KitRateBasis) -> KitRate;
}

// ==========================================
// WeightedKitRate - 默认加权齐套率
// ==========================================
// 单行覆盖量 = min(库存 + 已到货, 需求)
// QUANTITY: 按数量加权；VALUE: 按 数量×单价 加权（无单价的行权重为 0）
// 需求合计为 0 时视为 100%
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightedKitRate;

impl KitRateStrategy for WeightedKitRate {
    fn compute(&self, items: &[BomItemLine], basis: KitRateBasis) -> KitRate {
        let mut required_total = 0.0;
        let mut available_total = 0.0;
        let mut short_lines = 0;

        for item in items {
            let required = item.quantity.max(0.0);
            let covered = item.available_qty().max(0.0).min(required);
            if covered < required {
                short_lines += 1;
            }

            let weight = match basis {
                KitRateBasis::Quantity => 1.0,
                KitRateBasis::Value => item.unit_price.unwrap_or(0.0).max(0.0),
            };
            required_total += required * weight;
            available_total += covered * weight;
        }

        let kit_rate_pct = if required_total <= 0.0 {
            100.0
        } else {
            available_total * 100.0 / required_total
        };

        KitRate {
            kit_rate_pct,
            required_total,
            available_total,
            short_lines,
        }
    }
}
