// ==========================================
// 设备交付项目门禁系统 - 门禁配置
// ==========================================
// 职责: 门禁阈值与开关的结构化配置 + 读取接口
// 存储: config_kv 表 (scope_id = 'global')
// ==========================================

use crate::domain::types::KitRateBasis;
use crate::repository::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置键
pub mod config_keys {
    /// G3 是否要求合同
    pub const REQUIRE_CONTRACT: &str = "gate_require_contract";
    /// G5 齐套率阈值（百分比）
    pub const KIT_RATE_THRESHOLD_PCT: &str = "gate_kit_rate_threshold_pct";
    /// G5 齐套率加权口径 (QUANTITY / VALUE)
    pub const KIT_RATE_BASIS: &str = "gate_kit_rate_basis";
    /// G8 回款比例阈值（百分比）
    pub const PAYMENT_RATE_THRESHOLD_PCT: &str = "gate_payment_rate_threshold_pct";
    /// 未知目标阶段处理策略 (AUTO_PASS / REJECT)
    pub const UNKNOWN_STAGE_POLICY: &str = "gate_unknown_stage_policy";
}

/// 配置层错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置值无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("配置读取失败: {0}")]
    Repository(#[from] RepositoryError),
}

// ==========================================
// UnknownStagePolicy - 未知目标阶段处理策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnknownStagePolicy {
    /// 无门禁约束，直接放行
    AutoPass,
    /// 视为配置错误
    Reject,
}

impl UnknownStagePolicy {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "AUTO_PASS" => Some(UnknownStagePolicy::AutoPass),
            "REJECT" => Some(UnknownStagePolicy::Reject),
            _ => None,
        }
    }
}

// ==========================================
// GateConfig - 门禁配置快照
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    pub require_contract: bool,
    pub kit_rate_threshold_pct: f64,
    pub kit_rate_basis: KitRateBasis,
    pub payment_rate_threshold_pct: f64,
    pub unknown_stage_policy: UnknownStagePolicy,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            require_contract: true,
            kit_rate_threshold_pct: 80.0,
            kit_rate_basis: KitRateBasis::Quantity,
            payment_rate_threshold_pct: 80.0,
            unknown_stage_policy: UnknownStagePolicy::AutoPass,
        }
    }
}

impl GateConfig {
    /// 由键值对覆写默认配置（未出现的键保留默认值）
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = GateConfig::default();
        for (key, value) in pairs {
            match key {
                config_keys::REQUIRE_CONTRACT => {
                    config.require_contract = parse_bool(key, value)?;
                }
                config_keys::KIT_RATE_THRESHOLD_PCT => {
                    config.kit_rate_threshold_pct = parse_pct(key, value)?;
                }
                config_keys::KIT_RATE_BASIS => {
                    config.kit_rate_basis =
                        KitRateBasis::from_code(value).ok_or_else(|| invalid(key, value))?;
                }
                config_keys::PAYMENT_RATE_THRESHOLD_PCT => {
                    config.payment_rate_threshold_pct = parse_pct(key, value)?;
                }
                config_keys::UNKNOWN_STAGE_POLICY => {
                    config.unknown_stage_policy =
                        UnknownStagePolicy::from_code(value).ok_or_else(|| invalid(key, value))?;
                }
                _ => {}
            }
        }
        Ok(config)
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("无法识别的取值 {}", value),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_pct(key: &str, value: &str) -> Result<f64, ConfigError> {
    let pct: f64 = value.trim().parse().map_err(|_| invalid(key, value))?;
    if !(0.0..=100.0).contains(&pct) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("百分比需在 0-100 之间: {}", value),
        });
    }
    Ok(pct)
}

// ==========================================
// GateConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）、GateConfig（静态配置）
pub trait GateConfigReader: Send + Sync {
    fn load_gate_config(&self) -> Result<GateConfig, ConfigError>;
}

impl GateConfigReader for GateConfig {
    fn load_gate_config(&self) -> Result<GateConfig, ConfigError> {
        Ok(self.clone())
    }
}
