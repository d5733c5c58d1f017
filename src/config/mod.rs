// ==========================================
// 设备交付项目门禁系统 - 配置层
// ==========================================
// 职责: 门禁阈值与开关管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod gate_config;

// 重导出核心配置
pub use config_manager::ConfigManager;
pub use gate_config::{config_keys, ConfigError, GateConfig, GateConfigReader, UnknownStagePolicy};
