// ==========================================
// 设备交付项目门禁系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 阶段推进前的门禁校验（只读，人工最终决定是否推进）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 只读数据访问
pub mod repository;

// 引擎层 - 门禁规则
pub mod engine;

// 配置层 - 门禁阈值与开关
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 门禁评估性能观测（耗时/SQL 计数）
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{GateCode, ProjectStatus, Stage};

// 领域实体与门禁结果
pub use domain::{
    list_gate_definitions, GateCondition, GateDefinition, GateDetailResult, GateResult, Project,
};

// 引擎
pub use engine::{
    GateDetailEngine, GateEngineError, GateEngineResult, GateRegistry, GateRepositories,
    KitRateStrategy, WeightedKitRate,
};

// 配置
pub use config::{ConfigManager, GateConfig, GateConfigReader, UnknownStagePolicy};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "设备交付项目门禁系统";
