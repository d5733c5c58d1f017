// ==========================================
// 设备交付项目门禁系统 - 引擎层
// ==========================================
// 职责: 门禁规则评估、结果归约、详细结果生成
// 红线: 引擎不拼 SQL，只通过仓储接口读取数据
// ==========================================

pub mod detail;
pub mod error;
pub mod gates;
pub mod kit_rate;
pub mod registry;
pub mod repositories;

// 重导出核心引擎
pub use detail::{progress_pct, GateDetailEngine};
pub use error::{GateEngineError, GateEngineResult};
pub use gates::{rule_for, GateContext, GateRule};
pub use kit_rate::{KitRate, KitRateStrategy, WeightedKitRate};
pub use registry::{GateEvaluation, GateRegistry};
pub use repositories::GateRepositories;
