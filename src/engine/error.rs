// ==========================================
// 设备交付项目门禁系统 - 引擎层错误类型
// ==========================================
// 条件未满足不是错误（进入 missing_items）；
// 这里只承载协作方故障与配置问题，原样向上传播。
// ==========================================

use crate::config::ConfigError;
use crate::repository::RepositoryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateEngineError {
    #[error("数据访问失败: {0}")]
    Repository(#[from] RepositoryError),

    #[error("未知的目标阶段: {0}")]
    UnknownGateTarget(String),

    #[error("项目不存在: {0}")]
    ProjectNotFound(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type GateEngineResult<T> = Result<T, GateEngineError>;
