// ==========================================
// 设备交付项目门禁系统 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表加载门禁配置
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::gate_config::{ConfigError, GateConfig, GateConfigReader};
use crate::repository::sql_utils::{lock_conn, SharedConnection};
use crate::repository::RepositoryError;
use rusqlite::params;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: SharedConnection,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, ConfigError> {
        let conn = lock_conn(&self.conn)?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(RepositoryError::from(e).into()),
        }
    }

    /// 读取全部 global 配置（按 key 排序）
    fn list_global_pairs(&self) -> Result<Vec<(String, String)>, ConfigError> {
        let conn = lock_conn(&self.conn)?;
        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")
            .map_err(RepositoryError::from)?;

        let pairs = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
            .map_err(RepositoryError::from)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(RepositoryError::from)?;
        Ok(pairs)
    }
}

impl GateConfigReader for ConfigManager {
    fn load_gate_config(&self) -> Result<GateConfig, ConfigError> {
        let pairs = self.list_global_pairs()?;
        let config = GateConfig::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        tracing::debug!(?config, "门禁配置已加载");
        Ok(config)
    }
}
