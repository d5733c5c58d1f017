// ==========================================
// 设备交付项目门禁系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供门禁读取所需的最小表结构（测试/命令行建库）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 门禁读取的表结构
///
/// 仅包含门禁引擎读取的字段；完整业务表由各子系统维护。
pub const GATE_SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

CREATE TABLE IF NOT EXISTS contract (
    id TEXT PRIMARY KEY,
    contract_no TEXT,
    status TEXT NOT NULL,
    amount REAL
);

CREATE TABLE IF NOT EXISTS project (
    id TEXT PRIMARY KEY,
    project_no TEXT,
    project_name TEXT,
    stage TEXT NOT NULL DEFAULT 'S1',
    status TEXT NOT NULL DEFAULT 'DRAFT',
    customer_id TEXT,
    customer_name TEXT,
    contact_name TEXT,
    contact_phone TEXT,
    requirements TEXT,
    contract_id TEXT,
    contract_no TEXT,
    contract_amount REAL,
    budget_amount REAL,
    actual_cost REAL,
    progress_pct REAL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS machine (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES project(id),
    machine_code TEXT NOT NULL,
    machine_name TEXT,
    status TEXT NOT NULL DEFAULT 'PLANNED',
    progress_pct REAL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS project_evaluation (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES project(id),
    status TEXT NOT NULL,
    difficulty_score REAL,
    workload_score REAL,
    evaluated_at TEXT
);

CREATE TABLE IF NOT EXISTS document (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES project(id),
    doc_type TEXT NOT NULL,
    doc_name TEXT,
    status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS technical_review (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES project(id),
    review_type TEXT NOT NULL,
    status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS review_issue (
    id TEXT PRIMARY KEY,
    review_id TEXT NOT NULL REFERENCES technical_review(id),
    level TEXT NOT NULL,
    status TEXT NOT NULL,
    title TEXT
);

CREATE TABLE IF NOT EXISTS material (
    id TEXT PRIMARY KEY,
    material_code TEXT NOT NULL,
    material_name TEXT,
    category TEXT,
    is_key_material INTEGER NOT NULL DEFAULT 0,
    unit_price REAL,
    current_stock REAL DEFAULT 0,
    received_qty REAL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS bom_header (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES project(id),
    machine_id TEXT REFERENCES machine(id),
    bom_no TEXT,
    status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS bom_item (
    id TEXT PRIMARY KEY,
    bom_id TEXT NOT NULL REFERENCES bom_header(id),
    material_id TEXT NOT NULL REFERENCES material(id),
    quantity REAL NOT NULL,
    unit_price REAL
);

CREATE TABLE IF NOT EXISTS outsourcing_order (
    id TEXT PRIMARY KEY,
    order_no TEXT NOT NULL,
    project_id TEXT NOT NULL REFERENCES project(id),
    machine_id TEXT REFERENCES machine(id),
    status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS outsourcing_order_item (
    id TEXT PRIMARY KEY,
    order_id TEXT NOT NULL REFERENCES outsourcing_order(id),
    ordered_qty REAL NOT NULL DEFAULT 0,
    delivered_qty REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS acceptance_order (
    id TEXT PRIMARY KEY,
    order_no TEXT,
    project_id TEXT NOT NULL REFERENCES project(id),
    acceptance_type TEXT NOT NULL,
    status TEXT NOT NULL,
    overall_result TEXT,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS acceptance_report (
    id TEXT PRIMARY KEY,
    order_id TEXT NOT NULL REFERENCES acceptance_order(id),
    report_no TEXT,
    generated_at TEXT
);

CREATE TABLE IF NOT EXISTS acceptance_issue (
    id TEXT PRIMARY KEY,
    order_id TEXT NOT NULL REFERENCES acceptance_order(id),
    status TEXT NOT NULL,
    description TEXT
);

CREATE TABLE IF NOT EXISTS payment_plan (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES project(id),
    plan_name TEXT,
    planned_amount REAL,
    actual_amount REAL,
    status TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS issue (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL REFERENCES project(id),
    title TEXT,
    is_blocking INTEGER NOT NULL DEFAULT 0,
    status TEXT NOT NULL
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let mut conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    crate::perf::install_sqlite_tracing(&mut conn);
    Ok(conn)
}

/// 初始化门禁读取的表结构（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(GATE_SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PROJECT_GATE_DB_PATH";

/// 默认数据库路径
///
/// 优先使用 `PROJECT_GATE_DB_PATH`；否则位于用户数据目录
/// `<data_dir>/project-gate/project_gate.db`，取不到数据目录时回退到当前目录。
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./project_gate.db");
    if let Some(data_dir) = dirs::data_dir() {
        path = data_dir.join("project-gate").join("project_gate.db");
    }
    path.to_string_lossy().to_string()
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
