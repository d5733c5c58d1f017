// ==========================================
// 设备交付项目门禁系统 - 门禁评估性能观测
// ==========================================
// 职责: 统计单次门禁评估的耗时与 SQL 语句数
// 说明: G5/G6/G8 在设备循环内逐台查询，语句数随设备数增长
// ==========================================

use rusqlite::Connection;
use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

pub const PERF_SQL_ENV: &str = "PROJECT_GATE_PERF_SQL";
pub const SLOW_SQL_MS_ENV: &str = "PROJECT_GATE_SLOW_SQL_MS";

const SLOW_SQL_LOG_CHARS: usize = 300;

static SQL_PERF_ON: AtomicBool = AtomicBool::new(false);
static SLOW_SQL_MS: AtomicU64 = AtomicU64::new(0);

thread_local! {
    // 仅在 GateEvalGuard 存活期间计数
    static ACTIVE_GUARDS: Cell<u32> = const { Cell::new(0) };
    static STATEMENTS: Cell<u64> = const { Cell::new(0) };
    static SLOW_STATEMENTS: Cell<u64> = const { Cell::new(0) };
}

// ==========================================
// SqlPerfSettings - SQL 观测开关
// ==========================================

/// SQL 观测设置
///
/// Debug 构建默认开启，慢 SQL 阈值 50ms；Release 默认关闭，阈值 200ms。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlPerfSettings {
    pub enabled: bool,
    pub slow_ms: u64,
}

impl SqlPerfSettings {
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(PERF_SQL_ENV).ok().as_deref(),
            std::env::var(SLOW_SQL_MS_ENV).ok().as_deref(),
        )
    }

    pub fn from_values(enabled: Option<&str>, slow_ms: Option<&str>) -> Self {
        let enabled = enabled.map(flag_on).unwrap_or(cfg!(debug_assertions));
        let slow_ms = slow_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 });
        Self { enabled, slow_ms }
    }
}

fn flag_on(v: &str) -> bool {
    matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "on")
}

/// 按字符截断 SQL 文本（日志用）
fn shorten_sql(sql: &str, max_chars: usize) -> String {
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}

/// 为连接安装 trace/profile 回调
pub fn install_sqlite_tracing(conn: &mut Connection) {
    apply_sqlite_tracing(conn, SqlPerfSettings::from_env());
}

pub fn apply_sqlite_tracing(conn: &mut Connection, settings: SqlPerfSettings) {
    SQL_PERF_ON.store(settings.enabled, Ordering::Relaxed);
    SLOW_SQL_MS.store(settings.slow_ms, Ordering::Relaxed);

    if settings.enabled {
        conn.trace(Some(on_statement));
        conn.profile(Some(on_statement_done));
    } else {
        conn.trace(None);
        conn.profile(None);
    }
}

fn guard_active() -> bool {
    ACTIVE_GUARDS.with(|g| g.get() > 0)
}

fn on_statement(_sql: &str) {
    if SQL_PERF_ON.load(Ordering::Relaxed) && guard_active() {
        STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

fn on_statement_done(sql: &str, duration: Duration) {
    if !SQL_PERF_ON.load(Ordering::Relaxed) {
        return;
    }
    let threshold = SLOW_SQL_MS.load(Ordering::Relaxed);
    let ms = duration.as_millis() as u64;
    if threshold == 0 || ms < threshold {
        return;
    }

    tracing::warn!(
        target: "slow_sql",
        duration_ms = ms,
        sql = %shorten_sql(sql, SLOW_SQL_LOG_CHARS),
        "门禁查询耗时过长"
    );
    if guard_active() {
        SLOW_STATEMENTS.with(|c| c.set(c.get().saturating_add(1)));
    }
}

// ==========================================
// GateEvalGuard - 单次门禁评估统计
// ==========================================

/// 评估统计快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalStats {
    pub elapsed_ms: u64,
    pub sql_count: u64,
    pub slow_sql_count: u64,
}

/// 门禁评估统计 Guard，drop 时输出 `perf` 日志
///
/// ```ignore
/// let _perf = project_gate::perf::GateEvalGuard::new("gate.G5", "P-001");
/// ```
pub struct GateEvalGuard {
    op: &'static str,
    project_id: String,
    started: Instant,
    statements_at_start: u64,
    slow_at_start: u64,
}

impl GateEvalGuard {
    pub fn new(op: &'static str, project_id: &str) -> Self {
        ACTIVE_GUARDS.with(|g| g.set(g.get().saturating_add(1)));
        Self {
            op,
            project_id: project_id.to_string(),
            started: Instant::now(),
            statements_at_start: STATEMENTS.with(|c| c.get()),
            slow_at_start: SLOW_STATEMENTS.with(|c| c.get()),
        }
    }

    /// 截至当前的统计
    pub fn stats(&self) -> EvalStats {
        EvalStats {
            elapsed_ms: self.started.elapsed().as_millis() as u64,
            sql_count: STATEMENTS
                .with(|c| c.get())
                .saturating_sub(self.statements_at_start),
            slow_sql_count: SLOW_STATEMENTS
                .with(|c| c.get())
                .saturating_sub(self.slow_at_start),
        }
    }
}

impl Drop for GateEvalGuard {
    fn drop(&mut self) {
        let stats = self.stats();
        tracing::info!(
            target: "perf",
            op = self.op,
            project_id = %self.project_id,
            elapsed_ms = stats.elapsed_ms,
            sql_count = stats.sql_count,
            slow_sql_count = stats.slow_sql_count,
            "门禁评估统计"
        );
        ACTIVE_GUARDS.with(|g| g.set(g.get().saturating_sub(1)));
    }
}
