// ==========================================
// 设备交付项目门禁系统 - 日志初始化
// ==========================================
// 基于 tracing-subscriber；命令行 stdout 输出 JSON 结果，日志统一写 stderr
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_FORMAT_ENV: &str = "PROJECT_GATE_LOG_FORMAT";

const DEFAULT_FILTER: &str = "info";

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人读文本（默认）
    Text,
    /// JSON 行，便于采集
    Json,
}

impl LogFormat {
    pub fn from_value(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 过滤器（默认 info），例如 `RUST_LOG=project_gate::engine=debug`
///   可看到每个未满足的门禁条件
/// - PROJECT_GATE_LOG_FORMAT: `json` 输出 JSON 行，其余为文本
///
/// ```no_run
/// project_gate::logging::init();
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let format = LogFormat::from_value(std::env::var(LOG_FORMAT_ENV).ok().as_deref());

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.with_target(true).with_line_number(true).try_init(),
    };
}

/// 测试用日志（debug 级别，重复调用无副作用）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
