// ==========================================
// 设备交付项目门禁系统 - 命令行入口
// ==========================================
// 用法:
//   project-gate [--db PATH] <project_id> [target_stage]
//
// 未指定目标阶段时检查推进到下一阶段的门禁。
// 结果以 JSON 输出到 stdout，日志写 stderr。
// 退出码: 0 门禁通过 / 2 门禁未通过 / 1 执行出错
// ==========================================

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};

use project_gate::config::ConfigManager;
use project_gate::db::{get_default_db_path, open_sqlite_connection};
use project_gate::domain::gate::GateDetailResult;
use project_gate::engine::{GateDetailEngine, GateRegistry, GateRepositories};
use project_gate::logging;

const USAGE: &str = "用法: project-gate [--db PATH] <project_id> [target_stage]";

struct CliArgs {
    db_path: String,
    project_id: String,
    target_stage: Option<String>,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut db_path = None;
    let mut positional = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => {
                let path = args.next().context("--db 缺少路径参数")?;
                db_path = Some(path);
            }
            "-h" | "--help" => bail!("{}", USAGE),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let project_id = match positional.next() {
        Some(id) if !id.trim().is_empty() => id.trim().to_string(),
        _ => bail!("缺少 project_id\n{}", USAGE),
    };
    let target_stage = positional
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if positional.next().is_some() {
        bail!("参数过多\n{}", USAGE);
    }

    Ok(CliArgs {
        db_path: db_path.unwrap_or_else(get_default_db_path),
        project_id,
        target_stage,
    })
}

fn run(args: CliArgs) -> anyhow::Result<GateDetailResult> {
    tracing::info!("使用数据库: {}", args.db_path);

    let conn = open_sqlite_connection(&args.db_path)
        .with_context(|| format!("无法打开数据库: {}", args.db_path))?;
    let conn = Arc::new(Mutex::new(conn));

    let registry = GateRegistry::from_config_reader(
        GateRepositories::from_connection(conn.clone()),
        &ConfigManager::from_connection(conn),
    )
    .context("加载门禁配置失败")?;
    let engine = GateDetailEngine::new(registry);

    let project = engine
        .registry()
        .load_project(&args.project_id)
        .context("加载项目失败")?;

    let target_stage = match args.target_stage {
        Some(stage) => stage,
        None => match project.stage.next() {
            Some(next) => next.to_string(),
            None => {
                tracing::info!(project_id = %project.id, "项目已处于最终阶段，无下一门禁");
                return Ok(GateDetailResult::unconstrained(project.stage.as_str()));
            }
        },
    };

    let detail = engine
        .check_gate_detailed(&target_stage, &project)
        .with_context(|| format!("门禁检查失败: {} → {}", project.id, target_stage))?;
    Ok(detail)
}

fn main() -> ExitCode {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let detail = match run(args) {
        Ok(detail) => detail,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("错误: {:#}", e);
            return ExitCode::from(1);
        }
    };

    match serde_json::to_string_pretty(&detail) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("错误: 结果序列化失败: {}", e);
            return ExitCode::from(1);
        }
    }

    if detail.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}
