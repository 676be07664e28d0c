use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use cluster::{app::Application, shutdown::ShutdownManager};
use cluster_core::AppConfig;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 等待组件停止的最长时间
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("cluster-coordinator")
        .version(env!("CARGO_PKG_VERSION"))
        .about("集群控制平面协调器")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径（缺省时尝试 config/cluster.toml、cluster.toml）"),
        )
        .arg(
            Arg::new("http-bind")
                .long("http-bind")
                .value_name("ADDR")
                .help("HTTP控制接口监听地址"),
        )
        .arg(
            Arg::new("control-bind")
                .long("control-bind")
                .value_name("ADDR")
                .help("控制套接字监听地址"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别")
                .value_parser(["trace", "debug", "info", "warn", "error"]),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式")
                .value_parser(["json", "pretty"]),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config");
    let mut config = AppConfig::load(config_path.map(String::as_str)).with_context(|| {
        format!(
            "加载配置失败: {}",
            config_path.map(String::as_str).unwrap_or("<默认路径>")
        )
    })?;
    apply_cli_overrides(&mut config, &matches);
    config.validate().context("命令行参数覆盖后的配置无效")?;

    init_logging(
        &config.observability.log_level,
        &config.observability.log_format,
    )?;

    info!("启动集群协调器 v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = config_path {
        info!("配置文件: {path}");
    }

    let app = Application::new(config)?;
    // 绑定失败直接退出
    let listeners = app.bind().await?;
    info!(
        "HTTP控制接口: {}，控制套接字: {}",
        listeners.http_addr()?,
        listeners.control_addr()?
    );

    let shutdown_manager = ShutdownManager::new();
    let mut app_handle = {
        let shutdown_rx = shutdown_manager.subscribe().await;
        tokio::spawn(async move { app.serve(listeners, shutdown_rx).await })
    };

    // 组件在收到信号前退出时直接返回其结果
    let early_exit = tokio::select! {
        _ = wait_for_shutdown_signal() => None,
        result = &mut app_handle => Some(result),
    };

    match early_exit {
        None => {
            info!("收到关闭信号，开始优雅关闭...");
            shutdown_manager.shutdown().await;

            match tokio::time::timeout(SHUTDOWN_TIMEOUT, app_handle).await {
                Ok(Ok(Ok(()))) => info!("协调器已优雅关闭"),
                Ok(Ok(Err(e))) => error!("协调器关闭时发生错误: {e:#}"),
                Ok(Err(e)) => error!("协调器任务异常退出: {e}"),
                Err(_) => warn!("协调器关闭超时，强制退出"),
            }
        }
        Some(Ok(Ok(()))) => warn!("协调器组件意外停止"),
        Some(Ok(Err(e))) => return Err(e),
        Some(Err(e)) => return Err(anyhow::anyhow!("协调器任务异常退出: {e}")),
    }

    info!("集群协调器已退出");
    Ok(())
}

/// 命令行参数优先级最高
fn apply_cli_overrides(config: &mut AppConfig, matches: &ArgMatches) {
    if let Some(addr) = matches.get_one::<String>("http-bind") {
        config.api.bind_address = addr.clone();
    }
    if let Some(addr) = matches.get_one::<String>("control-bind") {
        config.control.bind_address = addr.clone();
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.observability.log_level = level.clone();
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        config.observability.log_format = format.clone();
    }
}

/// 初始化日志系统
fn init_logging(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .context("初始化JSON日志格式失败")?;
        }
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()
                .context("初始化Pretty日志格式失败")?;
        }
        _ => {
            return Err(anyhow::anyhow!("不支持的日志格式: {log_format}"));
        }
    }

    Ok(())
}

/// 等待关闭信号
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("安装Ctrl+C信号处理器失败");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("安装SIGTERM信号处理器失败")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("收到Ctrl+C信号");
        },
        _ = terminate => {
            info!("收到SIGTERM信号");
        },
    }
}
