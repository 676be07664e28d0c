//! # 配置管理
//!
//! 协调器的全部配置集中在 [`AppConfig`] 中，按以下优先级合并：
//!
//! 1. 内置默认值
//! 2. TOML配置文件（`--config` 指定，或 `config/cluster.toml`、`cluster.toml`）
//! 3. `CLUSTER_` 前缀的环境变量，层级用 `__` 分隔
//! 4. 命令行参数（由二进制入口覆盖）
//!
//! ```rust,no_run
//! use cluster_core::config::AppConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load(Some("config/cluster.toml"))?;
//!     println!("HTTP: {}", config.api.bind_address);
//!     println!("控制套接字: {}", config.control.bind_address);
//!     Ok(())
//! }
//! ```

pub mod models;

pub use models::{
    ApiConfig, AppConfig, ControlSocketConfig, DispatcherConfig, ObservabilityConfig,
    RegistryConfig,
};
