use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    api_observability::{ApiConfig, ObservabilityConfig},
    cluster::{ControlSocketConfig, DispatcherConfig, RegistryConfig},
};

/// 协调器配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub control: ControlSocketConfig,
    pub registry: RegistryConfig,
    pub dispatcher: DispatcherConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序:
    /// 1. 默认配置
    /// 2. 配置文件 (TOML格式)
    /// 3. 环境变量覆盖 (前缀: CLUSTER_，层级分隔符: __)
    ///
    /// 例如 `CLUSTER_CONTROL__BIND_ADDRESS=0.0.0.0:9001` 覆盖 `control.bind_address`。
    ///
    /// # 参数
    ///
    /// * `config_path` - 配置文件路径，为None时尝试默认路径
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        Self::load_with_env(config_path, Self::env_source())
    }

    /// 环境变量覆盖源: `CLUSTER_` 前缀，`__` 分隔层级
    fn env_source() -> Environment {
        Environment::with_prefix("CLUSTER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_with_env(config_path: Option<&str>, env: Environment) -> Result<Self> {
        let defaults = AppConfig::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("api.bind_address", defaults.api.bind_address)?
            .set_default("api.cors_enabled", defaults.api.cors_enabled)?
            .set_default("control.bind_address", defaults.control.bind_address)?
            .set_default(
                "control.read_buffer_size",
                defaults.control.read_buffer_size as u64,
            )?
            .set_default(
                "registry.default_capacity",
                defaults.registry.default_capacity,
            )?
            .set_default(
                "dispatcher.dispatch_strategy",
                defaults.dispatcher.dispatch_strategy,
            )?
            .set_default("observability.log_level", defaults.observability.log_level)?
            .set_default(
                "observability.log_format",
                defaults.observability.log_format,
            )?;

        if let Some(path) = config_path {
            if Path::new(path).exists() {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            } else {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
        } else {
            let default_paths = ["config/cluster.toml", "cluster.toml"];
            if let Some(path) = default_paths.iter().find(|p| Path::new(p).exists()) {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            }
        }

        builder = builder.add_source(env);

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    /// 从TOML字符串加载配置，缺省的键取默认值
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;

        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        self.api.validate().context("API配置验证失败")?;
        self.control.validate().context("控制套接字配置验证失败")?;
        self.registry.validate().context("注册表配置验证失败")?;
        self.dispatcher
            .validate()
            .context("Dispatcher配置验证失败")?;
        self.observability
            .validate()
            .context("可观测性配置验证失败")?;

        Ok(())
    }
}
