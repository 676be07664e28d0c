use serde::{Deserialize, Serialize};

/// HTTP控制接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: String,
    pub cors_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            cors_enabled: true,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_bind_address(&self.bind_address)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// `pretty` 或 `json`
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ObservabilityConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(anyhow::anyhow!(
                "无效的日志级别: {}，支持的级别: {:?}",
                self.log_level,
                valid_log_levels
            ));
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.log_format.as_str()) {
            return Err(anyhow::anyhow!(
                "无效的日志格式: {}，支持的格式: {:?}",
                self.log_format,
                valid_formats
            ));
        }

        Ok(())
    }
}

/// 校验 `host:port` 形式的监听地址
pub(crate) fn validate_bind_address(bind_address: &str) -> anyhow::Result<()> {
    if bind_address.is_empty() {
        return Err(anyhow::anyhow!("绑定地址不能为空"));
    }

    let Some((host, port)) = bind_address.rsplit_once(':') else {
        return Err(anyhow::anyhow!("绑定地址格式无效，应为 host:port"));
    };
    if host.is_empty() {
        return Err(anyhow::anyhow!("绑定地址缺少主机部分: {}", bind_address));
    }
    if port.parse::<u16>().is_err() {
        return Err(anyhow::anyhow!("绑定地址端口无效: {}", bind_address));
    }

    Ok(())
}
