use serde::{Deserialize, Serialize};

use super::api_observability::validate_bind_address;
use crate::models::DEFAULT_NODE_CAPACITY;

/// 读缓冲区上限，单条控制消息不应超过该大小
const MAX_READ_BUFFER_SIZE: usize = 1024 * 1024;

/// TCP控制套接字配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSocketConfig {
    pub bind_address: String,
    /// 单次读取的缓冲区大小，超出部分被截断
    pub read_buffer_size: usize,
}

impl Default for ControlSocketConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8081".to_string(),
            read_buffer_size: 1024,
        }
    }
}

impl ControlSocketConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_bind_address(&self.bind_address)?;

        if self.read_buffer_size == 0 {
            return Err(anyhow::anyhow!("读缓冲区大小必须大于0"));
        }
        if self.read_buffer_size > MAX_READ_BUFFER_SIZE {
            return Err(anyhow::anyhow!(
                "读缓冲区大小不能超过 {} 字节",
                MAX_READ_BUFFER_SIZE
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// 新注册节点的容量
    pub default_capacity: i64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_capacity: DEFAULT_NODE_CAPACITY,
        }
    }
}

impl RegistryConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_capacity < 0 {
            return Err(anyhow::anyhow!("默认容量不能为负数"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    pub dispatch_strategy: String, // 目前只支持 "round_robin"
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            dispatch_strategy: "round_robin".to_string(),
        }
    }
}

impl DispatcherConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        let valid_strategies = ["round_robin"];
        if !valid_strategies.contains(&self.dispatch_strategy.as_str()) {
            return Err(anyhow::anyhow!(
                "无效的调度策略: {}，支持的策略: {:?}",
                self.dispatch_strategy,
                valid_strategies
            ));
        }

        Ok(())
    }
}
