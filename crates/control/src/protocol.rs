use serde::{Deserialize, Serialize};

use cluster_core::{ClusterError, ClusterResult};

/// 节点发往协调器的控制消息
///
/// 以 `type` 字段区分消息种类。缺失的字符串/数值字段按零值处理，
/// 由 [`ControlMessage::validate`] 判定是否可用；类型不符的字段会导致解码失败。
/// `port` 和 `load` 接受任意JSON数值，小数部分直接截断。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    Register {
        #[serde(default)]
        id: String,
        /// 仅作参考，协调器以连接的对端地址为准
        #[serde(default)]
        address: String,
        #[serde(default, deserialize_with = "numeric::port")]
        port: u16,
    },
    Heartbeat {
        #[serde(default)]
        id: String,
    },
    LoadUpdate {
        #[serde(default)]
        id: String,
        #[serde(default, deserialize_with = "numeric::load")]
        load: i64,
    },
}

/// 数值字段解码：整数和浮点数都接受，向零截断
mod numeric {
    use serde::{de::Error, Deserialize, Deserializer};

    fn truncated<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(D::Error::custom("数值无效"));
        }
        Ok(value.trunc())
    }

    pub fn port<'de, D>(deserializer: D) -> Result<u16, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = truncated(deserializer)?;
        if !(0.0..=f64::from(u16::MAX)).contains(&value) {
            return Err(D::Error::custom(format!("端口超出范围: {value}")));
        }
        Ok(value as u16)
    }

    pub fn load<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = truncated(deserializer)?;
        if !(i64::MIN as f64..=i64::MAX as f64).contains(&value) {
            return Err(D::Error::custom(format!("负载超出范围: {value}")));
        }
        Ok(value as i64)
    }
}

impl ControlMessage {
    pub fn register(id: impl Into<String>, address: impl Into<String>, port: u16) -> Self {
        ControlMessage::Register {
            id: id.into(),
            address: address.into(),
            port,
        }
    }

    pub fn heartbeat(id: impl Into<String>) -> Self {
        ControlMessage::Heartbeat { id: id.into() }
    }

    pub fn load_update(id: impl Into<String>, load: i64) -> Self {
        ControlMessage::LoadUpdate {
            id: id.into(),
            load,
        }
    }

    /// 从单次读取的字节中解码消息
    pub fn decode(bytes: &[u8]) -> ClusterResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn encode(&self) -> ClusterResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ControlMessage::Register { .. } => "register",
            ControlMessage::Heartbeat { .. } => "heartbeat",
            ControlMessage::LoadUpdate { .. } => "load_update",
        }
    }

    pub fn node_id(&self) -> &str {
        match self {
            ControlMessage::Register { id, .. }
            | ControlMessage::Heartbeat { id }
            | ControlMessage::LoadUpdate { id, .. } => id,
        }
    }

    /// 检查必填字段
    ///
    /// 所有消息都要求非空 `id`；注册还要求非空 `address` 和非零 `port`。
    pub fn validate(&self) -> ClusterResult<()> {
        if self.node_id().is_empty() {
            return Err(ClusterError::InvalidMessage(format!(
                "{} 消息缺少节点ID",
                self.kind()
            )));
        }

        if let ControlMessage::Register { address, port, .. } = self {
            if address.is_empty() {
                return Err(ClusterError::InvalidMessage("注册消息缺少地址".to_string()));
            }
            if *port == 0 {
                return Err(ClusterError::InvalidMessage("注册消息缺少端口".to_string()));
            }
        }

        Ok(())
    }
}

/// 协调器的应答: `{"status": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlReply {
    pub status: String,
}

impl ControlReply {
    pub const REGISTERED: &'static str = "registered";
    pub const OK: &'static str = "ok";
    pub const UPDATED: &'static str = "updated";

    pub fn registered() -> Self {
        Self::with_status(Self::REGISTERED)
    }

    pub fn ok() -> Self {
        Self::with_status(Self::OK)
    }

    pub fn updated() -> Self {
        Self::with_status(Self::UPDATED)
    }

    fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }

    pub fn encode(&self) -> ClusterResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> ClusterResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
