use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 注册时分配的默认容量
pub const DEFAULT_NODE_CAPACITY: i64 = 100;

/// 集群中的工作节点
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: String,
    pub address: String,
    pub port: u16,
    pub status: NodeStatus,
    pub last_seen: DateTime<Utc>,
    pub load: i64,
    pub capacity: i64,
}

/// 节点状态
///
/// 目前只有 `active` 会被设置，其余取值为后续状态预留。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum NodeStatus {
    Active,
}

impl NodeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Active => "active",
        }
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Node {
    /// 创建新注册的节点：状态为active，负载清零，最后心跳为当前时间
    pub fn new(
        id: impl Into<String>,
        address: impl Into<String>,
        port: u16,
        capacity: i64,
    ) -> Self {
        Self {
            id: id.into(),
            address: address.into(),
            port,
            status: NodeStatus::Active,
            last_seen: Utc::now(),
            load: 0,
            capacity,
        }
    }

    /// 检查节点是否处于active状态
    pub fn is_active(&self) -> bool {
        matches!(self.status, NodeStatus::Active)
    }

    /// 刷新最后心跳时间
    pub fn touch(&mut self) {
        self.last_seen = Utc::now();
    }

    /// 更新负载并刷新最后心跳时间
    pub fn update_load(&mut self, load: i64) {
        self.load = load;
        self.touch();
    }

    /// 拼接转发目标URL: `http://{address}:{port}{path}`
    pub fn target_url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.address, self.port, path)
    }
}
