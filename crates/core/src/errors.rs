use thiserror::Error;

/// 集群错误类型定义
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("节点未找到: {id}")]
    NodeNotFound { id: String },

    #[error("无效的控制消息: {0}")]
    InvalidMessage(String),

    #[error("没有可用的节点")]
    NoAvailableNodes,

    #[error("配置错误: {0}")]
    Configuration(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClusterError {
    /// 是否由调用方输入引起（格式错误或引用了未知节点）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ClusterError::NodeNotFound { .. }
                | ClusterError::InvalidMessage(_)
                | ClusterError::Serialization(_)
        )
    }
}

/// 统一的Result类型
pub type ClusterResult<T> = std::result::Result<T, ClusterError>;
