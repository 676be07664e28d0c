use async_trait::async_trait;
use cluster_core::{ClusterError, ClusterResult, Node, NodeRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// 内存节点注册表
///
/// 整张映射表由一把读写锁保护：注册、负载更新和心跳取写锁，
/// 快照和查询取读锁，因此快照期间不会观察到部分写入的节点。
/// 节点从不删除，也没有过期机制。
#[derive(Debug, Clone)]
pub struct InMemoryNodeRegistry {
    nodes: Arc<RwLock<HashMap<String, Node>>>,
    default_capacity: i64,
}

impl InMemoryNodeRegistry {
    pub fn new(default_capacity: i64) -> Self {
        info!(
            "Creating in-memory node registry, default capacity {}",
            default_capacity
        );
        Self {
            nodes: Arc::new(RwLock::new(HashMap::new())),
            default_capacity,
        }
    }

    pub fn default_capacity(&self) -> i64 {
        self.default_capacity
    }
}

#[async_trait]
impl NodeRegistry for InMemoryNodeRegistry {
    async fn register(&self, id: &str, address: &str, port: u16) -> Node {
        let node = Node::new(id, address, port, self.default_capacity);

        let mut nodes = self.nodes.write().await;
        let replaced = nodes.insert(id.to_string(), node.clone()).is_some();
        drop(nodes);

        if replaced {
            info!("节点重新注册，覆盖原有条目: {} ({}:{})", id, address, port);
        } else {
            info!("节点注册: {} ({}:{})", id, address, port);
        }
        node
    }

    async fn list_active(&self) -> Vec<Node> {
        let nodes = self.nodes.read().await;
        nodes.values().filter(|n| n.is_active()).cloned().collect()
    }

    async fn update_load(&self, id: &str, load: i64) -> ClusterResult<()> {
        let mut nodes = self.nodes.write().await;
        match nodes.get_mut(id) {
            Some(node) => {
                node.update_load(load);
                debug!("节点 {} 负载更新为 {}", id, load);
                Ok(())
            }
            None => Err(ClusterError::NodeNotFound { id: id.to_string() }),
        }
    }

    async fn touch(&self, id: &str) -> bool {
        let mut nodes = self.nodes.write().await;
        match nodes.get_mut(id) {
            Some(node) => {
                node.touch();
                debug!("节点 {} 心跳", id);
                true
            }
            None => false,
        }
    }

    async fn get(&self, id: &str) -> Option<Node> {
        self.nodes.read().await.get(id).cloned()
    }

    async fn total_count(&self) -> usize {
        self.nodes.read().await.len()
    }
}
