use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use cluster_core::{ClusterError, ClusterResult, Node, NodeSelectionStrategy};

/// 轮询策略
///
/// 计数器只在选中节点时递增，空快照不推进轮转位置。
/// 计数器由互斥锁保护，并发选择按获得锁的顺序串行化。
#[derive(Debug, Default)]
pub struct RoundRobinStrategy {
    counter: Mutex<u64>,
}

impl RoundRobinStrategy {
    pub fn new() -> Self {
        Self {
            counter: Mutex::new(0),
        }
    }
}

#[async_trait]
impl NodeSelectionStrategy for RoundRobinStrategy {
    async fn select_node(&self, nodes: &[Node]) -> Option<Node> {
        if nodes.is_empty() {
            debug!("没有可用的节点");
            return None;
        }

        let mut counter = self.counter.lock().await;
        let index = (*counter % nodes.len() as u64) as usize;
        *counter = counter.wrapping_add(1);
        let selected = &nodes[index];

        debug!(
            "轮询策略选择节点: {} (索引: {}/{})",
            selected.id,
            index,
            nodes.len()
        );

        Some(selected.clone())
    }

    fn name(&self) -> &str {
        "round_robin"
    }

    async fn current_index(&self) -> u64 {
        *self.counter.lock().await
    }
}

/// 按配置名称创建选择策略
pub fn create_strategy(name: &str) -> ClusterResult<Arc<dyn NodeSelectionStrategy>> {
    match name {
        "round_robin" => Ok(Arc::new(RoundRobinStrategy::new())),
        other => Err(ClusterError::Configuration(format!(
            "不支持的调度策略: {other}"
        ))),
    }
}
