use std::sync::Arc;

use tracing::{debug, warn};

use cluster_core::{Node, NodeRegistry, NodeSelectionStrategy};

/// 负载均衡器
///
/// 先取注册表快照（不持有策略的锁），再交给策略选择，
/// 因此两把锁不会嵌套。
pub struct LoadBalancer {
    registry: Arc<dyn NodeRegistry>,
    strategy: Arc<dyn NodeSelectionStrategy>,
}

/// 负载均衡器状态快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancerStatus {
    pub strategy: String,
    pub active_nodes: usize,
    pub current_index: u64,
}

impl LoadBalancer {
    pub fn new(
        registry: Arc<dyn NodeRegistry>,
        strategy: Arc<dyn NodeSelectionStrategy>,
    ) -> Self {
        Self { registry, strategy }
    }

    /// 选择下一个接收工作的节点
    ///
    /// 没有active节点时返回 `None`，轮转位置保持不变。
    /// 快照顺序由注册表决定，节点集合变化时一轮内可能重复或跳过某个节点。
    pub async fn next(&self) -> Option<Node> {
        let nodes = self.registry.list_active().await;
        if nodes.is_empty() {
            warn!("没有可用的active节点");
            return None;
        }

        let selected = self.strategy.select_node(&nodes).await;
        if let Some(node) = &selected {
            debug!("分发决策: {} -> {}:{}", node.id, node.address, node.port);
        }
        selected
    }

    pub fn strategy_name(&self) -> &str {
        self.strategy.name()
    }

    pub async fn current_index(&self) -> u64 {
        self.strategy.current_index().await
    }

    pub async fn status(&self) -> BalancerStatus {
        let active_nodes = self.registry.list_active().await.len();
        BalancerStatus {
            strategy: self.strategy.name().to_string(),
            active_nodes,
            current_index: self.strategy.current_index().await,
        }
    }
}
