use async_trait::async_trait;

use crate::models::Node;

/// 节点选择策略
#[async_trait]
pub trait NodeSelectionStrategy: Send + Sync {
    /// 从给定的active节点快照中选择一个节点
    ///
    /// 快照为空时返回 `None`。
    async fn select_node(&self, nodes: &[Node]) -> Option<Node>;

    /// 策略名称，例如 `round_robin`
    fn name(&self) -> &str;

    /// 当前轮转位置
    async fn current_index(&self) -> u64;
}
