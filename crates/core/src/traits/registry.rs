use async_trait::async_trait;

use crate::{models::Node, ClusterResult};

/// 节点注册表
///
/// 集群中所有节点的唯一权威存储。注册表独占所有 `Node` 条目，
/// 负载均衡器和HTTP接口只读取快照。
///
/// # 并发约定
///
/// 结构性修改（插入/覆盖）必须与快照操作互斥。实现使用单一的排他边界
/// 保护整张映射表，不做按节点的细粒度加锁：覆盖注册会改变映射表的形状。
#[async_trait]
pub trait NodeRegistry: Send + Sync {
    /// 注册或覆盖节点
    ///
    /// 以 `id` 为键插入节点；已存在时整体覆盖：状态重置为 `active`，
    /// 负载清零，容量重置为默认值，最后心跳设为当前时间。
    /// 本操作不校验地址和端口格式，校验由调用方负责。
    ///
    /// # 返回
    ///
    /// 写入后的节点快照
    async fn register(&self, id: &str, address: &str, port: u16) -> Node;

    /// 获取所有状态为 `active` 的节点
    ///
    /// 返回顺序不确定，调用方不得依赖。
    async fn list_active(&self) -> Vec<Node>;

    /// 更新节点负载并刷新最后心跳时间
    ///
    /// # 错误
    ///
    /// * `NodeNotFound` - 节点不存在，注册表保持不变
    async fn update_load(&self, id: &str, load: i64) -> ClusterResult<()>;

    /// 仅刷新最后心跳时间
    ///
    /// 节点不存在时为空操作，返回 `false`。
    async fn touch(&self, id: &str) -> bool;

    /// 按ID获取节点快照
    async fn get(&self, id: &str) -> Option<Node>;

    /// 注册表中的节点总数（包括非active节点）
    async fn total_count(&self) -> usize;
}
