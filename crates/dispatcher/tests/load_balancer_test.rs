#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use cluster_core::{NodeRegistry, DEFAULT_NODE_CAPACITY};
    use cluster_dispatcher::*;
    use cluster_infrastructure::InMemoryNodeRegistry;

    fn setup() -> (Arc<InMemoryNodeRegistry>, LoadBalancer) {
        let registry = Arc::new(InMemoryNodeRegistry::new(DEFAULT_NODE_CAPACITY));
        let balancer = LoadBalancer::new(registry.clone(), Arc::new(RoundRobinStrategy::new()));
        (registry, balancer)
    }

    #[tokio::test]
    async fn test_next_on_empty_registry() {
        let (_registry, balancer) = setup();

        assert!(balancer.next().await.is_none());
        assert_eq!(balancer.current_index().await, 0);
    }

    #[tokio::test]
    async fn test_each_node_visited_once_per_cycle() {
        let (registry, balancer) = setup();
        for i in 0..5u16 {
            registry
                .register(&format!("w{i}"), "10.0.0.1", 9000 + i)
                .await;
        }

        let mut seen = HashSet::new();
        for _ in 0..5 {
            seen.insert(balancer.next().await.unwrap().id);
        }
        assert_eq!(seen.len(), 5);
        assert_eq!(balancer.current_index().await, 5);

        // 注册表未变化时第二轮同样覆盖全部节点
        let mut second = HashSet::new();
        for _ in 0..5 {
            second.insert(balancer.next().await.unwrap().id);
        }
        assert_eq!(second, seen);
    }

    #[tokio::test]
    async fn test_next_returns_snapshot() {
        let (registry, balancer) = setup();
        registry.register("w1", "10.0.0.1", 9000).await;

        let node = balancer.next().await.unwrap();
        registry.update_load("w1", 99).await.unwrap();

        assert_eq!(node.load, 0);
        assert_eq!(registry.get("w1").await.unwrap().load, 99);
    }

    #[tokio::test]
    async fn test_new_node_joins_rotation() {
        let (registry, balancer) = setup();
        registry.register("w1", "10.0.0.1", 9000).await;

        assert_eq!(balancer.next().await.unwrap().id, "w1");

        registry.register("w2", "10.0.0.2", 9000).await;
        let ids: HashSet<String> = [
            balancer.next().await.unwrap().id,
            balancer.next().await.unwrap().id,
        ]
        .into_iter()
        .collect();
        assert_eq!(ids.len(), 2);
    }

    #[tokio::test]
    async fn test_status() {
        let (registry, balancer) = setup();
        registry.register("w1", "10.0.0.1", 9000).await;
        registry.register("w2", "10.0.0.2", 9000).await;
        balancer.next().await;

        let status = balancer.status().await;
        assert_eq!(status.strategy, "round_robin");
        assert_eq!(status.active_nodes, 2);
        assert_eq!(status.current_index, 1);
        assert_eq!(balancer.strategy_name(), "round_robin");
    }
}
