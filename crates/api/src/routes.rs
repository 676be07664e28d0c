use axum::{
    http::StatusCode,
    routing::{get, post, MethodRouter},
    Router,
};
use std::sync::Arc;

use cluster_core::NodeRegistry;
use cluster_dispatcher::LoadBalancer;

use crate::handlers::{
    balancer::balancer_status,
    cluster::{cluster_status, list_nodes, register_node},
    dispatch::dispatch,
    health::health_check,
};

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<dyn NodeRegistry>,
    pub balancer: Arc<LoadBalancer>,
}

/// 只读路由只接受GET，HEAD同样返回405
fn get_only<H, T>(handler: H) -> MethodRouter<AppState>
where
    H: axum::handler::Handler<T, AppState>,
    T: 'static,
{
    get(handler).head(|| async { StatusCode::METHOD_NOT_ALLOWED })
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/api/health", get_only(health_check))
        // 集群管理API
        .route("/api/cluster/status", get_only(cluster_status))
        .route("/api/cluster/nodes", get_only(list_nodes))
        .route("/api/cluster/register", post(register_node))
        // 负载均衡器
        .route("/api/balancer/status", get_only(balancer_status))
        // 其余路径全部视为分发请求，接受任意方法
        .fallback(dispatch)
        .with_state(state)
}
