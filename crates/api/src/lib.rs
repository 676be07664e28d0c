//! # Cluster API
//!
//! 集群协调器的HTTP控制接口，基于Axum构建。
//!
//! ## API 端点
//!
//! - `GET /api/health` - 协调器健康检查（与节点数量无关）
//! - `GET /api/cluster/status` - 集群状态: `{total_nodes, active_nodes, health, timestamp}`
//! - `GET /api/cluster/nodes` - 所有active节点
//! - `POST /api/cluster/register` - 受信任的控制客户端直接注册节点，返回201
//! - `GET /api/balancer/status` - 负载均衡器状态
//! - 其他任意路径 - 分发决策：选出下一个节点并返回目标URL，不转发请求体
//!
//! 声明的路由对不匹配的方法返回405；没有可用节点时分发返回503。
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! use cluster_api::create_app;
//! use cluster_core::{config::ApiConfig, NodeRegistry};
//! use cluster_dispatcher::{LoadBalancer, RoundRobinStrategy};
//! use std::sync::Arc;
//!
//! # async fn run(registry: Arc<dyn NodeRegistry>) -> Result<(), Box<dyn std::error::Error>> {
//! let balancer = Arc::new(LoadBalancer::new(
//!     registry.clone(),
//!     Arc::new(RoundRobinStrategy::new()),
//! ));
//! let app = create_app(registry, balancer, &ApiConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## 错误响应
//!
//! ```json
//! {
//!   "error": {
//!     "message": "没有可用的节点",
//!     "type": "NO_AVAILABLE_NODES",
//!     "code": 503,
//!     "timestamp": "2024-01-01T00:00:00Z"
//!   }
//! }
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;

use axum::Router;
use std::sync::Arc;

use cluster_core::{config::ApiConfig, NodeRegistry};
use cluster_dispatcher::LoadBalancer;
use middleware::{cors_layer, request_logging, trace_layer};
use routes::{create_routes, AppState};

/// 创建完整的API应用
pub fn create_app(
    registry: Arc<dyn NodeRegistry>,
    balancer: Arc<LoadBalancer>,
    api_config: &ApiConfig,
) -> Router {
    let state = AppState { registry, balancer };

    let router = create_routes(state).layer(axum::middleware::from_fn(request_logging));
    let router = if api_config.cors_enabled {
        router.layer(cors_layer())
    } else {
        router
    };
    router.layer(trace_layer())
}
