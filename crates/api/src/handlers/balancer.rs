use axum::{extract::State, Json};
use serde::Serialize;

use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct BalancerStatusResponse {
    pub strategy: String,
    pub active_nodes: usize,
    pub current_index: u64,
}

/// 获取负载均衡器状态
pub async fn balancer_status(State(state): State<AppState>) -> Json<BalancerStatusResponse> {
    let status = state.balancer.status().await;
    Json(BalancerStatusResponse {
        strategy: status.strategy,
        active_nodes: status.active_nodes,
        current_index: status.current_index,
    })
}
