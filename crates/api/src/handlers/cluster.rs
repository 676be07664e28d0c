use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use cluster_core::Node;

use crate::{
    error::{ApiError, ApiResult},
    routes::AppState,
};

/// 集群状态
#[derive(Debug, Serialize)]
pub struct ClusterStatusResponse {
    pub total_nodes: usize,
    pub active_nodes: usize,
    pub health: bool,
    pub timestamp: DateTime<Utc>,
}

/// 注册请求
#[derive(Debug, Deserialize)]
pub struct RegisterNodeRequest {
    pub id: String,
    pub address: String,
    pub port: u16,
}

/// 获取集群状态
pub async fn cluster_status(State(state): State<AppState>) -> Json<ClusterStatusResponse> {
    // 注册表只增不减，先取active快照再计数保证 total_nodes >= active_nodes
    let active_nodes = state.registry.list_active().await.len();
    let total_nodes = state.registry.total_count().await;

    Json(ClusterStatusResponse {
        total_nodes,
        active_nodes,
        health: active_nodes > 0,
        timestamp: Utc::now(),
    })
}

/// 获取所有active节点
pub async fn list_nodes(State(state): State<AppState>) -> Json<Vec<Node>> {
    Json(state.registry.list_active().await)
}

/// 直接注册节点
///
/// 调用方是受信任的控制客户端，地址按请求体原样保存，不做对端地址替换。
/// 请求体按JSON解析，不要求 `Content-Type`。
pub async fn register_node(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let request: RegisterNodeRequest = serde_json::from_slice(&body)?;
    if request.id.is_empty() {
        return Err(ApiError::BadRequest("节点ID不能为空".to_string()));
    }

    state
        .registry
        .register(&request.id, &request.address, request.port)
        .await;
    info!(
        node_id = %request.id,
        "节点通过HTTP注册: {}:{}",
        request.address,
        request.port
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "registered" })),
    ))
}
