use axum::{extract::State, http::Uri, Json};
use serde::Serialize;

use cluster_core::{ClusterError, Node};

use crate::{error::ApiResult, routes::AppState};

#[derive(Debug, Serialize)]
pub struct DispatchNode {
    pub id: String,
    pub address: String,
    pub port: u16,
    pub load: i64,
}

/// 分发决策：选中的节点和拼接出的目标URL
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    pub message: &'static str,
    pub node: DispatchNode,
    pub target_url: String,
}

impl DispatchResponse {
    fn new(node: Node, path: &str) -> Self {
        let target_url = node.target_url(path);
        Self {
            message: "Request proxied to node",
            node: DispatchNode {
                id: node.id,
                address: node.address,
                port: node.port,
                load: node.load,
            },
            target_url,
        }
    }
}

/// 为未匹配的路径选择下一个节点
///
/// 只描述分发结果，不转发请求。没有active节点时返回503。
pub async fn dispatch(State(state): State<AppState>, uri: Uri) -> ApiResult<Json<DispatchResponse>> {
    let node = state
        .balancer
        .next()
        .await
        .ok_or(ClusterError::NoAvailableNodes)?;

    Ok(Json(DispatchResponse::new(node, uri.path())))
}
