use axum::Json;
use serde_json::{json, Value};

/// 协调器自身的健康检查，不依赖节点数量
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "cluster-coordinator",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
