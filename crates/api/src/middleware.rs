use axum::{extract::Request, http::Method, middleware::Next, response::Response};
use std::time::Instant;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};

/// 健康检查会被频繁轮询，只在debug级别记录
const HEALTH_PATH: &str = "/api/health";

/// 记录每个请求的方法、URI、状态码和耗时
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;
    let latency = start.elapsed();
    let status = response.status();

    if uri.path() == HEALTH_PATH {
        debug!(%method, %uri, status = status.as_u16(), ?latency, "健康检查");
    } else if status.is_server_error() {
        warn!(%method, %uri, status = status.as_u16(), ?latency, "请求处理失败");
    } else {
        info!(%method, %uri, status = status.as_u16(), ?latency, "完成请求处理");
    }

    response
}

/// 节点和探测脚本跨域访问控制接口
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
