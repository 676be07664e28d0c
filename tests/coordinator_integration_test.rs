use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use cluster::{Application, Listeners};
use cluster_control::ControlClient;
use cluster_core::AppConfig;

struct RunningCoordinator {
    http_base: String,
    control_addr: String,
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<anyhow::Result<()>>,
    app: Arc<Application>,
}

impl RunningCoordinator {
    async fn start(config: AppConfig) -> Self {
        let app = Arc::new(Application::new(config).unwrap());
        let listeners: Listeners = app.bind().await.unwrap();
        let http_base = format!("http://{}", listeners.http_addr().unwrap());
        let control_addr = listeners.control_addr().unwrap().to_string();

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = {
            let app = Arc::clone(&app);
            tokio::spawn(async move { app.serve(listeners, shutdown_rx).await })
        };

        Self {
            http_base,
            control_addr,
            shutdown_tx,
            handle,
            app,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.http_base, path)
    }

    async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let result = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("协调器未在超时内停止")
            .unwrap();
        assert!(result.is_ok());
    }
}

fn ephemeral_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.api.bind_address = "127.0.0.1:0".to_string();
    config.control.bind_address = "127.0.0.1:0".to_string();
    config
}

#[tokio::test]
async fn test_two_workers_register_and_receive_dispatches() {
    let coordinator = RunningCoordinator::start(ephemeral_config()).await;
    let control = ControlClient::new(coordinator.control_addr.clone());

    for (id, port) in [("worker-1", 9001), ("worker-2", 9002)] {
        let reply = control.register(id, "203.0.113.10", port).await.unwrap();
        assert_eq!(reply.unwrap().status, "registered");
    }

    let http = reqwest::Client::new();

    let health: Value = http
        .get(coordinator.url("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let status: Value = http
        .get(coordinator.url("/api/cluster/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(status["active_nodes"].as_u64().unwrap() >= 2);
    assert_eq!(status["health"], true);

    let mut ok = 0;
    let mut per_node = std::collections::HashMap::<String, usize>::new();
    for _ in 0..10 {
        let response = http.get(coordinator.url("/")).send().await.unwrap();
        if response.status() == reqwest::StatusCode::OK {
            ok += 1;
            let body: Value = response.json().await.unwrap();
            // 控制套接字注册以连接来源地址为准
            assert_eq!(body["node"]["address"], "127.0.0.1");
            *per_node
                .entry(body["node"]["id"].as_str().unwrap().to_string())
                .or_default() += 1;
        }
    }
    assert!(ok >= 8, "只有 {ok}/10 个请求成功");
    assert_eq!(per_node.len(), 2);

    coordinator.stop().await;
}

#[tokio::test]
async fn test_heartbeat_and_load_update_visible_over_http() {
    let coordinator = RunningCoordinator::start(ephemeral_config()).await;
    let control = ControlClient::new(coordinator.control_addr.clone());

    control.register("w1", "ignored", 9100).await.unwrap();
    let reply = control.heartbeat("w1").await.unwrap().unwrap();
    assert_eq!(reply.status, "ok");
    let reply = control.report_load("w1", 37).await.unwrap().unwrap();
    assert_eq!(reply.status, "updated");

    let nodes: Value = reqwest::get(coordinator.url("/api/cluster/nodes"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let nodes = nodes.as_array().unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0]["id"], "w1");
    assert_eq!(nodes[0]["load"], 37);
    assert_eq!(nodes[0]["port"], 9100);

    coordinator.stop().await;
}

#[tokio::test]
async fn test_http_registration_shares_registry_with_control_socket() {
    let coordinator = RunningCoordinator::start(ephemeral_config()).await;

    let response = reqwest::Client::new()
        .post(coordinator.url("/api/cluster/register"))
        .json(&serde_json::json!({"id": "h1", "address": "10.9.9.9", "port": 8000}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    // 通过HTTP注册的节点可以接收控制套接字上报的负载
    let control = ControlClient::new(coordinator.control_addr.clone());
    let reply = control.report_load("h1", 5).await.unwrap();
    assert!(reply.is_some());

    let node = coordinator.app.registry().get("h1").await.unwrap();
    assert_eq!(node.address, "10.9.9.9");
    assert_eq!(node.load, 5);

    coordinator.stop().await;
}

#[tokio::test]
async fn test_dispatch_unavailable_until_registration() {
    let coordinator = RunningCoordinator::start(ephemeral_config()).await;

    let response = reqwest::get(coordinator.url("/anything")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);

    ControlClient::new(coordinator.control_addr.clone())
        .register("late", "x", 9300)
        .await
        .unwrap();

    let response = reqwest::get(coordinator.url("/anything")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["target_url"], "http://127.0.0.1:9300/anything");

    coordinator.stop().await;
}

#[tokio::test]
async fn test_coordinator_starts_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cluster.toml");
    std::fs::write(
        &path,
        r#"
[api]
bind_address = "127.0.0.1:0"

[control]
bind_address = "127.0.0.1:0"

[registry]
default_capacity = 250
"#,
    )
    .unwrap();

    let config = AppConfig::load(path.to_str()).unwrap();
    let coordinator = RunningCoordinator::start(config).await;

    ControlClient::new(coordinator.control_addr.clone())
        .register("cfg", "x", 9400)
        .await
        .unwrap();

    let nodes: Value = reqwest::get(coordinator.url("/api/cluster/nodes"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(nodes[0]["capacity"], 250);

    coordinator.stop().await;
}

#[tokio::test]
async fn test_shutdown_releases_listeners() {
    let coordinator = RunningCoordinator::start(ephemeral_config()).await;
    let control_addr = coordinator.control_addr.clone();

    coordinator.stop().await;

    let result = ControlClient::new(control_addr)
        .with_timeout(Duration::from_secs(1))
        .heartbeat("w1")
        .await;
    assert!(result.is_err());
}
