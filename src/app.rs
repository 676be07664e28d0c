use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use cluster_api::create_app;
use cluster_control::ControlSocketServer;
use cluster_core::{AppConfig, NodeRegistry};
use cluster_dispatcher::{create_strategy, LoadBalancer};
use cluster_infrastructure::InMemoryNodeRegistry;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::{error, info};

/// 已绑定的两个监听器
pub struct Listeners {
    pub http: TcpListener,
    pub control: TcpListener,
}

impl Listeners {
    pub fn http_addr(&self) -> Result<SocketAddr> {
        self.http.local_addr().context("获取HTTP监听地址失败")
    }

    pub fn control_addr(&self) -> Result<SocketAddr> {
        self.control.local_addr().context("获取控制套接字监听地址失败")
    }
}

/// 协调器应用
///
/// 注册表只创建一次，以 `Arc<dyn NodeRegistry>` 注入负载均衡器、控制套接字和HTTP接口。
pub struct Application {
    config: AppConfig,
    registry: Arc<dyn NodeRegistry>,
    balancer: Arc<LoadBalancer>,
}

impl Application {
    pub fn new(config: AppConfig) -> Result<Self> {
        info!(
            "初始化协调器，调度策略: {}",
            config.dispatcher.dispatch_strategy
        );

        let registry: Arc<dyn NodeRegistry> =
            Arc::new(InMemoryNodeRegistry::new(config.registry.default_capacity));
        let strategy = create_strategy(&config.dispatcher.dispatch_strategy)
            .context("创建调度策略失败")?;
        let balancer = Arc::new(LoadBalancer::new(registry.clone(), strategy));

        Ok(Self {
            config,
            registry,
            balancer,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<dyn NodeRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn balancer(&self) -> Arc<LoadBalancer> {
        Arc::clone(&self.balancer)
    }

    /// 绑定HTTP和控制套接字监听地址，任一失败即返回错误
    pub async fn bind(&self) -> Result<Listeners> {
        let http = TcpListener::bind(&self.config.api.bind_address)
            .await
            .with_context(|| format!("绑定HTTP地址失败: {}", self.config.api.bind_address))?;
        let control = TcpListener::bind(&self.config.control.bind_address)
            .await
            .with_context(|| {
                format!("绑定控制套接字地址失败: {}", self.config.control.bind_address)
            })?;

        Ok(Listeners { http, control })
    }

    /// 并发运行HTTP服务和控制套接字，直到收到关闭信号
    pub async fn serve(
        &self,
        listeners: Listeners,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        let http_addr = listeners.http_addr()?;

        // 组件各自订阅本地通道，外部信号经转发任务送达
        let (local_tx, _) = broadcast::channel::<()>(1);
        let mut http_shutdown = local_tx.subscribe();
        let control_shutdown = local_tx.subscribe();
        tokio::spawn(async move {
            let _ = shutdown_rx.recv().await;
            let _ = local_tx.send(());
        });

        let Listeners { http, control } = listeners;
        let app = create_app(self.registry(), self.balancer(), &self.config.api);

        let http_handle = tokio::spawn(async move {
            info!("HTTP控制接口启动在 http://{}", http_addr);
            axum::serve(http, app)
                .with_graceful_shutdown(async move {
                    let _ = http_shutdown.recv().await;
                    info!("HTTP控制接口收到关闭信号");
                })
                .await
                .context("HTTP服务运行失败")
        });

        let server = ControlSocketServer::new(self.registry(), &self.config.control);
        let control_handle = tokio::spawn(async move {
            server
                .serve(control, control_shutdown)
                .await
                .context("控制套接字运行失败")
        });

        let (http_result, control_result) = tokio::join!(http_handle, control_handle);
        for result in [http_result, control_result] {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("组件运行失败: {:#}", e);
                    return Err(e);
                }
                Err(e) => return Err(anyhow::anyhow!("组件任务异常退出: {e}")),
            }
        }

        info!("所有组件已停止");
        Ok(())
    }

    /// 绑定并运行
    pub async fn run(&self, shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let listeners = self.bind().await?;
        self.serve(listeners, shutdown_rx).await
    }
}
