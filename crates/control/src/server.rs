use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use cluster_core::{
    config::ControlSocketConfig, ClusterError, ClusterResult, NodeRegistry,
};

use crate::protocol::{ControlMessage, ControlReply};

/// accept失败后的退避时间
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// TCP控制套接字服务
///
/// 每个连接一个任务：读取一次、解码、更新注册表、至多写回一条应答，然后关闭连接。
/// 单个连接的失败只影响该连接。
pub struct ControlSocketServer {
    registry: Arc<dyn NodeRegistry>,
    read_buffer_size: usize,
}

impl ControlSocketServer {
    pub fn new(registry: Arc<dyn NodeRegistry>, config: &ControlSocketConfig) -> Self {
        Self {
            registry,
            read_buffer_size: config.read_buffer_size,
        }
    }

    /// 运行accept循环，直到收到关闭信号
    ///
    /// 关闭后不再接受新连接；已派生的连接任务各自完成当前交换。
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> ClusterResult<()> {
        let local_addr = listener.local_addr()?;
        info!("控制套接字监听于 {}", local_addr);

        let server = Arc::new(self);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("控制套接字收到关闭信号，停止接受连接");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(peer = %peer, "新的控制连接");
                        let server = Arc::clone(&server);
                        tokio::spawn(async move {
                            server.handle_connection(stream, peer).await;
                        });
                    }
                    Err(e) => {
                        error!("接受控制连接失败: {}", e);
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn handle_connection(&self, mut stream: TcpStream, peer: SocketAddr) {
        match self.process(&mut stream, peer).await {
            Ok(Some(reply)) => debug!(peer = %peer, status = %reply.status, "控制消息处理完成"),
            Ok(None) => debug!(peer = %peer, "对端未发送数据即关闭连接"),
            Err(e) if e.is_client_error() => {
                warn!(peer = %peer, "丢弃控制消息: {}", e);
            }
            Err(e) => warn!(peer = %peer, "控制连接处理失败: {}", e),
        }
    }

    async fn process(
        &self,
        stream: &mut TcpStream,
        peer: SocketAddr,
    ) -> ClusterResult<Option<ControlReply>> {
        let mut buffer = vec![0u8; self.read_buffer_size];
        let n = stream.read(&mut buffer).await?;
        if n == 0 {
            return Ok(None);
        }

        let message = ControlMessage::decode(&buffer[..n])?;
        let reply = self.dispatch(message, peer).await?;

        stream.write_all(&reply.encode()?).await?;
        Ok(Some(reply))
    }

    /// 按消息类型更新注册表并生成应答
    ///
    /// 不应答的情况以错误返回：字段缺失为 `InvalidMessage`，未知节点为 `NodeNotFound`。
    pub async fn dispatch(
        &self,
        message: ControlMessage,
        peer: SocketAddr,
    ) -> ClusterResult<ControlReply> {
        message.validate()?;

        match message {
            ControlMessage::Register { id, address, port } => {
                let observed = peer.ip().to_canonical().to_string();
                if observed != address {
                    debug!(
                        node_id = %id,
                        "使用对端地址 {} 替换上报地址 {}",
                        observed,
                        address
                    );
                }
                self.registry.register(&id, &observed, port).await;
                info!(node_id = %id, peer = %peer, "节点通过控制套接字注册");
                Ok(ControlReply::registered())
            }
            ControlMessage::Heartbeat { id } => {
                if self.registry.touch(&id).await {
                    Ok(ControlReply::ok())
                } else {
                    Err(ClusterError::NodeNotFound { id })
                }
            }
            ControlMessage::LoadUpdate { id, load } => {
                self.registry.update_load(&id, load).await?;
                Ok(ControlReply::updated())
            }
        }
    }
}
