use std::io::ErrorKind;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

use cluster_core::{ClusterError, ClusterResult};

use crate::protocol::{ControlMessage, ControlReply};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// 控制套接字客户端（节点侧）
///
/// 每次调用建立一个新连接：写入消息，半关闭写端，读取应答直到EOF。
/// 协调器丢弃消息时返回 `Ok(None)`。
#[derive(Debug, Clone)]
pub struct ControlClient {
    addr: String,
    timeout: Duration,
}

impl ControlClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub async fn register(
        &self,
        id: &str,
        address: &str,
        port: u16,
    ) -> ClusterResult<Option<ControlReply>> {
        self.send(&ControlMessage::register(id, address, port)).await
    }

    pub async fn heartbeat(&self, id: &str) -> ClusterResult<Option<ControlReply>> {
        self.send(&ControlMessage::heartbeat(id)).await
    }

    pub async fn report_load(&self, id: &str, load: i64) -> ClusterResult<Option<ControlReply>> {
        self.send(&ControlMessage::load_update(id, load)).await
    }

    pub async fn send(&self, message: &ControlMessage) -> ClusterResult<Option<ControlReply>> {
        let payload = message.encode()?;
        self.send_raw(&payload).await
    }

    /// 发送任意字节并读取应答
    pub async fn send_raw(&self, payload: &[u8]) -> ClusterResult<Option<ControlReply>> {
        tokio::time::timeout(self.timeout, self.exchange(payload))
            .await
            .map_err(|_| {
                ClusterError::Network(format!("控制套接字 {} 应答超时", self.addr))
            })?
    }

    async fn exchange(&self, payload: &[u8]) -> ClusterResult<Option<ControlReply>> {
        let stream = TcpStream::connect(&self.addr).await.map_err(|e| {
            ClusterError::Network(format!("连接控制套接字 {} 失败: {}", self.addr, e))
        })?;
        let (mut read, mut write) = stream.into_split();

        write.write_all(payload).await?;
        write.shutdown().await?;

        let mut response = Vec::new();
        match read.read_to_end(&mut response).await {
            Ok(_) => {}
            // 协调器未读完请求就关闭连接时会发送RST
            Err(e) if e.kind() == ErrorKind::ConnectionReset => {
                debug!("控制连接被重置: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        }

        if response.is_empty() {
            return Ok(None);
        }
        debug!("控制套接字应答: {}", String::from_utf8_lossy(&response));
        Ok(Some(ControlReply::decode(&response)?))
    }
}
