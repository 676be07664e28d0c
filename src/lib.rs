//! # 集群协调器
//!
//! 把节点注册表、负载均衡器、TCP控制套接字和HTTP控制接口组装成一个进程。
//! 二进制入口见 `cluster-coordinator`。

pub mod app;
pub mod shutdown;

pub use app::{Application, Listeners};
pub use shutdown::ShutdownManager;
