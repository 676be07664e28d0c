//! # 控制套接字
//!
//! 节点通过TCP控制套接字宣告自身：每个连接只承载一条JSON消息和至多一条JSON应答，
//! 没有长度前缀，也不支持流水线。
//!
//! ```text
//! worker                         coordinator
//!   | --- {"type":"register",...} --> |
//!   | --- FIN (半关闭写端) ---------> |
//!   | <-- {"status":"registered"} --- |
//!   | <-- FIN ----------------------- |
//! ```
//!
//! 格式错误、字段缺失或引用未知节点的消息不会得到应答，连接直接关闭。

pub mod client;
pub mod protocol;
pub mod server;

pub use client::ControlClient;
pub use protocol::{ControlMessage, ControlReply};
pub use server::ControlSocketServer;
