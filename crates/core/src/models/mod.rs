//! # 数据模型
//!
//! 集群控制平面的核心数据结构。
//!
//! ### Node - 工作节点
//! 由节点自身分配的唯一ID标识，记录网络地址、端口、状态、最后心跳时间、
//! 上报负载和注册时固定的容量。节点只会被注册表创建或覆盖，从不删除。
//!
//! 所有时间字段使用 `DateTime<Utc>`，序列化为RFC3339字符串。

pub mod node;

pub use node::*;
