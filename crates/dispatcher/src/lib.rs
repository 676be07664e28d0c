//! 节点分发
//!
//! 负载均衡器从注册表读取active节点快照，交给选择策略决定下一个节点。
//! 目前只提供轮询策略。

pub mod load_balancer;
pub mod strategies;


pub use load_balancer::*;
pub use strategies::*;
