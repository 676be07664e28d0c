pub mod balancer;
pub mod cluster;
pub mod dispatch;
pub mod health;
