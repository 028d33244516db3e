//! 路由模块

pub mod query_routes;
pub mod session_routes;
pub mod speech_routes;
pub mod system_routes;
