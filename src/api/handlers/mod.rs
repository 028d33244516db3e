//! Handler 模块

pub mod query_handler;
pub mod session_handler;
pub mod speech_handler;
pub mod system_handler;
