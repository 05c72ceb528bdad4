// Server module entry point
// Local HTTP host for the dispatcher: listener, accept loop, per-connection serving

pub mod connection;
pub mod listener;

// Rust 不允许 loop 作为模块名（关键字），改用 server_loop
#[path = "loop.rs"]
pub mod server_loop;

use crate::config::Config;
use crate::handler::Dispatcher;

// 重新导出常用类型
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;

/// Shared, read-only state handed to every connection
pub struct ServerState {
    pub config: Config,
    pub dispatcher: Dispatcher,
}
