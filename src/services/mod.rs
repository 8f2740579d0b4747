pub mod api;
pub mod monitor;
pub mod poller;
pub mod scheduler;
pub mod session;
