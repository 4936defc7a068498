pub mod cli;
pub mod conf;
pub mod detect;
pub mod logging;
pub mod plugin;
pub mod server;
pub mod shutdown;
pub mod sink;
pub mod stream;
