mod handler;
mod listener;
mod pid;
mod request;
mod resolve;
mod response;
pub mod setup;
#[cfg(test)]
mod tests;

pub use handler::{Exchange, ServeContext, handle_request, render_log_page};
pub use listener::LogServer;
pub use request::{RequestError, RequestHead, read_request_head};
pub use resolve::{ResolveError, resolve_log_path};
pub use response::write_response;
pub use setup::run;
