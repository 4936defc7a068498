pub mod server;
pub mod tracing;

pub use server::TestServer;
pub use tracing::{CapturedEvent, events_with, init_test_tracing};
