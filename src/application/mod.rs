pub mod config;
pub mod session;

pub use config::Config;
pub use session::{run_session, SessionOptions};
