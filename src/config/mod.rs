mod server;

pub use server::{HashConfig, ServerConfig};
