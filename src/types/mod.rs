mod capability;
mod models;

pub use capability::Capability;
pub use models::*;
