mod authenticator;
mod credentials;
mod password;

pub use authenticator::{Principal, authenticate};
pub use credentials::{Credentials, parse_basic_auth};
pub use password::PasswordHasher;
