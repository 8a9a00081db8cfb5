use std::fmt;

use crate::error::{Error, Result};
use crate::types::Capability;

/// The request verbs the resource model understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Put,
    Post,
    Delete,
}

impl Verb {
    /// Parses an HTTP method name. Anything outside GET/PUT/POST/DELETE is
    /// rejected.
    pub fn parse(method: &str) -> Result<Verb> {
        match method {
            "GET" => Ok(Verb::Get),
            "PUT" => Ok(Verb::Put),
            "POST" => Ok(Verb::Post),
            "DELETE" => Ok(Verb::Delete),
            _ => Err(Error::InvalidMethod),
        }
    }

    /// The capability bit a caller must hold to use this verb.
    #[must_use]
    pub const fn required_capability(self) -> Capability {
        match self {
            Verb::Get => Capability::GET,
            Verb::Put => Capability::SET,
            Verb::Post => Capability::CREATE,
            Verb::Delete => Capability::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Get => "GET",
            Verb::Put => "PUT",
            Verb::Post => "POST",
            Verb::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Rejects the request unless `granted` holds the bit `verb` requires.
pub fn require(verb: Verb, granted: Capability) -> Result<()> {
    if granted.has(verb.required_capability()) {
        Ok(())
    } else {
        Err(Error::Forbidden)
    }
}
