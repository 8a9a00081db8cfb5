use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::store::{IdScope, Store};

/// Hands out project and deliverable ids.
///
/// A candidate is drawn uniformly from `[0, span)` and then probed upward
/// until the store reports it unused. Nothing reserves the id between the
/// probe and the caller's insert, so two concurrent allocators can pick the
/// same id; the losing insert then fails at the primary key.
pub struct IdAllocator {
    rng: Mutex<StdRng>,
    span: i64,
}

impl IdAllocator {
    pub const DEFAULT_SPAN: i64 = 1 << 16;

    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
            span: Self::DEFAULT_SPAN,
        }
    }

    /// Deterministic allocator for tests. A span of 1 yields the lowest
    /// unused id every time.
    #[must_use]
    pub fn seeded(seed: u64, span: i64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            span: span.max(1),
        }
    }

    pub fn allocate(&self, store: &dyn Store, scope: IdScope) -> Result<i64> {
        let mut candidate = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            rng.gen_range(0..self.span)
        };

        while store.id_in_use(scope, candidate)? {
            candidate = candidate
                .checked_add(1)
                .ok_or_else(|| Error::Config("id space exhausted".to_string()))?;
        }
        Ok(candidate)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
