mod memory;
mod provider;

pub use memory::{MemoryClaimStore, MemoryClaimStoreError};
pub use provider::{ClaimError, ClaimStore};
