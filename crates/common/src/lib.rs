/**
 * Persistence of claim records keyed by path.
 *  The `ClaimStore` trait plus an in-memory
 *  implementation for tests and ephemeral use.
 */
pub mod claim;
/**
 * Text transforms over a codebook.
 */
pub mod cipher;
/**
 * The 26-letter substitution table and its
 *  stored JSON form.
 */
pub mod codebook;
/**
 * Salted hashing of claim secrets.
 */
pub mod crypto;
/**
 * The claim/edit state machine that web
 *  handlers call into.
 */
pub mod registry;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::build_info;
    pub use crate::cipher::{decode, encode};
    pub use crate::claim::{ClaimError, ClaimStore, MemoryClaimStore};
    pub use crate::codebook::{Codebook, CodebookError};
    pub use crate::crypto::{SecretHash, SecretHashError};
    pub use crate::registry::{
        CodebookView, EditGrant, Notice, PathState, Registry, RegistryError,
    };
    pub use crate::version::BuildInfo;
}
