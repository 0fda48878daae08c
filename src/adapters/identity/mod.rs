//! Identity provider adapters.
//!
//! - `in_memory` - Account registry held in process memory, for tests, the
//!   demo binary and offline development

mod in_memory;

pub use in_memory::{FederatedAccount, InMemoryIdentityClient};
