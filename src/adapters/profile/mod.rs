//! Profile store adapters.
//!
//! - `in_memory` - Document store held in memory (testing/development)

mod in_memory;

pub use in_memory::InMemoryProfileStore;
