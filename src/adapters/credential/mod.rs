//! Credential Store Adapters
//!
//! Implementations of the CredentialStore port for the remembered credential.
//!
//! ## Available Adapters
//!
//! - **FileCredentialStore** - Stores the credential as a YAML file on disk
//! - **InMemoryCredentialStore** - Stores the credential in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::credential::{FileCredentialStore, InMemoryCredentialStore};
//!
//! // Device: file-based storage that survives restarts
//! let store = FileCredentialStore::new("./data/remembered_credential.yaml");
//!
//! // Testing: in-memory storage
//! let store = InMemoryCredentialStore::new();
//! ```

mod file;
mod in_memory;

pub use file::FileCredentialStore;
pub use in_memory::InMemoryCredentialStore;
