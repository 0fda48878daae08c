//! Profile domain - the application-owned user document.

mod profile;

pub use profile::{Profile, ProfileUpdate};
