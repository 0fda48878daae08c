//! Application layer - the auth session controller and launch sequencing.
//!
//! This layer orchestrates domain state transitions and coordinates between
//! ports. The presentation layer talks only to [`AuthSessionController`].

mod controller;
mod launch_sequencer;
mod view_state;

pub use controller::{
    AuthSessionController, ControllerSettings, EnrollmentOutcome, FederatedSignInOutcome,
};
pub use launch_sequencer::LaunchSequencer;
pub use view_state::ViewState;
