//! Transient session state and the screen decision.
//!
//! `SessionState` is owned exclusively by the controller and rebuilt from
//! its four inputs (launch complete, identity changed, biometric result,
//! user action). It is never persisted.
//!
//! # Invariants
//!
//! - `identity` changes only through `identity_changed` (the provider's
//!   stream) or `challenge_succeeded` (restoring a remembered identity after
//!   a local biometric proof). No action handler sets it optimistically.
//! - `generation` increases on every sign-out. Work started under an older
//!   generation must not touch the state when it completes.
//! - Each biometric challenge gets its own ticket. Only the outstanding
//!   ticket may resolve the challenge, and a restored identity never
//!   replaces one the provider already delivered.

use super::{Identity, RememberedCredential, ScreenState};
use crate::domain::biometric::Capability;

/// Session state driving the screen decision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    launch_complete: bool,
    biometric_challenge_pending: bool,
    biometric_challenge_resolved: bool,
    challenge_sequence: u64,
    identity: Option<Identity>,
    biometric_setup_pending: bool,

    capability: Capability,
    remembered: Option<RememberedCredential>,
    onboarding_dismissed: bool,
    operation_in_flight: bool,
    generation: u64,
}

impl SessionState {
    /// Initial state: launching, nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Screen decision
    // ─────────────────────────────────────────────────────────────────────────

    /// Decides which screen is shown. First matching rule wins:
    ///
    /// 1. `Launching` until the launch sequencer fires
    /// 2. `BiometricChallenge` for a returning user with a remembered credential
    /// 3. `Onboarding` until dismissed
    /// 4. `CredentialEntry` otherwise while signed out
    /// 5. `BiometricEnrollment` right after a fresh sign-up or sign-in
    /// 6. `Authenticated`
    pub fn screen(&self) -> ScreenState {
        if !self.launch_complete {
            return ScreenState::Launching;
        }
        if self.awaits_biometric_challenge() {
            return ScreenState::BiometricChallenge;
        }
        if self.identity.is_none() {
            if !self.onboarding_dismissed {
                return ScreenState::Onboarding;
            }
            return ScreenState::CredentialEntry;
        }
        if self.biometric_setup_pending {
            ScreenState::BiometricEnrollment
        } else {
            ScreenState::Authenticated
        }
    }

    /// True when the device can run a biometric match.
    pub fn biometric_setup_allowed(&self) -> bool {
        self.capability.is_available()
    }

    /// Condition for the `BiometricChallenge` screen.
    pub fn awaits_biometric_challenge(&self) -> bool {
        self.launch_complete
            && self.biometric_setup_allowed()
            && self.identity.is_none()
            && self.remembered.is_some()
            && !self.biometric_challenge_resolved
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn launch_complete(&self) -> bool {
        self.launch_complete
    }

    pub fn biometric_challenge_pending(&self) -> bool {
        self.biometric_challenge_pending
    }

    pub fn biometric_challenge_resolved(&self) -> bool {
        self.biometric_challenge_resolved
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_identity_present(&self) -> bool {
        self.identity.is_some()
    }

    pub fn biometric_setup_pending(&self) -> bool {
        self.biometric_setup_pending
    }

    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn remembered(&self) -> Option<&RememberedCredential> {
        self.remembered.as_ref()
    }

    pub fn onboarding_dismissed(&self) -> bool {
        self.onboarding_dismissed
    }

    pub fn operation_in_flight(&self) -> bool {
        self.operation_in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true if no sign-out happened since `generation` was captured.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Records the first capability check after launch. Fires once; later
    /// calls return false and change nothing.
    pub fn complete_launch(
        &mut self,
        capability: Capability,
        remembered: Option<RememberedCredential>,
    ) -> bool {
        if self.launch_complete {
            return false;
        }
        self.launch_complete = true;
        self.capability = capability;
        if remembered.as_ref().is_some_and(|r| r.onboarding_complete) {
            self.onboarding_dismissed = true;
        }
        self.remembered = remembered;
        true
    }

    /// Applies a snapshot from the identity provider's stream.
    ///
    /// An account this device already remembers is never offered
    /// enrollment again.
    pub fn identity_changed(&mut self, identity: Option<Identity>) {
        match &identity {
            None if !self.operation_in_flight => self.biometric_setup_pending = false,
            Some(identity) if self.remembers(identity.email()) => {
                self.biometric_setup_pending = false
            }
            _ => {}
        }
        self.identity = identity;
    }

    /// True when the remembered credential belongs to `email`.
    pub fn remembers(&self, email: &str) -> bool {
        self.remembered
            .as_ref()
            .is_some_and(|r| r.belongs_to(email))
    }

    /// Claims the single operation slot. Returns the generation to hand
    /// back to `finish_operation`, or `None` if another operation holds it.
    pub fn begin_operation(&mut self) -> Option<u64> {
        if self.operation_in_flight {
            return None;
        }
        self.operation_in_flight = true;
        Some(self.generation)
    }

    /// Releases the operation slot if it still belongs to `generation`.
    pub fn finish_operation(&mut self, generation: u64) {
        if self.is_current(generation) {
            self.operation_in_flight = false;
        }
    }

    /// Marks (or clears) the transient "offer enrollment" flag.
    pub fn set_setup_pending(&mut self, generation: u64, pending: bool) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.biometric_setup_pending = pending;
        true
    }

    /// Marks a biometric challenge as awaiting the platform's answer and
    /// returns its ticket.
    pub fn begin_challenge(&mut self) -> Option<u64> {
        if self.biometric_challenge_pending {
            return None;
        }
        self.biometric_challenge_pending = true;
        self.challenge_sequence = self.challenge_sequence.wrapping_add(1);
        Some(self.challenge_sequence)
    }

    /// True while `ticket` is the challenge awaiting an answer.
    pub fn is_outstanding_challenge(&self, ticket: u64) -> bool {
        self.biometric_challenge_pending && self.challenge_sequence == ticket
    }

    /// Local trust decision: the user proved possession, so the remembered
    /// identity is restored without consulting the provider.
    ///
    /// Returns true only if the identity was restored. A stale ticket is
    /// ignored, and an identity that arrived from the provider meanwhile
    /// is kept.
    pub fn challenge_succeeded(&mut self, ticket: u64) -> bool {
        if !self.is_outstanding_challenge(ticket) {
            return false;
        }
        self.biometric_challenge_pending = false;
        if self.identity.is_some() {
            return false;
        }
        match &self.remembered {
            Some(remembered) => {
                self.identity = Some(remembered.to_identity());
                self.biometric_challenge_resolved = true;
                true
            }
            None => false,
        }
    }

    /// The challenge failed; identity is left untouched. Returns false for
    /// a stale ticket.
    pub fn challenge_failed(&mut self, ticket: u64) -> bool {
        if !self.is_outstanding_challenge(ticket) {
            return false;
        }
        self.biometric_challenge_pending = false;
        true
    }

    /// App returned to the foreground. A challenge the platform dismissed
    /// while backgrounded becomes available again, and its ticket is void.
    pub fn foregrounded(&mut self) -> bool {
        let was_pending = self.biometric_challenge_pending;
        self.biometric_challenge_pending = false;
        was_pending
    }

    /// The remembered credential was cleared from local storage.
    pub fn credential_forgotten(&mut self) {
        self.remembered = None;
        self.biometric_challenge_pending = false;
    }

    /// A credential was written to local storage after enrollment.
    pub fn credential_remembered(&mut self, credential: RememberedCredential) {
        self.remembered = Some(credential);
    }

    /// Enrollment was accepted, declined or failed; either way it is over.
    pub fn enrollment_finished(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.biometric_setup_pending = false;
        self.onboarding_dismissed = true;
        true
    }

    pub fn dismiss_onboarding(&mut self) {
        self.onboarding_dismissed = true;
    }

    /// Resets the session after sign-out and starts a new generation.
    ///
    /// Launch completion, device capability, the onboarding dismissal and
    /// the remembered credential survive: the launch sequencer never fires
    /// twice and biometric opt-in outlives sign-out.
    pub fn sign_out(&mut self) {
        *self = Self {
            launch_complete: self.launch_complete,
            capability: self.capability,
            remembered: self.remembered.take(),
            onboarding_dismissed: self.onboarding_dismissed,
            challenge_sequence: self.challenge_sequence,
            generation: self.generation.wrapping_add(1),
            ..Self::default()
        };
    }
}
