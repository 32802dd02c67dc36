// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! In-memory challenge store.
//!
//! Holds at most one challenge per phone number. All mutation happens behind
//! a single mutex, so `issue`, `lookup`, and consumption appear atomic to
//! concurrent requests: a verify that starts after an issue sees the new
//! challenge, and two verifies racing on one challenge resolve to exactly one
//! winner.
//!
//! The store is process-local and ephemeral, which is acceptable for a
//! single-instance deployment. Horizontal scaling needs a shared TTL-aware
//! store with atomic replace semantics keyed by phone.
//!
//! Store operations report absence as a value, never as an error; the
//! [`Verifier`](super::Verifier) maps outcomes onto the user-facing taxonomy.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

use crate::models::PhoneNumber;

/// A single OTP issuance record for one phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub phone: PhoneNumber,
    /// Fixed-length numeric code.
    pub code: String,
    pub issued_at: DateTime<Utc>,
    /// `issued_at + TTL`; the challenge never validates past this instant.
    pub expires_at: DateTime<Utc>,
    /// Set exactly once, on successful verification.
    pub consumed: bool,
}

/// Outcome of an atomic check-and-consume attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Code matched a live challenge; the challenge is now consumed.
    Consumed,
    /// No challenge outstanding for the phone.
    NotFound,
    /// Challenge was past its expiry; it has been removed.
    Expired,
    /// Challenge was already consumed by an earlier verification.
    AlreadyUsed,
    /// Code did not match; the challenge is left intact for a retry.
    Mismatch,
}

/// Process-local challenge store keyed by normalized phone number.
#[derive(Default)]
pub struct ChallengeStore {
    inner: Mutex<HashMap<String, Challenge>>,
}

impl ChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new challenge, unconditionally replacing any existing one for
    /// the same phone. The replacement is visible before this returns.
    pub fn issue(&self, phone: &PhoneNumber, code: String, ttl: Duration, now: DateTime<Utc>) {
        let challenge = Challenge {
            phone: phone.clone(),
            code,
            issued_at: now,
            expires_at: now + ttl,
            consumed: false,
        };
        self.lock().insert(phone.as_str().to_string(), challenge);
    }

    /// Look up the current challenge for a phone, if any.
    pub fn lookup(&self, phone: &PhoneNumber) -> Option<Challenge> {
        self.lock().get(phone.as_str()).cloned()
    }

    /// Mark the current challenge consumed. Idempotent; a no-op if the phone
    /// has no challenge.
    pub fn consume(&self, phone: &PhoneNumber) {
        if let Some(challenge) = self.lock().get_mut(phone.as_str()) {
            challenge.consumed = true;
        }
    }

    /// Remove the challenge for a phone, if any.
    pub fn remove(&self, phone: &PhoneNumber) {
        self.lock().remove(phone.as_str());
    }

    /// Atomically run the verification state machine for one submission.
    ///
    /// Expiry and the consumed flag are re-checked inside the same critical
    /// section as consumption, so a background sweep or a racing verify can
    /// never slip between the check and the consume. Expired entries are
    /// removed on sight (lazy expiry); a mismatch leaves the challenge
    /// intact so the user may retry until expiry.
    pub fn check_and_consume(
        &self,
        phone: &PhoneNumber,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> CheckOutcome {
        let mut map = self.lock();

        let Some(challenge) = map.get_mut(phone.as_str()) else {
            return CheckOutcome::NotFound;
        };

        if now > challenge.expires_at {
            map.remove(phone.as_str());
            return CheckOutcome::Expired;
        }

        if challenge.consumed {
            return CheckOutcome::AlreadyUsed;
        }

        if !codes_match(&challenge.code, submitted) {
            return CheckOutcome::Mismatch;
        }

        challenge.consumed = true;
        CheckOutcome::Consumed
    }

    /// Remove every challenge strictly past its expiry. Returns the number
    /// removed. Entries a valid verify could still consume are never touched.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, challenge| challenge.expires_at >= now);
        before - map.len()
    }

    /// Number of challenges currently held (live, consumed, or expired but
    /// not yet swept).
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Challenge>> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the map itself is still structurally sound.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Constant-time code comparison.
fn codes_match(expected: &str, submitted: &str) -> bool {
    ring::constant_time::verify_slices_are_equal(expected.as_bytes(), submitted.as_bytes()).is_ok()
}
