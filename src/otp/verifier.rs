// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! Challenge verification.
//!
//! Maps the store's check-and-consume outcomes onto the user-facing error
//! taxonomy. A mismatch is the only recoverable failure; expired or
//! already-used challenges require the client to request a new code.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::error::OtpError;
use super::store::{ChallengeStore, CheckOutcome};
use crate::models::PhoneNumber;

/// Validates submitted (phone, code) pairs against the challenge store.
#[derive(Clone)]
pub struct Verifier {
    store: Arc<ChallengeStore>,
}

impl Verifier {
    pub fn new(store: Arc<ChallengeStore>) -> Self {
        Self { store }
    }

    /// Verify a submitted code, consuming the challenge on success.
    ///
    /// The expiry/consumed/match checks and the consumption itself run in one
    /// critical section inside the store, so concurrent verifies against the
    /// same challenge resolve to exactly one success.
    pub fn verify(
        &self,
        phone: &PhoneNumber,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpError> {
        match self.store.check_and_consume(phone, submitted, now) {
            CheckOutcome::Consumed => Ok(()),
            CheckOutcome::NotFound => Err(OtpError::ChallengeNotFound),
            CheckOutcome::Expired => Err(OtpError::ChallengeExpired),
            CheckOutcome::AlreadyUsed => Err(OtpError::ChallengeAlreadyUsed),
            CheckOutcome::Mismatch => Err(OtpError::CodeMismatch),
        }
    }
}
