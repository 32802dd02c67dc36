// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! # OTP Module
//!
//! One-time-passcode issuance and verification.
//!
//! ## Flow
//!
//! 1. Client requests a code for a phone number
//! 2. [`code::generate_code`] produces a fixed-length numeric code
//! 3. [`ChallengeStore::issue`] replaces any prior challenge for that phone
//! 4. Code is delivered out-of-band (SMS)
//! 5. Client submits (phone, code); the [`Verifier`] enforces expiry and
//!    single use, consuming the challenge on success
//!
//! ## Security
//!
//! - Codes come from the system CSPRNG, uniform over the digit range
//! - Comparison is constant-time
//! - A challenge validates at most once; expiry and consumption are checked
//!   inside the same critical section so racing verifies resolve to exactly
//!   one winner

pub mod code;
pub mod error;
pub mod store;
pub mod verifier;

pub use error::OtpError;
pub use store::{Challenge, ChallengeStore};
pub use verifier::Verifier;
