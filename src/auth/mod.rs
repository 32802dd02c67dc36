// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! # Session Module
//!
//! Signed, time-bounded session credentials minted after a successful OTP
//! verification.
//!
//! ## Flow
//!
//! 1. `POST /v1/otp/verify` succeeds for a phone
//! 2. [`SessionIssuer`] mints an HS256 JWT carrying subject, issue time, and
//!    expiry
//! 3. Subsequent requests send `Authorization: Bearer <token>`; the [`Auth`]
//!    extractor validates signature and expiry
//!
//! ## Security
//!
//! - Sessions are stateless: acceptance is purely signature + expiry, no
//!   store lookup. The tradeoff is that a session cannot be revoked before
//!   its natural expiry.
//! - The signing secret is server-held and never leaves the process.
//! - Clock skew tolerance is 60 seconds.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod issuer;

pub use claims::VerifiedSession;
pub use error::AuthError;
pub use extractor::Auth;
pub use issuer::SessionIssuer;
