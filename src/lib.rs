// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! Shiftline Auth - Phone OTP Authentication & Session Service
//!
//! This crate issues short-lived, single-use verification codes bound to
//! phone numbers and exchanges verified codes for signed session tokens used
//! by the rest of the Shiftline staffing-marketplace backend.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `otp` - Code generation, challenge store, and verification
//! - `auth` - Session token issuance and validation (HS256 JWT)
//! - `accounts` - Phone-to-account directory and verified-flag binding
//! - `sms` - Out-of-band code delivery
//! - `sweep` - Background removal of expired challenges

pub mod accounts;
pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod otp;
pub mod sms;
pub mod state;
pub mod sweep;
