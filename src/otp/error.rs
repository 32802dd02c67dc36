// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! OTP flow errors.
//!
//! Every variant is an expected, user-facing outcome with its own message and
//! `error_code`, so clients can distinguish "wrong digits" (recoverable, the
//! challenge survives) from "stale or already used" (a new code must be
//! requested). Only delivery and internal failures map to 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Errors produced by the OTP send and verify flows.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    /// A required request field is missing or unusable.
    #[error("{0}")]
    MissingInput(String),
    /// No account exists for the phone (account-bound flow only).
    #[error("No account found for this phone number")]
    AccountNotFound,
    /// No challenge outstanding for the phone.
    #[error("No verification code was requested for this phone number")]
    ChallengeNotFound,
    /// The challenge exists but its TTL has passed.
    #[error("Verification code has expired, request a new one")]
    ChallengeExpired,
    /// The challenge was already consumed by a successful verification.
    #[error("Verification code has already been used, request a new one")]
    ChallengeAlreadyUsed,
    /// Submitted code does not match; the challenge remains valid.
    #[error("Incorrect verification code")]
    CodeMismatch,
    /// The SMS gateway rejected or failed the delivery.
    #[error("Failed to deliver verification code: {0}")]
    DeliveryFailure(String),
    /// Unexpected infrastructure fault (e.g. random source unavailable).
    #[error("Internal error: {0}")]
    InternalFailure(String),
}

#[derive(Serialize)]
struct OtpErrorBody {
    error: String,
    error_code: String,
}

impl OtpError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            OtpError::MissingInput(_) => "missing_input",
            OtpError::AccountNotFound => "account_not_found",
            OtpError::ChallengeNotFound => "challenge_not_found",
            OtpError::ChallengeExpired => "challenge_expired",
            OtpError::ChallengeAlreadyUsed => "challenge_already_used",
            OtpError::CodeMismatch => "code_mismatch",
            OtpError::DeliveryFailure(_) => "delivery_failure",
            OtpError::InternalFailure(_) => "internal_failure",
        }
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            OtpError::MissingInput(_)
            | OtpError::ChallengeExpired
            | OtpError::ChallengeAlreadyUsed
            | OtpError::CodeMismatch => StatusCode::BAD_REQUEST,
            OtpError::AccountNotFound | OtpError::ChallengeNotFound => StatusCode::NOT_FOUND,
            OtpError::DeliveryFailure(_) | OtpError::InternalFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for OtpError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(OtpErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
