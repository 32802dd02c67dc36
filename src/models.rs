// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! # API Data Models
//!
//! Request and response data structures for the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for automatic JSON handling and
//! OpenAPI documentation.
//!
//! ## Phone Number Type
//!
//! The [`PhoneNumber`] newtype wraps a normalized phone identifier and is the
//! key under which challenges are stored. Normalization strips separators so
//! `"+1 555-123-4567"` and `"+15551234567"` address the same challenge.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Phone Number Type
// =============================================================================

/// Normalized phone identifier.
///
/// Produced by [`PhoneNumber::normalize`]; contains only digits with an
/// optional leading `+`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhoneNumber(pub String);

/// Minimum digits for a plausible phone number (shortest national formats).
const MIN_PHONE_DIGITS: usize = 7;

impl PhoneNumber {
    /// Normalize a raw phone string.
    ///
    /// Keeps a leading `+` and all digits, drops spaces, dashes, dots, and
    /// parentheses. Returns `None` for empty input, input with other
    /// characters, or fewer than seven digits.
    pub fn normalize(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let (plus, rest) = match trimmed.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", trimmed),
        };

        let mut digits = String::with_capacity(rest.len());
        for ch in rest.chars() {
            match ch {
                '0'..='9' => digits.push(ch),
                ' ' | '-' | '.' | '(' | ')' => {}
                _ => return None,
            }
        }

        if digits.len() < MIN_PHONE_DIGITS {
            return None;
        }

        Some(PhoneNumber(format!("{plus}{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

// =============================================================================
// OTP Models
// =============================================================================

/// Request to send a verification code to a phone.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendCodeRequest {
    /// Phone number to deliver the code to.
    pub phone: String,
}

/// Response after a verification code has been issued.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SendCodeResponse {
    pub success: bool,
    /// Human-readable confirmation message.
    pub message: String,
    /// The issued code. Present only when the deployment is not configured
    /// as production; never returned by production builds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Request to verify a previously delivered code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeRequest {
    /// Phone number the code was sent to.
    pub phone: String,
    /// The code as entered by the user.
    pub otp: String,
}

/// Response after successful verification: a signed session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerifyCodeResponse {
    pub success: bool,
    /// Signed bearer token for subsequent authenticated calls.
    pub token: String,
    /// Subject the token was issued for (account id or phone).
    pub subject: String,
}

// =============================================================================
// Account Models
// =============================================================================

/// A marketplace account as seen by this service.
///
/// The full profile lives in the external account store; this service only
/// needs the identity mapping and the phone-verified flag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Account {
    /// Unique account identifier.
    pub id: String,
    /// Normalized phone number.
    pub phone: PhoneNumber,
    /// Whether the phone has been verified via OTP at least once.
    pub phone_verified: bool,
}

// =============================================================================
// Session Models
// =============================================================================

/// Information about the calling session, returned by `/v1/session/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    /// Subject the session was issued for.
    pub subject: String,
    /// Expiry as a Unix timestamp.
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators() {
        let phone = PhoneNumber::normalize("+1 (555) 123-4567").expect("valid phone");
        assert_eq!(phone.as_str(), "+15551234567");
    }

    #[test]
    fn normalize_keeps_plain_digits() {
        let phone = PhoneNumber::normalize("5551234567").expect("valid phone");
        assert_eq!(phone.as_str(), "5551234567");
    }

    #[test]
    fn normalize_rejects_empty_and_short_input() {
        assert!(PhoneNumber::normalize("").is_none());
        assert!(PhoneNumber::normalize("   ").is_none());
        assert!(PhoneNumber::normalize("+1 23").is_none());
    }

    #[test]
    fn normalize_rejects_letters() {
        assert!(PhoneNumber::normalize("555-CALL-NOW").is_none());
    }

    #[test]
    fn send_response_omits_absent_otp_field() {
        let response = SendCodeResponse {
            success: true,
            message: "sent".to_string(),
            otp: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("otp"));
    }
}
