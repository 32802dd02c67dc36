// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! JWT claims and verified session representation.

use serde::{Deserialize, Serialize};

/// Claims embedded in a session token.
///
/// Deliberately minimal: the subject (account id or phone), issue time, and
/// expiry. Everything else about the caller is looked up from the subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject the session was issued for.
    pub sub: String,

    /// Issued-at timestamp (Unix seconds).
    pub iat: i64,

    /// Expiration timestamp (Unix seconds).
    pub exp: i64,
}

/// A session that passed signature and expiry checks.
///
/// This is what handlers receive from the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    /// Subject from the `sub` claim.
    pub subject: String,
    /// Expiry from the `exp` claim (Unix seconds).
    pub expires_at: i64,
}

impl From<SessionClaims> for VerifiedSession {
    fn from(claims: SessionClaims) -> Self {
        Self {
            subject: claims.sub,
            expires_at: claims.exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verified_session_from_claims() {
        let claims = SessionClaims {
            sub: "acct_123".to_string(),
            iat: 1700000000,
            exp: 1700003600,
        };
        let session = VerifiedSession::from(claims);
        assert_eq!(session.subject, "acct_123");
        assert_eq!(session.expires_at, 1700003600);
    }
}
