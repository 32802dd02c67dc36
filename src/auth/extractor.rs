// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! Axum extractor for authenticated sessions.
//!
//! Use the `Auth` extractor in handlers to require a valid session token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(session): Auth) -> impl IntoResponse {
//!     // session is VerifiedSession
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::claims::VerifiedSession;
use super::error::AuthError;
use crate::state::AppState;

/// Extractor for requests carrying a valid session token.
///
/// Validates the `Authorization: Bearer <token>` header against the session
/// issuer's key. Acceptance is signature + expiry only; there is no session
/// store to consult.
pub struct Auth(pub VerifiedSession);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let session = state.sessions.verify(token)?;

        Ok(Auth(session))
    }
}
