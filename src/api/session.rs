// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

use axum::Json;

use crate::{auth::Auth, models::SessionInfo};

/// Return the calling session's subject and expiry.
///
/// Exists for clients to confirm a stored token is still accepted; the
/// check is signature + expiry only, no server-side session state.
#[utoipa::path(
    get,
    path = "/v1/session/me",
    tag = "Session",
    responses(
        (status = 200, description = "Session is valid", body = SessionInfo),
        (status = 401, description = "Missing, malformed, or expired token")
    )
)]
pub async fn session_info(Auth(session): Auth) -> Json<SessionInfo> {
    Json(SessionInfo {
        subject: session.subject,
        expires_at: session.expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::VerifiedSession;

    #[tokio::test]
    async fn returns_subject_and_expiry() {
        let Json(info) = session_info(Auth(VerifiedSession {
            subject: "acct_123".to_string(),
            expires_at: 1700003600,
        }))
        .await;

        assert_eq!(info.subject, "acct_123");
        assert_eq!(info.expires_at, 1700003600);
    }
}
