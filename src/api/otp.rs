// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;

use crate::{
    models::{PhoneNumber, SendCodeRequest, SendCodeResponse, VerifyCodeRequest, VerifyCodeResponse},
    otp::{code::generate_code, OtpError},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/v1/otp/send",
    request_body = SendCodeRequest,
    tag = "OTP",
    responses(
        (status = 200, description = "Verification code issued and delivered", body = SendCodeResponse),
        (status = 400, description = "Missing or invalid phone number"),
        (status = 404, description = "No account for this phone (account-bound mode)"),
        (status = 500, description = "Code generation or delivery failed")
    )
)]
pub async fn send_code(
    State(state): State<AppState>,
    Json(request): Json<SendCodeRequest>,
) -> Result<Json<SendCodeResponse>, OtpError> {
    let phone = PhoneNumber::normalize(&request.phone)
        .ok_or_else(|| OtpError::MissingInput("A valid phone number is required".to_string()))?;

    if state.config.require_account && state.accounts.find_by_phone(&phone).await.is_none() {
        return Err(OtpError::AccountNotFound);
    }

    let code = generate_code(state.config.code_length)?;
    state
        .challenges
        .issue(&phone, code.clone(), state.config.challenge_ttl, Utc::now());

    // The challenge stays issued on delivery failure; a retried send
    // replaces it anyway.
    state
        .sms
        .send_code(&phone, &code)
        .await
        .map_err(|e| OtpError::DeliveryFailure(e.to_string()))?;

    info!(phone = %phone, "Issued verification code");

    Ok(Json(SendCodeResponse {
        success: true,
        message: "Verification code sent".to_string(),
        otp: state.config.expose_codes().then_some(code),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/otp/verify",
    request_body = VerifyCodeRequest,
    tag = "OTP",
    responses(
        (status = 200, description = "Code verified, session token issued", body = VerifyCodeResponse),
        (status = 400, description = "Missing fields, expired, already used, or wrong code"),
        (status = 404, description = "No outstanding challenge or no account for this phone"),
        (status = 500, description = "Session issuance failed")
    )
)]
pub async fn verify_code(
    State(state): State<AppState>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, OtpError> {
    let phone = PhoneNumber::normalize(&request.phone)
        .ok_or_else(|| OtpError::MissingInput("A valid phone number is required".to_string()))?;

    let submitted = request.otp.trim();
    if submitted.is_empty() {
        return Err(OtpError::MissingInput("Verification code is required".to_string()));
    }

    // Bound mode resolves the account before touching the challenge, so an
    // unregistered phone fails the same way whether or not a code exists.
    let account = state.accounts.find_by_phone(&phone).await;
    if state.config.require_account && account.is_none() {
        return Err(OtpError::AccountNotFound);
    }

    state.verifier.verify(&phone, submitted, Utc::now())?;

    // Idempotent: repeat verification leaves the flag set.
    let account = state.accounts.mark_verified(&phone).await.or(account);
    let subject = match account {
        Some(account) => account.id,
        None => phone.to_string(),
    };

    let token = state
        .sessions
        .issue(&subject, Utc::now())
        .map_err(|e| OtpError::InternalFailure(e.to_string()))?;

    info!(subject = %subject, "Phone verified, session issued");

    Ok(Json(VerifyCodeResponse {
        success: true,
        token,
        subject,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Environment};
    use crate::sms::testing::RecordingSmsDelivery;
    use chrono::Duration;
    use std::sync::Arc;

    const PHONE: &str = "+15551234567";

    fn phone() -> PhoneNumber {
        PhoneNumber::normalize(PHONE).unwrap()
    }

    async fn send(state: &AppState, raw_phone: &str) -> Result<SendCodeResponse, OtpError> {
        send_code(
            State(state.clone()),
            Json(SendCodeRequest {
                phone: raw_phone.to_string(),
            }),
        )
        .await
        .map(|Json(response)| response)
    }

    async fn verify(
        state: &AppState,
        raw_phone: &str,
        otp: &str,
    ) -> Result<VerifyCodeResponse, OtpError> {
        verify_code(
            State(state.clone()),
            Json(VerifyCodeRequest {
                phone: raw_phone.to_string(),
                otp: otp.to_string(),
            }),
        )
        .await
        .map(|Json(response)| response)
    }

    #[tokio::test]
    async fn send_then_verify_issues_session() {
        let state = AppState::for_tests();
        state.accounts.insert_account(phone()).await;

        let sent = send(&state, PHONE).await.expect("send succeeds");
        assert!(sent.success);
        let code = sent.otp.expect("development mode exposes the code");
        assert_eq!(code.len(), state.config.code_length);

        let verified = verify(&state, PHONE, &code).await.expect("verify succeeds");
        assert!(verified.success);

        // Token is valid and bound to the account id.
        let session = state.sessions.verify(&verified.token).expect("token verifies");
        assert_eq!(session.subject, verified.subject);

        let account = state.accounts.find_by_phone(&phone()).await.unwrap();
        assert_eq!(verified.subject, account.id);
        assert!(account.phone_verified);
    }

    #[tokio::test]
    async fn second_verify_with_same_code_is_already_used() {
        let state = AppState::for_tests();
        let code = send(&state, PHONE).await.unwrap().otp.unwrap();

        verify(&state, PHONE, &code).await.expect("first verify succeeds");
        let err = verify(&state, PHONE, &code).await.unwrap_err();
        assert_eq!(err, OtpError::ChallengeAlreadyUsed);
    }

    #[tokio::test]
    async fn expired_challenge_fails_with_correct_code() {
        let mut config = Config::for_tests();
        config.challenge_ttl = Duration::seconds(-1);
        let state = AppState::for_tests_with_config(config);

        let code = send(&state, PHONE).await.unwrap().otp.unwrap();
        let err = verify(&state, PHONE, &code).await.unwrap_err();
        assert_eq!(err, OtpError::ChallengeExpired);
    }

    #[tokio::test]
    async fn reissue_invalidates_previous_code() {
        let state = AppState::for_tests();
        let now = Utc::now();
        state
            .challenges
            .issue(&phone(), "111111".to_string(), Duration::seconds(600), now);
        state
            .challenges
            .issue(&phone(), "222222".to_string(), Duration::seconds(600), now);

        let err = verify(&state, PHONE, "111111").await.unwrap_err();
        assert_eq!(err, OtpError::CodeMismatch);

        verify(&state, PHONE, "222222").await.expect("new code verifies");
    }

    #[tokio::test]
    async fn wrong_code_is_non_destructive() {
        let state = AppState::for_tests();
        let code = send(&state, PHONE).await.unwrap().otp.unwrap();

        let wrong = if code == "000000" { "999999" } else { "000000" };
        let err = verify(&state, PHONE, wrong).await.unwrap_err();
        assert_eq!(err, OtpError::CodeMismatch);

        verify(&state, PHONE, &code)
            .await
            .expect("correct code still verifies after a mismatch");
    }

    #[tokio::test]
    async fn verify_without_challenge_is_not_found() {
        let state = AppState::for_tests();
        let err = verify(&state, PHONE, "482913").await.unwrap_err();
        assert_eq!(err, OtpError::ChallengeNotFound);
    }

    #[tokio::test]
    async fn missing_inputs_are_rejected() {
        let state = AppState::for_tests();

        let err = send(&state, "").await.unwrap_err();
        assert!(matches!(err, OtpError::MissingInput(_)));

        let err = verify(&state, "", "482913").await.unwrap_err();
        assert!(matches!(err, OtpError::MissingInput(_)));

        let err = verify(&state, PHONE, "   ").await.unwrap_err();
        assert!(matches!(err, OtpError::MissingInput(_)));
    }

    #[tokio::test]
    async fn bound_mode_requires_account() {
        let mut config = Config::for_tests();
        config.require_account = true;
        let state = AppState::for_tests_with_config(config);

        let err = send(&state, PHONE).await.unwrap_err();
        assert_eq!(err, OtpError::AccountNotFound);
        // No challenge is ever created for an unregistered phone.
        assert!(state.challenges.is_empty());

        let err = verify(&state, PHONE, "482913").await.unwrap_err();
        assert_eq!(err, OtpError::AccountNotFound);
    }

    #[tokio::test]
    async fn bound_mode_works_with_registered_account() {
        let mut config = Config::for_tests();
        config.require_account = true;
        let state = AppState::for_tests_with_config(config);
        let account = state.accounts.insert_account(phone()).await;

        let code = send(&state, PHONE).await.unwrap().otp.unwrap();
        let verified = verify(&state, PHONE, &code).await.unwrap();
        assert_eq!(verified.subject, account.id);
    }

    #[tokio::test]
    async fn open_mode_uses_phone_as_subject() {
        let state = AppState::for_tests();
        let code = send(&state, PHONE).await.unwrap().otp.unwrap();

        let verified = verify(&state, PHONE, &code).await.unwrap();
        assert_eq!(verified.subject, PHONE);
    }

    #[tokio::test]
    async fn production_mode_never_exposes_code() {
        let mut config = Config::for_tests();
        config.environment = Environment::Production;
        let state = AppState::for_tests_with_config(config);

        let sent = send(&state, PHONE).await.expect("send succeeds");
        assert!(sent.otp.is_none());
    }

    #[tokio::test]
    async fn delivery_failure_maps_to_500_class_error() {
        let state = AppState::new(
            Config::for_tests(),
            Arc::new(RecordingSmsDelivery::failing()),
        );

        let err = send(&state, PHONE).await.unwrap_err();
        assert!(matches!(err, OtpError::DeliveryFailure(_)));
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn repeat_verification_keeps_account_verified() {
        let state = AppState::for_tests();
        state.accounts.insert_account(phone()).await;

        for _ in 0..2 {
            let code = send(&state, PHONE).await.unwrap().otp.unwrap();
            verify(&state, PHONE, &code).await.expect("verify succeeds");
        }

        let account = state.accounts.find_by_phone(&phone()).await.unwrap();
        assert!(account.phone_verified);
    }

    #[tokio::test]
    async fn phone_is_normalized_before_lookup() {
        let state = AppState::for_tests();
        let code = send(&state, "+1 (555) 123-4567").await.unwrap().otp.unwrap();

        // Same number, differently formatted, hits the same challenge.
        verify(&state, PHONE, &code).await.expect("verify succeeds");
    }
}
