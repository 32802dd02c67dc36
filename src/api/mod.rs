// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        SendCodeRequest, SendCodeResponse, SessionInfo, VerifyCodeRequest, VerifyCodeResponse,
    },
    state::AppState,
};

pub mod health;
pub mod otp;
pub mod session;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/otp/send", post(otp::send_code))
        .route("/otp/verify", post(otp::verify_code))
        .route("/session/me", get(session::session_info))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        otp::send_code,
        otp::verify_code,
        session::session_info,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SendCodeRequest,
            SendCodeResponse,
            VerifyCodeRequest,
            VerifyCodeResponse,
            SessionInfo
        )
    ),
    tags(
        (name = "OTP", description = "Phone verification code issuance and verification"),
        (name = "Session", description = "Session token introspection"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
