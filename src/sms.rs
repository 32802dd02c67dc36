// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! # SMS Delivery
//!
//! Out-of-band delivery of verification codes. The [`SmsDelivery`] trait is
//! the seam between the OTP flow and the gateway; the flow only cares that
//! delivery succeeded or failed.
//!
//! Two implementations:
//! - [`HttpSmsDelivery`]: POSTs to an HTTP SMS gateway (production).
//! - [`LogSmsDelivery`]: logs the message instead of sending it. Development
//!   only; it writes the code to the log.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::models::PhoneNumber;

/// Delivery failure reported by the gateway or transport.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DeliveryError(pub String);

/// Sends a verification code to a phone, out-of-band.
#[async_trait]
pub trait SmsDelivery: Send + Sync {
    async fn send_code(&self, phone: &PhoneNumber, code: &str) -> Result<(), DeliveryError>;
}

/// Message payload accepted by the SMS gateway.
#[derive(Serialize)]
struct SmsMessage<'a> {
    to: &'a str,
    body: String,
}

/// HTTP SMS gateway client.
pub struct HttpSmsDelivery {
    endpoint: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpSmsDelivery {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

#[async_trait]
impl SmsDelivery for HttpSmsDelivery {
    async fn send_code(&self, phone: &PhoneNumber, code: &str) -> Result<(), DeliveryError> {
        let message = SmsMessage {
            to: phone.as_str(),
            body: format!("Your Shiftline verification code is {code}"),
        };

        let mut request = self.client.post(&self.endpoint).json(&message);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DeliveryError(format!(
                "HTTP {} from SMS gateway",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Log-only delivery for development and tests.
#[derive(Default)]
pub struct LogSmsDelivery;

#[async_trait]
impl SmsDelivery for LogSmsDelivery {
    async fn send_code(&self, phone: &PhoneNumber, code: &str) -> Result<(), DeliveryError> {
        info!(phone = %phone, code, "SMS delivery disabled, logging verification code");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingSmsDelivery;
    use super::*;
    use std::sync::atomic::Ordering;

    fn phone() -> PhoneNumber {
        PhoneNumber::normalize("+15551234567").unwrap()
    }

    #[tokio::test]
    async fn log_delivery_always_succeeds() {
        let delivery = LogSmsDelivery;
        assert!(delivery.send_code(&phone(), "482913").await.is_ok());
    }

    #[tokio::test]
    async fn recording_delivery_counts_and_fails_on_demand() {
        let ok = RecordingSmsDelivery::default();
        ok.send_code(&phone(), "482913").await.unwrap();
        assert_eq!(ok.sent.load(Ordering::SeqCst), 1);

        let failing = RecordingSmsDelivery::failing();
        assert!(failing.send_code(&phone(), "482913").await.is_err());
    }
}
