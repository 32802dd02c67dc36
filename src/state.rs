// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

use std::sync::Arc;

use crate::accounts::AccountDirectory;
use crate::auth::SessionIssuer;
use crate::config::Config;
use crate::otp::{ChallengeStore, Verifier};
use crate::sms::SmsDelivery;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub challenges: Arc<ChallengeStore>,
    pub verifier: Verifier,
    pub accounts: Arc<AccountDirectory>,
    pub sessions: SessionIssuer,
    pub sms: Arc<dyn SmsDelivery>,
}

impl AppState {
    pub fn new(config: Config, sms: Arc<dyn SmsDelivery>) -> Self {
        let challenges = Arc::new(ChallengeStore::new());
        let sessions = SessionIssuer::new(&config.signing_secret, config.session_ttl);
        Self {
            config: Arc::new(config),
            verifier: Verifier::new(Arc::clone(&challenges)),
            challenges,
            accounts: Arc::new(AccountDirectory::new()),
            sessions,
            sms,
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State with development config and log-only delivery for unit tests.
    pub fn for_tests() -> Self {
        Self::new(Config::for_tests(), Arc::new(crate::sms::LogSmsDelivery))
    }

    /// State with a custom config, log-only delivery.
    pub fn for_tests_with_config(config: Config) -> Self {
        Self::new(config, Arc::new(crate::sms::LogSmsDelivery))
    }
}
