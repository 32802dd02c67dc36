// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! # Challenge Sweeper
//!
//! Background task that periodically removes expired challenges from the
//! store, bounding memory growth for phones that never come back to verify.
//! Lazy expiry on lookup already guarantees correctness; the sweep only
//! reclaims memory.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::otp::ChallengeStore;

/// Background sweeper for expired challenges.
pub struct ChallengeSweeper {
    store: Arc<ChallengeStore>,
    interval: Duration,
}

impl ChallengeSweeper {
    /// Create a sweeper over the given store.
    pub fn new(store: Arc<ChallengeStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Challenge sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Challenge sweeper shutting down");
                    return;
                }
            }

            self.sweep_step();
        }
    }

    /// Execute one sweep: drop every challenge strictly past expiry.
    fn sweep_step(&self) {
        let removed = self.store.sweep(Utc::now());
        if removed > 0 {
            info!(removed, remaining = self.store.len(), "Swept expired challenges");
        } else {
            debug!(remaining = self.store.len(), "Sweep found nothing expired");
        }
    }
}
