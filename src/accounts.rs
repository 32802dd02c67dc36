// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! # Account Directory
//!
//! Resolves phone numbers to marketplace accounts and owns the
//! `phone_verified` flag. The authoritative account records live in the
//! external account store; this directory is the slice of them this service
//! needs for identity binding.
//!
//! Two flows share this service:
//! - **Account-bound** (professionals): a pre-existing account is required;
//!   verification for an unknown phone fails with `AccountNotFound`.
//! - **Open enrollment**: any phone is accepted and the phone itself is the
//!   session subject; when an account happens to exist it is still marked
//!   verified.
//!
//! `mark_verified` is idempotent: repeat verification leaves the flag true
//! and never errors.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Account, PhoneNumber};

/// In-memory directory of accounts keyed by normalized phone number.
#[derive(Default)]
pub struct AccountDirectory {
    accounts: RwLock<HashMap<String, Account>>,
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the account registered for a phone number.
    pub async fn find_by_phone(&self, phone: &PhoneNumber) -> Option<Account> {
        self.accounts.read().await.get(phone.as_str()).cloned()
    }

    /// Flip the `phone_verified` flag for the account on this phone.
    ///
    /// Idempotent; returns the updated account, or `None` when no account
    /// exists for the phone (fine in the open-enrollment flow).
    pub async fn mark_verified(&self, phone: &PhoneNumber) -> Option<Account> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(phone.as_str())?;
        account.phone_verified = true;
        Some(account.clone())
    }

    /// Register an account for a phone number. Used at startup for seeding
    /// and by tests.
    pub async fn insert_account(&self, phone: PhoneNumber) -> Account {
        let account = Account {
            id: Uuid::new_v4().to_string(),
            phone: phone.clone(),
            phone_verified: false,
        };
        self.accounts
            .write()
            .await
            .insert(phone.as_str().to_string(), account.clone());
        account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone() -> PhoneNumber {
        PhoneNumber::normalize("+15551234567").unwrap()
    }

    #[tokio::test]
    async fn find_by_phone_returns_registered_account() {
        let directory = AccountDirectory::new();
        let created = directory.insert_account(phone()).await;

        let found = directory.find_by_phone(&phone()).await.expect("account exists");
        assert_eq!(found, created);
        assert!(!found.phone_verified);
    }

    #[tokio::test]
    async fn find_by_phone_returns_none_for_unknown() {
        let directory = AccountDirectory::new();
        assert!(directory.find_by_phone(&phone()).await.is_none());
    }

    #[tokio::test]
    async fn mark_verified_is_idempotent() {
        let directory = AccountDirectory::new();
        directory.insert_account(phone()).await;

        let first = directory.mark_verified(&phone()).await.expect("account exists");
        assert!(first.phone_verified);

        // Second verification must not error and must leave the flag set.
        let second = directory.mark_verified(&phone()).await.expect("account exists");
        assert!(second.phone_verified);
    }

    #[tokio::test]
    async fn mark_verified_on_unknown_phone_is_none() {
        let directory = AccountDirectory::new();
        assert!(directory.mark_verified(&phone()).await.is_none());
    }
}
