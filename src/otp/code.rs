// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

//! Verification code generation.
//!
//! Codes are numeric strings of a configured length, drawn uniformly from the
//! full digit range (leading zeros allowed). Randomness comes from
//! `ring::rand::SystemRandom`; a code must not be predictable from the phone
//! number or the current time.

use ring::rand::{SecureRandom, SystemRandom};

use super::error::OtpError;

/// Largest byte value that maps to digits without modulo bias (25 * 10).
const UNBIASED_LIMIT: u8 = 250;

/// Generate a numeric verification code of exactly `length` digits.
pub fn generate_code(length: usize) -> Result<String, OtpError> {
    let rng = SystemRandom::new();
    let mut code = String::with_capacity(length);

    while code.len() < length {
        let mut buf = [0u8; 16];
        rng.fill(&mut buf)
            .map_err(|_| OtpError::InternalFailure("random source unavailable".to_string()))?;

        for byte in buf {
            // Rejection sampling: bytes >= 250 would skew digits 0-5.
            if byte < UNBIASED_LIMIT {
                code.push(char::from(b'0' + byte % 10));
                if code.len() == length {
                    break;
                }
            }
        }
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_exact_length() {
        for length in [4, 6, 8] {
            let code = generate_code(length).expect("generation succeeds");
            assert_eq!(code.len(), length);
        }
    }

    #[test]
    fn generates_only_digits() {
        let code = generate_code(64).expect("generation succeeds");
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn consecutive_codes_differ() {
        // 32 digits colliding twice in a row would mean a broken source.
        let first = generate_code(32).expect("generation succeeds");
        let second = generate_code(32).expect("generation succeeds");
        assert_ne!(first, second);
    }

    #[test]
    fn all_digits_appear_over_many_draws() {
        let mut seen = [false; 10];
        for _ in 0..50 {
            let code = generate_code(16).expect("generation succeeds");
            for ch in code.chars() {
                seen[ch as usize - '0' as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "some digit never generated");
    }
}
