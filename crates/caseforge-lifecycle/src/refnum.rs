// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Investigation reference number generation.
//!
//! Format: `INV-YYYYMMDD-XXXX` with a random uppercase-alphanumeric suffix.
//! Uniqueness is enforced by the storage layer's unique index; the caller
//! regenerates on collision.

use chrono::{DateTime, Utc};
use rand::Rng;

const SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SUFFIX_LEN: usize = 4;

/// Generate a date-stamped reference number.
pub fn generate_reference_number(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("INV-{}-{suffix}", now.format("%Y%m%d"))
}
