// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic test doubles for Caseforge services.

pub mod mock_provider;

pub use mock_provider::MockProvider;
