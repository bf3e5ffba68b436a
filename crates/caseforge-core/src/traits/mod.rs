// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Services hold collaborators behind `Arc<dyn ...>`; all traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod provider;
pub mod storage;

pub use provider::GenerativeAdapter;
pub use storage::StorageAdapter;
