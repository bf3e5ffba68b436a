// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Caseforge investigation engine.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Caseforge workspace. Collaborator
//! adapters (storage, generative provider) implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CaseforgeError;
pub use traits::{GenerativeAdapter, StorageAdapter};
pub use types::{
    ActionCounts, ActionStatus, CaseStatus, Investigation, InvestigationAction,
    InvestigationFilter, InvestigationPage, MessageAttribute, NewAction, NewInvestigation,
    NewMessage, Priority, ProcessingMode, StoredMessage, WorkcaseType,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_covers_spec_failures() {
        let _not_found = CaseforgeError::not_found("message", 7);
        let _validation = CaseforgeError::Validation("missing column".into());
        let _conflict = CaseforgeError::Conflict("duplicate reference".into());
        let _generation = CaseforgeError::generation("provider down");
        let _storage = CaseforgeError::Storage {
            source: Box::new(std::io::Error::other("locked")),
        };
    }

    #[test]
    fn trait_objects_are_constructible() {
        fn _assert_storage<T: StorageAdapter>() {}
        fn _assert_provider<T: GenerativeAdapter>() {}
        fn _assert_send_sync<T: Send + Sync>() {}
        _assert_send_sync::<CaseforgeError>();
    }
}
