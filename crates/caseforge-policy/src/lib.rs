// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification policy tables for the Caseforge investigation engine.
//!
//! Pure lookups keyed by [`WorkcaseType`]: regulatory notes, per-stage SLA
//! hour schedules, and response templates with safe placeholder
//! substitution. These tables exist to fill the gaps generative output
//! leaves behind — `Unknown` always resolves to usable defaults.

pub mod regulations;
pub mod sla;
pub mod template;

pub use regulations::{regulations_for, Regulation};
pub use sla::{sla_for, SlaSchedule};
pub use template::{render_response, render_template, response_template_for};

#[cfg(test)]
mod tests {
    use super::*;
    use caseforge_core::WorkcaseType;

    #[test]
    fn unknown_type_resolves_everywhere() {
        assert!(!regulations_for(WorkcaseType::Unknown).is_empty());
        assert_eq!(sla_for(WorkcaseType::Unknown).resolution, 240);
        assert!(response_template_for(WorkcaseType::Unknown).contains("{reference}"));
    }
}
