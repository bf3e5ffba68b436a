// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-stage SLA hour budgets keyed by workcase type.
//!
//! Informational only: deadlines derived from these values are stored, not
//! actively scheduled. Enforcement belongs to an external caller polling
//! case status.

use caseforge_core::WorkcaseType;
use serde::{Deserialize, Serialize};

/// Time budget in hours for each investigation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlaSchedule {
    pub acknowledgment: u32,
    pub initial_research: u32,
    pub correspondence: u32,
    pub follow_up: u32,
    pub resolution: u32,
}

/// Base schedule: acknowledge within a day, resolve within ten.
const BASE: SlaSchedule = SlaSchedule {
    acknowledgment: 24,
    initial_research: 48,
    correspondence: 72,
    follow_up: 120,
    resolution: 240,
};

/// Look up the SLA schedule for a workcase type.
///
/// Cancellations are urgent (resolution within 72 hours); compliance cases
/// get extra research and resolution room (20 days). Everything else uses
/// the base schedule, including `Unknown`.
pub fn sla_for(workcase_type: WorkcaseType) -> SlaSchedule {
    match workcase_type {
        WorkcaseType::Cancellation => SlaSchedule {
            acknowledgment: 4,
            initial_research: 8,
            correspondence: 12,
            resolution: 72,
            ..BASE
        },
        WorkcaseType::RegulatoryCompliance => SlaSchedule {
            initial_research: 72,
            resolution: 480,
            ..BASE
        },
        _ => BASE,
    }
}
