// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regulatory notes keyed by workcase type.

use caseforge_core::WorkcaseType;
use serde::{Deserialize, Serialize};

/// A single regulatory obligation attached to a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regulation {
    pub name: String,
    pub description: String,
    pub reference: String,
}

impl Regulation {
    fn new(name: &str, description: &str, reference: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            reference: reference.to_string(),
        }
    }
}

/// Regulatory notes for a workcase type.
///
/// Every case carries the record-keeping baseline; fund-movement reversals
/// add the return-timeframe rule, and compliance cases add suspicious
/// activity reporting.
pub fn regulations_for(workcase_type: WorkcaseType) -> Vec<Regulation> {
    let mut regulations = vec![Regulation::new(
        "Record Keeping",
        "All investigation communications must be archived for at least 7 years",
        "Banking Record-Keeping Standards",
    )];

    if matches!(
        workcase_type,
        WorkcaseType::Cancellation | WorkcaseType::ReturnFunds
    ) {
        regulations.push(Regulation::new(
            "Return Timeframes",
            "Funds return requests must be processed within 10 business days",
            "SWIFT Return Guidelines",
        ));
    }

    if workcase_type == WorkcaseType::RegulatoryCompliance {
        regulations.push(Regulation::new(
            "Suspicious Activity Reporting",
            "Potential suspicious activity must be reported to authorities within 30 days",
            "AML Compliance Standards",
        ));
    }

    regulations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_carries_record_keeping_baseline() {
        for workcase_type in [
            WorkcaseType::NonReceipt,
            WorkcaseType::Cancellation,
            WorkcaseType::RegulatoryCompliance,
            WorkcaseType::Unknown,
        ] {
            let regs = regulations_for(workcase_type);
            assert_eq!(regs[0].name, "Record Keeping");
        }
    }

    #[test]
    fn cancellation_and_return_funds_add_return_timeframes() {
        for workcase_type in [WorkcaseType::Cancellation, WorkcaseType::ReturnFunds] {
            let regs = regulations_for(workcase_type);
            assert_eq!(regs.len(), 2);
            assert_eq!(regs[1].name, "Return Timeframes");
        }
    }

    #[test]
    fn regulatory_compliance_adds_suspicious_activity_rule() {
        let regs = regulations_for(WorkcaseType::RegulatoryCompliance);
        assert_eq!(regs.len(), 2);
        assert_eq!(regs[1].name, "Suspicious Activity Reporting");
    }

    #[test]
    fn unknown_gets_baseline_only() {
        assert_eq!(regulations_for(WorkcaseType::Unknown).len(), 1);
    }
}
