// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response templates keyed by workcase type, with safe placeholder
//! substitution.
//!
//! Rendering is total: every placeholder in the fixed schema has a default,
//! extra extracted fields are ignored, and an empty fields map still
//! produces a complete message.

use caseforge_core::WorkcaseType;
use chrono::Utc;
use serde_json::{Map, Value};

const NON_RECEIPT_TEMPLATE: &str = "\
Subject: Investigation - Non-Receipt of Funds - Ref: {reference}

Dear {recipient},

We are investigating a case of non-receipt of funds reported by the beneficiary.

Transaction details:
- Reference: {reference}
- Amount: {amount} {currency}
- Date: {date}
- Beneficiary: {beneficiary}

Please provide information on the status of this payment.

Thank you,
Investigation Team
";

const CANCELLATION_TEMPLATE: &str = "\
Subject: Urgent Cancellation Request - Ref: {reference}

Dear {recipient},

We request the cancellation of the following payment:

Transaction details:
- Reference: {reference}
- Amount: {amount} {currency}
- Date: {date}

Reason for cancellation: {reason}

Please confirm.
";

const GENERIC_TEMPLATE: &str = "\
Subject: Investigation Request - Ref: {reference}

Dear {recipient},

We are investigating the following transaction:

Transaction details:
- Reference: {reference}

We will provide additional information shortly.

Thank you,
Investigation Team
";

/// The fixed placeholder schema every template draws from.
const PLACEHOLDERS: &[&str] = &[
    "reference",
    "recipient",
    "amount",
    "currency",
    "date",
    "beneficiary",
    "reason",
];

/// Look up the raw response template for a workcase type.
///
/// Types without a dedicated template get the generic one, including
/// `Unknown`.
pub fn response_template_for(workcase_type: WorkcaseType) -> &'static str {
    match workcase_type {
        WorkcaseType::NonReceipt => NON_RECEIPT_TEMPLATE,
        WorkcaseType::Cancellation => CANCELLATION_TEMPLATE,
        _ => GENERIC_TEMPLATE,
    }
}

/// Render a template against extracted fields.
///
/// Substitution covers only the fixed placeholder schema; any other keys in
/// `fields` are accepted and ignored. Missing fields use safe defaults, so
/// rendering never fails and never leaves a schema placeholder unresolved.
pub fn render_template(template: &str, fields: &Map<String, Value>) -> String {
    let mut rendered = template.to_string();
    for &name in PLACEHOLDERS {
        let value = fields
            .get(name)
            .map(field_text)
            .unwrap_or_else(|| default_for(name));
        rendered = rendered.replace(&format!("{{{name}}}"), &value);
    }
    rendered
}

/// Convenience: look up and render in one step.
pub fn render_response(workcase_type: WorkcaseType, fields: &Map<String, Value>) -> String {
    render_template(response_template_for(workcase_type), fields)
}

/// Render a JSON value as template text without quoting strings.
fn field_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn default_for(name: &str) -> String {
    match name {
        "recipient" => "Valued Correspondent".to_string(),
        "currency" => "USD".to_string(),
        "date" => Utc::now().format("%Y-%m-%d").to_string(),
        "reason" => "Customer request".to_string(),
        _ => "Unknown".to_string(),
    }
}
