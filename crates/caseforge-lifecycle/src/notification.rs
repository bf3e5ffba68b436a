// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Customer notification generation for an investigation.
//!
//! The generative collaborator drafts the email; an unparsable draft
//! degrades to the canned status-update wording so the caller always gets
//! a sendable subject and body.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use caseforge_core::CaseforgeError;
use caseforge_normalize::normalize_object;
use caseforge_pipeline::prompts;

use crate::InvestigationService;

/// A generated customer notification, stamped with its case context.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerNotification {
    pub subject: String,
    pub body: String,
    pub investigation_id: i64,
    pub reference_number: String,
    pub notification_type: String,
    pub generated_at: DateTime<Utc>,
}

impl InvestigationService {
    /// Draft a customer notification email for a case.
    ///
    /// `notification_type` is a free-form label (status_update, resolution,
    /// request_info). Fails with `NotFound` for an unknown case and with
    /// `Generation` when the collaborator call itself fails.
    pub async fn generate_customer_notification(
        &self,
        investigation_id: i64,
        notification_type: &str,
    ) -> Result<CustomerNotification, CaseforgeError> {
        let detail = self.get_investigation(investigation_id).await?;
        let investigation = &detail.investigation;

        let customer_info_json = investigation
            .customer_info
            .as_ref()
            .map(|info| serde_json::to_string_pretty(info).unwrap_or_else(|_| "{}".to_string()))
            .unwrap_or_else(|| "{}".to_string());

        let prompt = prompts::notification_prompt(
            &investigation.reference_number,
            &investigation.status.to_string(),
            &investigation.created_at.to_rfc3339(),
            &customer_info_json,
            notification_type,
        );
        let raw = self.pipeline().provider().complete(&prompt).await?;

        let reference = investigation.reference_number.clone();
        let status = investigation.status;
        let normalized = normalize_object(&raw, || fallback_notification(&reference, status));

        let subject = normalized
            .value
            .get("subject")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| fallback_subject(&reference));
        let body = normalized
            .value
            .get("body")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| fallback_body(&reference, status));

        Ok(CustomerNotification {
            subject,
            body,
            investigation_id,
            reference_number: reference,
            notification_type: notification_type.to_string(),
            generated_at: Utc::now(),
        })
    }
}

fn fallback_subject(reference: &str) -> String {
    format!("Update on your payment investigation - Ref: {reference}")
}

fn fallback_body(reference: &str, status: caseforge_core::CaseStatus) -> String {
    format!(
        "Dear Customer,\n\nThis is an update regarding your payment investigation \
         (Reference: {reference}).\n\nThe current status is: {status}.\n\nWe will continue to \
         keep you informed of any developments.\n\nBest regards,\nThe Investigation Team"
    )
}

fn fallback_notification(reference: &str, status: caseforge_core::CaseStatus) -> Value {
    json!({
        "subject": fallback_subject(reference),
        "body": fallback_body(reference, status),
    })
}

#[cfg(test)]
mod tests {
    use crate::testutil::{harness, seed_message, SUGGESTION_JSON};
    use caseforge_core::{CaseforgeError, Priority};

    const MT199: &str = "{2:I199BANKDEFFXXXX}\n:20:TRN-1";

    #[tokio::test]
    async fn well_formed_draft_is_used_verbatim() {
        let h = harness().await;
        let message_id = seed_message(&h.storage, MT199).await;
        h.provider.push_response(SUGGESTION_JSON).await;
        let investigation = h
            .service
            .create_investigation(message_id, Priority::Medium, None)
            .await
            .unwrap();

        h.provider
            .push_response(r#"{"subject": "Your case update", "body": "All good."}"#)
            .await;
        let notification = h
            .service
            .generate_customer_notification(investigation.id, "status_update")
            .await
            .unwrap();

        assert_eq!(notification.subject, "Your case update");
        assert_eq!(notification.body, "All good.");
        assert_eq!(notification.reference_number, investigation.reference_number);
        assert_eq!(notification.notification_type, "status_update");
    }

    #[tokio::test]
    async fn unparsable_draft_degrades_to_canned_email() {
        let h = harness().await;
        let message_id = seed_message(&h.storage, MT199).await;
        h.provider.push_response(SUGGESTION_JSON).await;
        let investigation = h
            .service
            .create_investigation(message_id, Priority::Medium, None)
            .await
            .unwrap();

        h.provider.push_response("dear customer ... (no JSON)").await;
        let notification = h
            .service
            .generate_customer_notification(investigation.id, "resolution")
            .await
            .unwrap();

        assert!(notification
            .subject
            .contains(&investigation.reference_number));
        assert!(notification.body.contains("current status is: open"));
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let h = harness().await;
        let message_id = seed_message(&h.storage, MT199).await;
        h.provider.push_response(SUGGESTION_JSON).await;
        let investigation = h
            .service
            .create_investigation(message_id, Priority::Medium, None)
            .await
            .unwrap();

        h.provider.push_failure("provider down").await;
        let err = h
            .service
            .generate_customer_notification(investigation.id, "status_update")
            .await
            .unwrap_err();
        assert!(matches!(err, CaseforgeError::Generation { .. }));
    }

    #[tokio::test]
    async fn unknown_case_is_not_found() {
        let h = harness().await;
        let err = h
            .service
            .generate_customer_notification(424242, "status_update")
            .await
            .unwrap_err();
        assert!(matches!(err, CaseforgeError::NotFound { .. }));
    }
}
