// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full investigation detail: case, source message, attributes, actions.

use serde::Serialize;
use serde_json::{Map, Value};

use caseforge_core::{CaseforgeError, Investigation, InvestigationAction};

use crate::InvestigationService;

/// The source message as presented inside a case detail.
#[derive(Debug, Clone, Serialize)]
pub struct MessageDetail {
    pub id: i64,
    pub message_id: String,
    pub content: String,
    pub attributes: Map<String, Value>,
}

/// An investigation with everything a caseworker needs in one shape.
#[derive(Debug, Clone, Serialize)]
pub struct InvestigationDetail {
    #[serde(flatten)]
    pub investigation: Investigation,
    pub message: Option<MessageDetail>,
    /// Actions in creation order.
    pub actions: Vec<InvestigationAction>,
}

impl InvestigationService {
    /// Fetch an investigation with its message, attributes, and actions.
    pub async fn get_investigation(
        &self,
        investigation_id: i64,
    ) -> Result<InvestigationDetail, CaseforgeError> {
        let investigation = self
            .storage()
            .find_investigation(investigation_id)
            .await?
            .ok_or_else(|| CaseforgeError::not_found("investigation", investigation_id))?;

        let message = match self.storage().find_message(investigation.message_id).await? {
            Some(message) => {
                let attributes = self
                    .storage()
                    .message_attributes(message.id)
                    .await?
                    .into_iter()
                    .map(|attr| (attr.key, Value::String(attr.value)))
                    .collect();
                Some(MessageDetail {
                    id: message.id,
                    message_id: message.message_id,
                    content: message.content,
                    attributes,
                })
            }
            None => None,
        };

        let actions = self
            .storage()
            .actions_for_investigation(investigation_id)
            .await?;

        Ok(InvestigationDetail {
            investigation,
            message,
            actions,
        })
    }

    /// Fetch an investigation detail by its unique reference number.
    pub async fn get_investigation_by_reference(
        &self,
        reference_number: &str,
    ) -> Result<InvestigationDetail, CaseforgeError> {
        let investigation = self
            .storage()
            .find_investigation_by_reference(reference_number)
            .await?
            .ok_or_else(|| CaseforgeError::not_found("investigation", reference_number))?;
        self.get_investigation(investigation.id).await
    }
}

#[cfg(test)]
mod tests {
    use crate::testutil::{harness, seed_message, SUGGESTION_JSON};
    use caseforge_core::{CaseforgeError, Priority, StorageAdapter};

    const MT199: &str = "{2:I199BANKDEFFXXXX}\n:20:TRN-1";

    #[tokio::test]
    async fn detail_assembles_message_attributes_and_actions() {
        let h = harness().await;
        let message_id = seed_message(&h.storage, MT199).await;
        h.storage
            .insert_message_attributes(
                message_id,
                &[("reference".to_string(), "TRN-1".to_string())],
            )
            .await
            .unwrap();
        h.provider.push_response(SUGGESTION_JSON).await;

        let investigation = h
            .service
            .create_investigation(message_id, Priority::Medium, Some(serde_json::json!({"name": "ACME"})))
            .await
            .unwrap();

        let detail = h.service.get_investigation(investigation.id).await.unwrap();
        assert_eq!(detail.investigation.id, investigation.id);
        let message = detail.message.unwrap();
        assert_eq!(message.attributes["reference"], "TRN-1");
        assert_eq!(detail.actions.len(), 1);

        let by_ref = h
            .service
            .get_investigation_by_reference(&investigation.reference_number)
            .await
            .unwrap();
        assert_eq!(by_ref.investigation.id, investigation.id);
    }

    #[tokio::test]
    async fn unknown_reference_is_not_found() {
        let h = harness().await;
        let err = h
            .service
            .get_investigation_by_reference("INV-20260807-ZZZZ")
            .await
            .unwrap_err();
        assert!(matches!(err, CaseforgeError::NotFound { .. }));
    }
}
