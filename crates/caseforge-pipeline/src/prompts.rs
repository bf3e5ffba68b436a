// SPDX-FileCopyrightText: 2026 Caseforge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt builders for the generative collaborator.
//!
//! Each builder produces the full user-role prompt; the provider adapter
//! supplies the system prompt.

/// Request an MT -> ISO 20022 camt.110 conversion.
pub fn convert_prompt(message_content: &str) -> String {
    format!(
        "Convert the following SWIFT MT199 message to ISO camt110 format (XML tag format). \
         Return the complete SWIFT 'CAMT110' XML document properly formatted in JSON, with a \
         camt110 key and the XML document as value.\n\nMT message:\n{message_content}"
    )
}

/// Request attribute extraction from a message.
pub fn extract_prompt(message_content: &str) -> String {
    format!(
        "Extract all important attributes from this SWIFT MT message. Return JSON with an \
         'attributes' key containing extracted fields and values.\n\nMT message:\n{message_content}"
    )
}

/// Request full STP-failure case classification.
pub fn classify_prompt(message_content: &str) -> String {
    format!(
        "This is an MT199 message that failed Straight Through Processing (STP).\n\
         Analyze this message in detail and provide the following:\n\n\
         1. Determine the workcase type (e.g., NON_RECEIPT, CANCELLATION, RETURN_FUNDS, \
         WRONG_AMOUNT, DUPLICATE_PAYMENT, WRONG_BENEFICIARY, REGULATORY_COMPLIANCE, \
         TECHNICAL_ISSUE, QUERY). If you cannot determine the workcase type with reasonable \
         certainty, use \"UNKNOWN\".\n\n\
         2. Provide clear reasoning for why you determined this workcase type.\n\n\
         3. Extract all relevant details from the message (such as sender, receiver, \
         references, dates, amounts, account numbers, and any other important information).\n\n\
         4. Suggest 3-5 next steps for investigating this case.\n\n\
         5. Suggest a timeline for resolving this investigation.\n\n\
         Return your response as structured JSON with the following keys:\n\
         - \"workcase_type\": the determined type\n\
         - \"reasoning\": detailed explanation for the workcase type\n\
         - \"extracted_fields\": object with all extracted details as key-value pairs\n\
         - \"next_steps\": array of suggested actions\n\
         - \"timeline\": array of objects with \"date\" (string), \"action\" (string), and \
         \"status\" (string) fields\n\n\
         MT199 message:\n{message_content}"
    )
}

/// Request investigation action suggestions from message content and its
/// extracted attributes.
pub fn suggest_actions_prompt(message_content: &str, attributes_json: &str) -> String {
    format!(
        "Analyze this SWIFT MT message and its extracted attributes to suggest investigation \
         actions.\n\
         Return a JSON array of actions with the following fields:\n\
         - type: The type of action (information_request, amendment_request, \
         customer_notification, cancellation, other)\n\
         - description: A clear description of the action to take\n\
         - suggested_response: Template text for a response (if applicable)\n\
         - priority: Priority of the action (low, medium, high, critical)\n\
         - suggested_days: Suggested days to complete (1-10)\n\n\
         MT message:\n{message_content}\n\n\
         Attributes:\n{attributes_json}"
    )
}

/// Request a customer notification email for an investigation.
pub fn notification_prompt(
    reference_number: &str,
    status: &str,
    created_at: &str,
    customer_info_json: &str,
    notification_type: &str,
) -> String {
    format!(
        "Generate a customer notification email for a SWIFT MT message investigation.\n\n\
         Investigation details:\n\
         - Reference: {reference_number}\n\
         - Status: {status}\n\
         - Created: {created_at}\n\
         - Message Type: MT199\n\n\
         Customer info:\n{customer_info_json}\n\n\
         Notification type: {notification_type}\n\n\
         Return JSON with 'subject' and 'body' fields."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_the_message_content() {
        let content = ":20:TRN-42\n:79:WHERE ARE MY FUNDS";
        assert!(convert_prompt(content).contains(content));
        assert!(extract_prompt(content).contains(content));
        assert!(classify_prompt(content).contains(content));
        assert!(suggest_actions_prompt(content, "{}").contains(content));
    }

    #[test]
    fn classify_prompt_names_the_expected_keys() {
        let prompt = classify_prompt("x");
        for key in [
            "workcase_type",
            "reasoning",
            "extracted_fields",
            "next_steps",
            "timeline",
        ] {
            assert!(prompt.contains(key), "missing key {key}");
        }
    }

    #[test]
    fn notification_prompt_carries_reference_and_type() {
        let prompt =
            notification_prompt("INV-20260807-AB12", "in_progress", "2026-08-07", "{}", "status_update");
        assert!(prompt.contains("INV-20260807-AB12"));
        assert!(prompt.contains("status_update"));
    }
}
