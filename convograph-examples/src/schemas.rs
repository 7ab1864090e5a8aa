//! Extraction schemas for the customer-support flow.
//!
//! Each schema exists twice on purpose: a serde struct for typed access and
//! a `SchemaExtractor` that teaches the extraction step which fields to
//! demand from a completion.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use convograph::{Extractor, FieldSpec, SchemaExtractor};

/// An identified user, as assembled by the identity-lookup step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    /// Subscription type: free or premium.
    pub subscription: String,
    pub user_id: u64,
    pub phone: String,
    pub language: String,
}

/// A user's request to be called back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhoneCallRequest {
    pub phone_number: String,
}

/// The record of a completed support call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhoneCallTicket {
    pub agent_name: String,
    pub customer_name: String,
    pub call_summary: String,
}

/// Extractor demanding every `UserProfile` field.
pub fn user_profile_extractor() -> Arc<dyn Extractor> {
    Arc::new(SchemaExtractor::new(
        "UserProfile",
        vec![
            FieldSpec::new("name", "User name"),
            FieldSpec::new("email", "User email"),
            FieldSpec::new("subscription", "Subscription type: free or premium"),
            FieldSpec::new("user_id", "User id, represented as a number"),
            FieldSpec::new("phone", "User phone number"),
            FieldSpec::new("language", "User preferred language"),
        ],
    ))
}

/// Extractor for a phone-call request.
pub fn phone_call_request_extractor() -> Arc<dyn Extractor> {
    Arc::new(SchemaExtractor::new(
        "PhoneCallRequest",
        vec![FieldSpec::new(
            "phone_number",
            "The user phone number to call",
        )],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: an extracted value deserializes into the typed profile.
    #[test]
    fn extracted_profile_deserializes() {
        let completion = r#"{
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "subscription": "premium",
            "user_id": 42,
            "phone": "555-123-4567",
            "language": "en"
        }"#;
        let value = user_profile_extractor().parse(completion).unwrap();
        let profile: UserProfile = serde_json::from_value(value).unwrap();
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.user_id, 42);
    }

    /// **Scenario**: a profile missing its subscription is rejected.
    #[test]
    fn partial_profile_is_rejected() {
        let completion = r#"{"name": "Ada", "email": "ada@example.com"}"#;
        assert!(user_profile_extractor().parse(completion).is_err());
    }

    /// **Scenario**: the call-request extractor keeps the number verbatim.
    #[test]
    fn call_request_extracts_number() {
        let value = phone_call_request_extractor()
            .parse(r#"{"phone_number": "555-123-4567"}"#)
            .unwrap();
        let request: PhoneCallRequest = serde_json::from_value(value).unwrap();
        assert_eq!(request.phone_number, "555-123-4567");
    }
}
