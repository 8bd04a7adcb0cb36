use serde::{Deserialize, Serialize};
use validator::Validate;

/// Personal data submitted with an onboarding request.
///
/// `date_of_birth` is carried as an ISO-8601 `YYYY-MM-DD` string and parsed
/// during request validation; it is deliberately not a typed date here so
/// that a malformed value is a rejection, not a deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 7, max = 20))]
    pub phone: String,

    pub date_of_birth: String,
}

impl PersonalInfo {
    /// Canonical form of the submitted email: trimmed and lower-cased.
    /// Every collaborator sees only this form.
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    #[validate(length(min = 1, max = 200))]
    pub street: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 100))]
    pub state: String,

    #[validate(length(min = 1, max = 20))]
    pub zip_code: String,

    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

/// An identity document attached to the request. The core records
/// attachments but never parses them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAttachment {
    pub document_type: String,
    pub file_name: String,
    pub content_hash: Option<String>,
}

/// A complete onboarding submission. Immutable once accepted into the
/// workflow.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    #[validate(nested)]
    pub personal_info: PersonalInfo,

    #[validate(nested)]
    pub address: AddressInfo,

    #[serde(default)]
    pub documents: Vec<DocumentAttachment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OnboardingRequest {
        OnboardingRequest {
            personal_info: PersonalInfo {
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: "  John.Doe@Example.com ".to_string(),
                phone: "+15551234567".to_string(),
                date_of_birth: "1990-04-12".to_string(),
            },
            address: AddressInfo {
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip_code: "62701".to_string(),
                country: "US".to_string(),
            },
            documents: Vec::new(),
        }
    }

    #[test]
    fn test_normalized_email() {
        let request = request();
        assert_eq!(request.personal_info.normalized_email(), "john.doe@example.com");
    }

    #[test]
    fn test_valid_request_passes_validation() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_missing_first_name_fails_validation() {
        let mut request = request();
        request.personal_info.first_name = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_implausible_email_fails_validation() {
        let mut request = request();
        request.personal_info.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_boundary_field_names_are_camel_case() {
        let json = serde_json::to_value(&request()).unwrap();
        assert!(json["personalInfo"]["firstName"].is_string());
        assert!(json["personalInfo"]["dateOfBirth"].is_string());
        assert!(json["address"]["zipCode"].is_string());
    }
}
