//! Contact form data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw form input as received over HTTP. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub work_email: Option<String>,
}

/// A submission whose required fields are known to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub full_name: String,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub work_email: String,
}

impl ContactSubmission {
    /// Promote raw input, or `None` if `fullName` or `workEmail` is missing
    /// or empty. Empty optional fields are normalised to `None`.
    pub fn from_input(input: ContactInput) -> Option<Self> {
        let full_name = non_empty(input.full_name)?;
        let work_email = non_empty(input.work_email)?;

        Some(Self {
            full_name,
            company_name: non_empty(input.company_name),
            job_title: non_empty(input.job_title),
            work_email,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Identity assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredContact {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// A persisted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub submission: ContactSubmission,
}

impl ContactRecord {
    pub fn new(submission: ContactSubmission, stored: StoredContact) -> Self {
        Self {
            id: stored.id,
            created_at: stored.created_at,
            submission,
        }
    }
}

/// Body of a `201 Created` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactReceipt {
    pub message: String,
    pub contact_id: i64,
    pub created_at: DateTime<Utc>,
}

impl ContactReceipt {
    pub const MESSAGE: &'static str = "Contact saved successfully!";

    pub fn new(stored: StoredContact) -> Self {
        Self {
            message: Self::MESSAGE.to_string(),
            contact_id: stored.id,
            created_at: stored.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(full_name: Option<&str>, work_email: Option<&str>) -> ContactInput {
        ContactInput {
            full_name: full_name.map(String::from),
            work_email: work_email.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields() {
        assert!(ContactSubmission::from_input(input(Some("Jane Doe"), Some("jane@x.com"))).is_some());
        assert!(ContactSubmission::from_input(input(None, Some("jane@x.com"))).is_none());
        assert!(ContactSubmission::from_input(input(Some("Jane Doe"), None)).is_none());
        assert!(ContactSubmission::from_input(input(Some(""), Some("jane@x.com"))).is_none());
        assert!(ContactSubmission::from_input(input(Some("Jane Doe"), Some(""))).is_none());
    }

    #[test]
    fn test_email_format_not_checked() {
        let sub = ContactSubmission::from_input(input(Some("Jane"), Some("not-an-email"))).unwrap();
        assert_eq!(sub.work_email, "not-an-email");
    }

    #[test]
    fn test_empty_optionals_normalised() {
        let sub = ContactSubmission::from_input(ContactInput {
            full_name: Some("Jane".into()),
            company_name: Some(String::new()),
            job_title: Some("CTO".into()),
            work_email: Some("jane@x.com".into()),
        })
        .unwrap();
        assert_eq!(sub.company_name, None);
        assert_eq!(sub.job_title.as_deref(), Some("CTO"));
    }

    #[test]
    fn test_input_field_names() {
        let input: ContactInput = serde_json::from_str(
            r#"{"fullName":"Jane","companyName":"Acme","jobTitle":"CTO","workEmail":"j@x.com","extra":1}"#,
        )
        .unwrap();
        assert_eq!(input.full_name.as_deref(), Some("Jane"));
        assert_eq!(input.company_name.as_deref(), Some("Acme"));
        assert_eq!(input.job_title.as_deref(), Some("CTO"));
        assert_eq!(input.work_email.as_deref(), Some("j@x.com"));
    }

    #[test]
    fn test_receipt_shape() {
        let created_at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let receipt = ContactReceipt::new(StoredContact { id: 7, created_at });
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["message"], "Contact saved successfully!");
        assert_eq!(json["contactId"], 7);
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
    }
}
