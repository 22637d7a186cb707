use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};

/// Collection that holds lead submissions.
pub const LEAD_COLLECTION: &str = "lead";

/// A validated lead submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub service_interest: Option<String>,
}

impl Lead {
    /// Converts the lead into a BSON document. Absent optional fields are
    /// left out of the document rather than stored as null.
    pub fn to_document(&self) -> Document {
        let mut document = doc! {
            "name": self.name.as_str(),
            "email": self.email.as_str(),
        };
        let optional = [
            ("company", &self.company),
            ("phone", &self.phone),
            ("message", &self.message),
            ("service_interest", &self.service_interest),
        ];
        for (key, value) in optional {
            if let Some(v) = value {
                document.insert(key, v.as_str());
            }
        }
        document
    }
}

/// A lead as returned by the listing endpoint.
///
/// Optional fields are always serialized, as `null` when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub service_interest: Option<String>,
}

impl LeadResponse {
    /// Maps a raw stored document into the outbound shape. Never fails:
    /// missing required fields become empty strings and missing or
    /// non-text optional fields become `None`.
    pub fn from_document(document: &Document) -> Self {
        Self {
            id: document.get("_id").map(id_to_string).unwrap_or_default(),
            name: text_field(document, "name").unwrap_or_default(),
            email: text_field(document, "email").unwrap_or_default(),
            company: text_field(document, "company"),
            phone: text_field(document, "phone"),
            message: text_field(document, "message"),
            service_interest: text_field(document, "service_interest"),
        }
    }
}

/// String form of a store identifier. Object ids render as lowercase hex.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_field(document: &Document, key: &str) -> Option<String> {
    match document.get(key) {
        Some(Bson::String(s)) => Some(s.clone()),
        _ => None,
    }
}

/// Response body for a successful lead submission.
#[derive(Debug, Clone, Serialize)]
pub struct CreateLeadResponse {
    pub status: String,
    pub id: String,
}

impl CreateLeadResponse {
    pub fn success(id: String) -> Self {
        Self {
            status: "success".to_string(),
            id,
        }
    }
}

/// Query parameters for `GET /api/leads`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListLeadsQuery {
    pub limit: Option<i64>,
}

/// Plain `{ "message": ... }` body.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of the `/test` diagnostic endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsResponse {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}
