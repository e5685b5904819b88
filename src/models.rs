//! Frontend Models
//!
//! Record types served by the backend. They are plain CRUD rows: each one
//! knows its endpoints, table columns, form fields and binary attachments.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api::{Attachment, Resource};
use crate::error::ApiError;

// ========================
// Record trait
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// `YYYY-MM-DD`
    Date,
}

/// One input in the create/edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(key: &'static str, label: &'static str, kind: FieldKind, required: bool) -> FormField {
    FormField { key, label, kind, required }
}

pub trait Record: Clone + PartialEq + DeserializeOwned + Send + Sync + 'static {
    const RESOURCE: Resource;
    const COLUMNS: &'static [&'static str];
    /// Empty for read-only record types
    const FIELDS: &'static [FormField];
    const ATTACHMENTS: &'static [Attachment] = &[];

    fn id(&self) -> u64;
    /// One string per entry of `COLUMNS`
    fn cells(&self) -> Vec<String>;
    /// Pre-filled form values for editing
    fn to_draft(&self) -> RecordDraft;
}

/// Form values keyed by field, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    /// Set when editing an existing record
    pub id: Option<u64>,
    pub values: BTreeMap<String, String>,
}

impl RecordDraft {
    fn from_pairs(id: u64, pairs: &[(&str, String)]) -> Self {
        Self {
            id: Some(id),
            values: pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        }
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    /// Check every field and build the JSON body, before any request
    pub fn validate(&self, fields: &[FormField]) -> Result<Value, ApiError> {
        let mut body = Map::new();
        for f in fields {
            let raw = self.get(f.key).trim();
            if raw.is_empty() {
                if f.required {
                    return Err(ApiError::Validation(format!("{} is required", f.label)));
                }
                continue;
            }
            let value = match f.kind {
                FieldKind::Text => Value::String(raw.to_string()),
                FieldKind::Number => raw
                    .replace(',', ".")
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .and_then(serde_json::Number::from_f64)
                    .map(Value::Number)
                    .ok_or_else(|| ApiError::Validation(format!("{} must be a number", f.label)))?,
                FieldKind::Date => {
                    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .map_err(|_| ApiError::Validation(format!("{} must be a date (YYYY-MM-DD)", f.label)))?;
                    Value::String(raw.to_string())
                }
            };
            body.insert(f.key.to_string(), value);
        }
        Ok(Value::Object(body))
    }
}

fn amount(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.0}", n)
    } else {
        format!("{:.2}", n)
    }
}

fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

// ========================
// Record types
// ========================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contract {
    pub id: u64,
    pub number: String,
    pub client_name: String,
    pub amount: f64,
    pub signed_at: Option<String>,
    pub status: String,
}

impl Record for Contract {
    const RESOURCE: Resource = Resource { base: "contract", label: "Contracts", year_scoped: true };
    const COLUMNS: &'static [&'static str] = &["No.", "Client", "Amount", "Signed", "Status"];
    const FIELDS: &'static [FormField] = &[
        field("number", "Contract number", FieldKind::Text, true),
        field("clientName", "Client", FieldKind::Text, true),
        field("amount", "Amount", FieldKind::Number, true),
        field("signedAt", "Signed on", FieldKind::Date, false),
        field("status", "Status", FieldKind::Text, false),
    ];
    const ATTACHMENTS: &'static [Attachment] =
        &[Attachment::QrCode, Attachment::Pdf, Attachment::Word, Attachment::PdfUpload];

    fn id(&self) -> u64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.number.clone(),
            self.client_name.clone(),
            amount(self.amount),
            opt(&self.signed_at),
            self.status.clone(),
        ]
    }

    fn to_draft(&self) -> RecordDraft {
        RecordDraft::from_pairs(
            self.id,
            &[
                ("number", self.number.clone()),
                ("clientName", self.client_name.clone()),
                ("amount", amount(self.amount)),
                ("signedAt", opt(&self.signed_at)),
                ("status", self.status.clone()),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Payment {
    pub id: u64,
    pub contract_number: String,
    pub amount: f64,
    pub paid_at: String,
    pub method: String,
}

impl Record for Payment {
    const RESOURCE: Resource = Resource { base: "payment", label: "Payments", year_scoped: true };
    const COLUMNS: &'static [&'static str] = &["Contract", "Amount", "Paid on", "Method"];
    const FIELDS: &'static [FormField] = &[
        field("contractNumber", "Contract number", FieldKind::Text, true),
        field("amount", "Amount", FieldKind::Number, true),
        field("paidAt", "Paid on", FieldKind::Date, true),
        field("method", "Method", FieldKind::Text, false),
    ];

    fn id(&self) -> u64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.contract_number.clone(), amount(self.amount), self.paid_at.clone(), self.method.clone()]
    }

    fn to_draft(&self) -> RecordDraft {
        RecordDraft::from_pairs(
            self.id,
            &[
                ("contractNumber", self.contract_number.clone()),
                ("amount", amount(self.amount)),
                ("paidAt", self.paid_at.clone()),
                ("method", self.method.clone()),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expense {
    pub id: u64,
    pub category: String,
    pub amount: f64,
    pub spent_at: String,
    pub note: Option<String>,
}

impl Record for Expense {
    const RESOURCE: Resource = Resource { base: "expense", label: "Expenses", year_scoped: true };
    const COLUMNS: &'static [&'static str] = &["Category", "Amount", "Date", "Note"];
    const FIELDS: &'static [FormField] = &[
        field("category", "Category", FieldKind::Text, true),
        field("amount", "Amount", FieldKind::Number, true),
        field("spentAt", "Date", FieldKind::Date, true),
        field("note", "Note", FieldKind::Text, false),
    ];

    fn id(&self) -> u64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.category.clone(), amount(self.amount), self.spent_at.clone(), opt(&self.note)]
    }

    fn to_draft(&self) -> RecordDraft {
        RecordDraft::from_pairs(
            self.id,
            &[
                ("category", self.category.clone()),
                ("amount", amount(self.amount)),
                ("spentAt", self.spent_at.clone()),
                ("note", opt(&self.note)),
            ],
        )
    }
}

/// Bonuses and fines share one shape
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Adjustment {
    pub id: u64,
    pub employee: String,
    pub amount: f64,
    pub reason: String,
    pub issued_at: String,
}

impl Adjustment {
    const FIELDS: &'static [FormField] = &[
        field("employee", "Employee", FieldKind::Text, true),
        field("amount", "Amount", FieldKind::Number, true),
        field("reason", "Reason", FieldKind::Text, true),
        field("issuedAt", "Date", FieldKind::Date, true),
    ];

    fn cells(&self) -> Vec<String> {
        vec![self.employee.clone(), amount(self.amount), self.reason.clone(), self.issued_at.clone()]
    }

    fn to_draft(&self) -> RecordDraft {
        RecordDraft::from_pairs(
            self.id,
            &[
                ("employee", self.employee.clone()),
                ("amount", amount(self.amount)),
                ("reason", self.reason.clone()),
                ("issuedAt", self.issued_at.clone()),
            ],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Bonus(pub Adjustment);

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Fine(pub Adjustment);

impl Record for Bonus {
    const RESOURCE: Resource = Resource { base: "bonus", label: "Bonuses", year_scoped: true };
    const COLUMNS: &'static [&'static str] = &["Employee", "Amount", "Reason", "Date"];
    const FIELDS: &'static [FormField] = Adjustment::FIELDS;

    fn id(&self) -> u64 {
        self.0.id
    }

    fn cells(&self) -> Vec<String> {
        self.0.cells()
    }

    fn to_draft(&self) -> RecordDraft {
        self.0.to_draft()
    }
}

impl Record for Fine {
    const RESOURCE: Resource = Resource { base: "fine", label: "Fines", year_scoped: true };
    const COLUMNS: &'static [&'static str] = &["Employee", "Amount", "Reason", "Date"];
    const FIELDS: &'static [FormField] = Adjustment::FIELDS;

    fn id(&self) -> u64 {
        self.0.id
    }

    fn cells(&self) -> Vec<String> {
        self.0.cells()
    }

    fn to_draft(&self) -> RecordDraft {
        self.0.to_draft()
    }
}

/// Face-recognition check-in/out; produced by the terminals, read-only here
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attendance {
    pub id: u64,
    pub employee: String,
    pub checked_at: String,
    pub direction: String,
    pub similarity: Option<f64>,
}

impl Record for Attendance {
    const RESOURCE: Resource = Resource { base: "attendance", label: "Attendance", year_scoped: false };
    const COLUMNS: &'static [&'static str] = &["Employee", "Time", "Direction", "Match"];
    const FIELDS: &'static [FormField] = &[];
    const ATTACHMENTS: &'static [Attachment] = &[Attachment::FaceImage];

    fn id(&self) -> u64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.employee.clone(),
            self.checked_at.clone(),
            self.direction.clone(),
            self.similarity.map(|s| format!("{:.0}%", s * 100.0)).unwrap_or_default(),
        ]
    }

    fn to_draft(&self) -> RecordDraft {
        RecordDraft { id: Some(self.id), ..Default::default() }
    }
}

/// Production protocol (concrete mix) with its Word document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Protocol {
    pub id: u64,
    pub title: String,
    pub mix_code: String,
    pub created_at: String,
}

impl Record for Protocol {
    const RESOURCE: Resource = Resource { base: "protocol", label: "Protocols", year_scoped: true };
    const COLUMNS: &'static [&'static str] = &["Title", "Mix", "Created"];
    const FIELDS: &'static [FormField] = &[
        field("title", "Title", FieldKind::Text, true),
        field("mixCode", "Mix code", FieldKind::Text, true),
    ];
    const ATTACHMENTS: &'static [Attachment] = &[Attachment::Word, Attachment::WordUpload];

    fn id(&self) -> u64 {
        self.id
    }

    fn cells(&self) -> Vec<String> {
        vec![self.title.clone(), self.mix_code.clone(), self.created_at.clone()]
    }

    fn to_draft(&self) -> RecordDraft {
        RecordDraft::from_pairs(
            self.id,
            &[("title", self.title.clone()), ("mixCode", self.mix_code.clone())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contract_from_backend_json() {
        let contract: Contract = serde_json::from_value(json!({
            "id": 12,
            "number": "C-2024-12",
            "clientName": "Acme",
            "amount": 1500.5,
            "extra": "ignored"
        }))
        .unwrap();
        assert_eq!(contract.client_name, "Acme");
        assert_eq!(contract.signed_at, None);
        assert_eq!(contract.cells(), vec!["C-2024-12", "Acme", "1500.50", "", ""]);
        assert_eq!(contract.cells().len(), Contract::COLUMNS.len());
    }

    #[test]
    fn test_bonus_is_flat_on_the_wire() {
        let bonus: Bonus = serde_json::from_value(json!({
            "id": 3, "employee": "Dana", "amount": 200, "reason": "Q3", "issuedAt": "2024-09-30"
        }))
        .unwrap();
        assert_eq!(bonus.id(), 3);
        assert_eq!(bonus.cells()[1], "200");
    }

    #[test]
    fn test_validate_builds_body() {
        let mut draft = RecordDraft::default();
        draft.set("contractNumber", " C-1 ".into());
        draft.set("amount", "1 000".into());
        draft.set("paidAt", "2024-02-30".into());

        let err = draft.validate(Payment::FIELDS).unwrap_err();
        assert_eq!(err, ApiError::Validation("Amount must be a number".into()));

        draft.set("amount", "99,5".into());
        let err = draft.validate(Payment::FIELDS).unwrap_err();
        assert!(err.to_string().starts_with("Paid on must be a date"));

        draft.set("paidAt", "2024-02-29".into());
        let body = draft.validate(Payment::FIELDS).unwrap();
        assert_eq!(body, json!({ "contractNumber": "C-1", "amount": 99.5, "paidAt": "2024-02-29" }));
    }

    #[test]
    fn test_required_field() {
        let draft = RecordDraft::default();
        let err = draft.validate(Protocol::FIELDS).unwrap_err();
        assert_eq!(err, ApiError::Validation("Title is required".into()));
    }

    #[test]
    fn test_draft_round_trips_through_validate() {
        let contract = Contract {
            id: 5,
            number: "C-5".into(),
            client_name: "Beta".into(),
            amount: 10.0,
            signed_at: Some("2024-01-15".into()),
            status: "active".into(),
        };
        let draft = contract.to_draft();
        assert_eq!(draft.id, Some(5));
        let body = draft.validate(Contract::FIELDS).unwrap();
        assert_eq!(body["amount"], json!(10.0));
        assert_eq!(body["signedAt"], json!("2024-01-15"));
    }
}
