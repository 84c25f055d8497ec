//! Ingestion adapter. Turns an untrusted backend record into a `NormalizedCandidate`.
//!
//! Never fails. Malformed fields are replaced locally (logged at `warn`) and are
//! never surfaced to the user.

use serde_json::Value;
use tracing::{debug, warn};

use crate::models::candidate::NormalizedCandidate;
use crate::models::raw::{RawCandidateRecord, SkillField};

pub const UNKNOWN_NAME: &str = "Unknown Candidate";
pub const NO_EMAIL: &str = "No email";
pub const NO_PHONE: &str = "No phone";
pub const NO_SKILLS: &str = "No skills extracted";

pub fn normalize(raw: RawCandidateRecord) -> NormalizedCandidate {
    let id = parse_id(raw.id.as_ref());

    let technical_skills = decode_skills(raw.skills, "skills", id);
    let soft_skills = decode_skills(raw.soft_skills, "soft_skills", id);

    let mut skills: Vec<String> = technical_skills
        .iter()
        .chain(soft_skills.iter())
        .cloned()
        .collect();
    if skills.is_empty() {
        skills.push(NO_SKILLS.to_string());
    }

    debug!(
        "Normalized candidate {id}: {} technical, {} soft skills",
        technical_skills.len(),
        soft_skills.len()
    );

    NormalizedCandidate {
        id,
        name: scalar_or(raw.name.as_ref(), UNKNOWN_NAME),
        email: scalar_or(raw.email.as_ref(), NO_EMAIL),
        phone: scalar_or(raw.phone.as_ref(), NO_PHONE),
        title: descriptive(raw.title.as_ref()),
        company: descriptive(raw.company.as_ref()),
        location: descriptive(raw.location.as_ref()),
        technical_skills,
        soft_skills,
        skills,
        experience_summary: free_text(raw.experience_summary),
        certifications: free_text(raw.certifications),
        projects: free_text(raw.projects),
    }
}

fn parse_id(value: Option<&Value>) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!("Candidate record has no usable id ({value:?}), defaulting to 0");
        0
    })
}

/// Resolves a skills field to a list of strings. A string that is not a JSON
/// array decodes to an empty list.
fn decode_skills(field: Option<SkillField>, field_name: &str, id: i64) -> Vec<String> {
    match field {
        None => Vec::new(),
        Some(SkillField::Native(items)) => skill_strings(items),
        Some(SkillField::Encoded(text)) => match serde_json::from_str::<Vec<Value>>(&text) {
            Ok(items) => skill_strings(items),
            Err(e) => {
                warn!("Candidate {id}: '{field_name}' is not a JSON array ({e}), using no skills");
                Vec::new()
            }
        },
        Some(SkillField::Other(value)) => {
            warn!("Candidate {id}: unexpected '{field_name}' shape {value}, using no skills");
            Vec::new()
        }
    }
}

fn skill_strings(items: Vec<Value>) -> Vec<String> {
    items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect()
}

fn scalar_or(value: Option<&Value>, placeholder: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

fn descriptive(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Free text passes through as-is. Older payloads send projects and
/// certifications as lists; those are joined into one text.
fn free_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect();
            Some(parts.join(", "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawCandidateRecord {
        RawCandidateRecord::from_value(value)
    }

    #[test]
    fn test_encoded_skills_are_decoded_and_merged_in_order() {
        let candidate = normalize(record(json!({
            "id": 1,
            "name": "Alice Johnson",
            "skills": "[\"Python\", \"React\"]",
            "soft_skills": "[\"Leadership\"]",
        })));
        assert_eq!(candidate.technical_skills, vec!["Python", "React"]);
        assert_eq!(candidate.soft_skills, vec!["Leadership"]);
        assert_eq!(candidate.skills, vec!["Python", "React", "Leadership"]);
    }

    #[test]
    fn test_native_skill_lists_are_used_unchanged() {
        let candidate = normalize(record(json!({
            "skills": ["Rust", "SQL"],
            "soft_skills": ["Empathy", "Rust"],
        })));
        // duplicates are kept
        assert_eq!(candidate.skills, vec!["Rust", "SQL", "Empathy", "Rust"]);
    }

    #[test]
    fn test_invalid_skills_json_becomes_empty() {
        let candidate = normalize(record(json!({
            "skills": "Python, React",
            "soft_skills": "[\"Communication\"]",
        })));
        assert!(candidate.technical_skills.is_empty());
        assert_eq!(candidate.skills, vec!["Communication"]);
    }

    #[test]
    fn test_malformed_skill_inputs_never_leave_skills_empty() {
        let inputs = [
            json!({}),
            json!({ "skills": null, "soft_skills": null }),
            json!({ "skills": "", "soft_skills": "{" }),
            json!({ "skills": "{\"a\": 1}", "soft_skills": 12 }),
            json!({ "skills": [], "soft_skills": "[]" }),
            json!({ "skills": [null, {"x": 1}], "soft_skills": [[]] }),
            json!("garbage"),
            json!(null),
        ];
        for input in inputs {
            let candidate = normalize(record(input.clone()));
            assert_eq!(candidate.skills, vec![NO_SKILLS], "input: {input}");
        }
    }

    #[test]
    fn test_scalar_placeholders() {
        let candidate = normalize(record(json!({
            "id": 4,
            "name": "   ",
            "email": null,
        })));
        assert_eq!(candidate.name, UNKNOWN_NAME);
        assert_eq!(candidate.email, NO_EMAIL);
        assert_eq!(candidate.phone, NO_PHONE);
    }

    #[test]
    fn test_non_string_name_uses_placeholder() {
        let candidate = normalize(record(json!({ "name": 42 })));
        assert_eq!(candidate.name, UNKNOWN_NAME);
    }

    #[test]
    fn test_id_parsing() {
        assert_eq!(normalize(record(json!({ "id": 7 }))).id, 7);
        assert_eq!(normalize(record(json!({ "id": "12" }))).id, 12);
        assert_eq!(normalize(record(json!({ "id": "abc" }))).id, 0);
        assert_eq!(normalize(record(json!({}))).id, 0);
    }

    #[test]
    fn test_free_text_passes_through_unmodified() {
        let candidate = normalize(record(json!({
            "experience_summary": "  5 years at Tech Corp.  ",
            "projects": "",
        })));
        assert_eq!(
            candidate.experience_summary.as_deref(),
            Some("  5 years at Tech Corp.  ")
        );
        assert_eq!(candidate.projects.as_deref(), Some(""));
        assert!(candidate.certifications.is_none());
    }

    #[test]
    fn test_list_shaped_free_text_is_joined() {
        let candidate = normalize(record(json!({
            "certifications": ["AWS SA", "CKA"],
            "projects": 3,
        })));
        assert_eq!(candidate.certifications.as_deref(), Some("AWS SA, CKA"));
        assert!(candidate.projects.is_none());
    }

    #[test]
    fn test_descriptive_fields_default_to_empty() {
        let candidate = normalize(record(json!({
            "title": "Staff Engineer",
            "company": null,
        })));
        assert_eq!(candidate.title, "Staff Engineer");
        assert_eq!(candidate.company, "");
        assert_eq!(candidate.location, "");
    }
}
