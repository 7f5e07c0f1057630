use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const NOT_FOUND: &str = "Not found";
pub const NO_PUBLIC_RECORD: &str = "No public record found";
pub const POSSIBLE_INCIDENT_MARKER: &str = "Possible incident found: ";

pub const SNIPPET_CHAR_LIMIT: usize = 150;
pub const TRUNCATION_MARKER: &str = "...";

/// The five facts returned for a company.
///
/// Deserialization is lenient: missing or `null` fields become empty strings
/// and a numeric `revenue` is kept as its text form. Whether the result is
/// usable is decided by [`CompanyRecord::is_valid`], not by the parser.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(default, deserialize_with = "text_from_scalar")]
    pub company_name: String,
    #[serde(default, deserialize_with = "text_from_scalar")]
    pub website: String,
    #[serde(default, deserialize_with = "text_from_scalar")]
    pub revenue: String,
    #[serde(default, deserialize_with = "text_from_scalar")]
    pub business: String,
    #[serde(default, deserialize_with = "text_from_scalar")]
    pub security_incident: String,
}

impl CompanyRecord {
    /// Record with every looked-up field at its sentinel.
    pub fn placeholder(company_name: &str) -> Self {
        CompanyRecord {
            company_name: company_name.to_string(),
            website: NOT_FOUND.to_string(),
            revenue: NOT_FOUND.to_string(),
            business: NOT_FOUND.to_string(),
            security_incident: NO_PUBLIC_RECORD.to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.company_name.trim().is_empty() && !self.website.trim().is_empty()
    }
}

fn text_from_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    };
    Ok(text)
}

/// Caps a search snippet at [`SNIPPET_CHAR_LIMIT`] characters, appending
/// [`TRUNCATION_MARKER`] only when something was cut.
pub fn truncate_snippet(snippet: &str) -> String {
    let snippet = snippet.trim();
    match snippet.char_indices().nth(SNIPPET_CHAR_LIMIT) {
        Some((cut, _)) => format!("{}{}", &snippet[..cut], TRUNCATION_MARKER),
        None => snippet.to_string(),
    }
}
