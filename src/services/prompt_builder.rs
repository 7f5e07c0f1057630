use serde_json::{json, Value};

use crate::domain::{QueryContext, NOT_FOUND, NO_PUBLIC_RECORD};

pub const RECORD_FIELDS: [&str; 5] = [
    "company_name",
    "website",
    "revenue",
    "business",
    "security_incident",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system_instruction: String,
    pub user_instruction: String,
}

pub fn build_prompt(query: &QueryContext) -> Prompt {
    let system_instruction = format!(
        r#"You are a company research analyst. Use web search to find current, factual information about the company the user names.
Respond with exactly one JSON object and nothing else: no markdown, no code fences, no commentary before or after it.
The object must have exactly these string fields: {fields}.
- company_name: the official name of the company.
- website: the official website URL, or "{not_found}".
- revenue: the latest reported annual revenue with its period and currency, or "{not_found}".
- business: a short description of the core business.
- security_incident: a short summary of publicly reported data breaches or security incidents, or "{no_record}"."#,
        fields = RECORD_FIELDS.join(", "),
        not_found = NOT_FOUND,
        no_record = NO_PUBLIC_RECORD,
    );

    let mut user_instruction = format!(
        "Find the company facts for \"{}\".",
        query.company_name
    );
    if let Some(url) = &query.supplementary_url {
        user_instruction.push_str(&format!(
            "\nFetch {} and use its content to write the business field. \
             If the page cannot be fetched, fall back to web search.",
            url
        ));
    }

    Prompt {
        system_instruction,
        user_instruction,
    }
}

/// Response schema for providers that can enforce the output shape.
pub fn record_response_schema() -> Value {
    let properties: serde_json::Map<String, Value> = RECORD_FIELDS
        .iter()
        .map(|field| (field.to_string(), json!({"type": "STRING"})))
        .collect();

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": ["company_name", "website"],
        "propertyOrdering": RECORD_FIELDS,
    })
}
