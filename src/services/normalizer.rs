use serde_json::Value;

use crate::domain::{CompanyRecord, LookupError};

use super::extract_json_candidate;

/// Checks output that the provider already shaped as JSON.
pub fn normalize_structured(value: Value) -> Result<CompanyRecord, LookupError> {
    let raw = value.to_string();
    let record = record_from_value(value).map_err(|e| {
        log::warn!("Structured response does not fit a company record: {}", e);
        LookupError::unstructured(&raw)
    })?;

    if !record.is_valid() {
        log::warn!("Structured response is missing company_name or website");
        return Err(LookupError::unstructured(&raw));
    }

    Ok(record)
}

/// Recovers a record from free text: whole text first, then the extracted
/// `{...}` span.
pub fn normalize_text(raw: &str) -> Result<CompanyRecord, LookupError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LookupError::EmptyResponse { reason: None });
    }

    let parsed = record_from_str(trimmed).or_else(|e| {
        log::info!("Response is not bare JSON ({}), extracting candidate", e);
        let candidate = extract_json_candidate(trimmed).ok_or_else(|| {
            log::warn!("No JSON object found in provider response");
            LookupError::unstructured(raw)
        })?;
        record_from_str(candidate).map_err(|e| {
            log::warn!("Extracted candidate is not a JSON object: {}", e);
            LookupError::unstructured(raw)
        })
    })?;

    if !parsed.is_valid() {
        log::warn!("Parsed record is missing company_name or website");
        return Err(LookupError::unstructured(raw));
    }

    Ok(parsed)
}

fn record_from_str(text: &str) -> Result<CompanyRecord, String> {
    let value: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
    record_from_value(value)
}

fn record_from_value(value: Value) -> Result<CompanyRecord, String> {
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}
