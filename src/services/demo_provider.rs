use async_trait::async_trait;

use crate::domain::{CompanyRecord, LookupError, QueryContext, NOT_FOUND, NO_PUBLIC_RECORD};

use super::CompanyFactsProvider;

/// Canned answers for local runs without any credentials.
pub struct DemoProvider;

fn canned_record(company_name: &str) -> CompanyRecord {
    let name_lower = company_name.to_lowercase();

    if name_lower.contains("google") || name_lower.contains("谷歌") {
        CompanyRecord {
            company_name: "Alphabet Inc. (Google)".to_string(),
            website: "https://www.google.com/".to_string(),
            revenue: "$282.8 Billion (2023)".to_string(),
            business: "Internet search, cloud computing, artificial intelligence and advertising technology.".to_string(),
            security_incident: "Yes. Several user data exposures and privacy violations have been reported over the years.".to_string(),
        }
    } else if name_lower.contains("apple") || name_lower.contains("苹果") {
        CompanyRecord {
            company_name: "Apple Inc.".to_string(),
            website: "https://www.apple.com/".to_string(),
            revenue: "$383.3 Billion (2023)".to_string(),
            business: "Designs, manufactures and sells smartphones, personal computers, tablets, wearables and accessories, and sells related services.".to_string(),
            security_incident: "No large-scale data breach. Occasional iOS and macOS vulnerabilities are patched promptly.".to_string(),
        }
    } else {
        CompanyRecord {
            company_name: company_name.to_string(),
            website: NOT_FOUND.to_string(),
            revenue: "Searching...".to_string(),
            business: "Insufficient information, try a more precise name.".to_string(),
            security_incident: NO_PUBLIC_RECORD.to_string(),
        }
    }
}

#[async_trait]
impl CompanyFactsProvider for DemoProvider {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn resolve(&self, query: &QueryContext) -> Result<CompanyRecord, LookupError> {
        Ok(canned_record(&query.company_name))
    }
}
