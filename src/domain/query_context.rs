use url::Url;

use super::LookupError;

pub const MISSING_NAME_MESSAGE: &str = "Please provide a company name";

#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    pub company_name: String,
    pub supplementary_url: Option<Url>,
}

impl QueryContext {
    pub fn new(company_name: &str) -> Self {
        QueryContext {
            company_name: company_name.trim().to_string(),
            supplementary_url: None,
        }
    }

    /// Builds the context from raw request input.
    ///
    /// A blank name is a client error. A URL that is blank or not http(s) is
    /// dropped so the lookup still runs on the name alone.
    pub fn parse(name: Option<&str>, url: Option<&str>) -> Result<Self, LookupError> {
        let company_name = name.map(str::trim).unwrap_or_default();
        if company_name.is_empty() {
            return Err(LookupError::ClientInput(MISSING_NAME_MESSAGE.to_string()));
        }

        let supplementary_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .and_then(|u| match Url::parse(u) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(parsed),
                Ok(parsed) => {
                    log::warn!(
                        "Ignoring supplementary url with unsupported scheme: {}",
                        parsed.scheme()
                    );
                    None
                }
                Err(e) => {
                    log::warn!("Ignoring unparsable supplementary url {:?}: {}", u, e);
                    None
                }
            });

        let mut context = QueryContext::new(company_name);
        context.supplementary_url = supplementary_url;
        Ok(context)
    }
}
