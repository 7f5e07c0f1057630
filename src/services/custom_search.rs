use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::domain::{
    truncate_snippet, CompanyRecord, LookupError, QueryContext, POSSIBLE_INCIDENT_MARKER,
};

use super::CompanyFactsProvider;

pub const PROFILE_QUALIFIER: &str = "official site business description";
pub const REVENUE_QUALIFIER: &str = "latest annual revenue";
pub const INCIDENT_QUALIFIER: &str = "data breach OR security incident";

/// Google Programmable Search (Custom Search JSON API) backed lookups.
pub struct CustomSearchProvider {
    client: Client,
    api_key: Option<String>,
    search_engine_id: Option<String>,
    url: String,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    key: &'a str,
    cx: &'a str,
    q: &'a str,
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchHit>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    #[serde(default)]
    pub link: String,
    pub display_link: Option<String>,
    #[serde(default)]
    pub snippet: String,
}

impl SearchHit {
    /// `displayLink` when present, otherwise the host of `link`.
    fn site(&self) -> Option<String> {
        self.display_link
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .or_else(|| {
                Url::parse(&self.link)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
            })
    }
}

impl CustomSearchProvider {
    pub fn new(
        client: Client,
        api_key: Option<String>,
        search_engine_id: Option<String>,
        url: String,
    ) -> Self {
        CustomSearchProvider {
            client,
            api_key,
            search_engine_id,
            url,
        }
    }

    async fn search(&self, key: &str, cx: &str, query: &str) -> Result<Vec<SearchHit>, LookupError> {
        log::info!("Custom search: {}", query);

        let res = self
            .client
            .get(&self.url)
            .query(&SearchParams { key, cx, q: query })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(LookupError::ProviderCall(format!(
                "custom search returned {} for {:?}",
                status, query
            )));
        }

        let json = res.json::<SearchResponse>().await?;
        Ok(json.items)
    }

    /// A failed lookup only costs its own fields.
    async fn lookup(&self, key: &str, cx: &str, company_name: &str, qualifier: &str) -> Vec<SearchHit> {
        let query = format!("{} {}", company_name, qualifier);
        match self.search(key, cx, &query).await {
            Ok(hits) => hits,
            Err(e) => {
                log::warn!("Lookup {:?} failed, keeping defaults: {}", query, e);
                vec![]
            }
        }
    }
}

fn apply_profile(record: &mut CompanyRecord, hits: &[SearchHit]) {
    if let Some(hit) = hits.first() {
        if let Some(site) = hit.site() {
            record.website = site;
        }
        if !hit.snippet.trim().is_empty() {
            record.business = truncate_snippet(&hit.snippet);
        }
    }
}

fn apply_revenue(record: &mut CompanyRecord, hits: &[SearchHit]) {
    if let Some(hit) = hits.first() {
        if !hit.snippet.trim().is_empty() {
            record.revenue = hit.snippet.trim().to_string();
        }
    }
}

fn apply_incident(record: &mut CompanyRecord, hits: &[SearchHit]) {
    if let Some(hit) = hits.first() {
        record.security_incident = format!(
            "{}{}",
            POSSIBLE_INCIDENT_MARKER,
            truncate_snippet(&hit.snippet)
        );
    }
}

#[async_trait]
impl CompanyFactsProvider for CustomSearchProvider {
    fn name(&self) -> &'static str {
        "custom_search"
    }

    async fn resolve(&self, query: &QueryContext) -> Result<CompanyRecord, LookupError> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            LookupError::Configuration("search API key is not set".to_string())
        })?;
        let cx = self.search_engine_id.as_deref().ok_or_else(|| {
            LookupError::Configuration("search engine id is not set".to_string())
        })?;

        let name = query.company_name.as_str();
        let (profile, revenue, incident) = tokio::join!(
            self.lookup(key, cx, name, PROFILE_QUALIFIER),
            self.lookup(key, cx, name, REVENUE_QUALIFIER),
            self.lookup(key, cx, name, INCIDENT_QUALIFIER),
        );

        let mut record = CompanyRecord::placeholder(name);
        apply_profile(&mut record, &profile);
        apply_revenue(&mut record, &revenue);
        apply_incident(&mut record, &incident);

        Ok(record)
    }
}
