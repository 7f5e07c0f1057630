use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    configuration::{ProviderKind, Settings},
    domain::{CompanyRecord, LookupError, QueryContext},
};

use super::{CustomSearchProvider, DemoProvider, GeminiProvider};

/// A source of company facts. One implementation is picked at startup.
#[async_trait]
pub trait CompanyFactsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, query: &QueryContext) -> Result<CompanyRecord, LookupError>;
}

pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}

pub fn build_provider(settings: &Settings) -> Result<Arc<dyn CompanyFactsProvider>, reqwest::Error> {
    let provider_settings = &settings.provider;
    let client = http_client(Duration::from_secs(provider_settings.timeout_secs))?;

    let provider: Arc<dyn CompanyFactsProvider> = match provider_settings.kind {
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(
            client,
            settings.api_keys.gemini(),
            provider_settings.model.clone(),
            provider_settings.gemini_base_url.clone(),
            provider_settings.output,
        )),
        ProviderKind::CustomSearch => Arc::new(CustomSearchProvider::new(
            client,
            settings.api_keys.search(),
            settings.api_keys.search_engine_id(),
            provider_settings.search_base_url.clone(),
        )),
        ProviderKind::Demo => Arc::new(DemoProvider),
    };

    log::info!("Using {} provider", provider.name());
    Ok(provider)
}
