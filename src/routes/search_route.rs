use actix_web::{get, web, HttpResponse};
use serde::Deserialize;

use crate::{
    domain::{LookupError, QueryContext},
    services::CompanyFactsProvider,
};

#[derive(Deserialize)]
struct SearchQuery {
    name: Option<String>,
    #[serde(alias = "supplementary_url")]
    url: Option<String>,
}

#[get("/search")]
async fn search(
    provider: web::Data<dyn CompanyFactsProvider>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let context = match QueryContext::parse(query.name.as_deref(), query.url.as_deref()) {
        Ok(context) => context,
        Err(e) => return error_response(&e),
    };

    match provider.resolve(&context).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => {
            log::error!(
                "Lookup for {:?} via {} failed: {}",
                context.company_name,
                provider.name(),
                e
            );
            error_response(&e)
        }
    }
}

/// Only client input errors leave the 200 status.
fn error_response(e: &LookupError) -> HttpResponse {
    if e.is_client_error() {
        HttpResponse::BadRequest().json(e.to_payload())
    } else {
        HttpResponse::Ok().json(e.to_payload())
    }
}
