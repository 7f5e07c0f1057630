use std::{net::TcpListener, sync::Arc};

use actix_cors::Cors;
use actix_web::{
    dev::Server,
    error::InternalError,
    middleware::Logger,
    web::{self, Data},
    App, HttpResponse, HttpServer,
};
use serde_json::json;

use crate::{
    routes::{default_route, search_route},
    services::CompanyFactsProvider,
};

pub fn run(
    listener: TcpListener,
    provider: Arc<dyn CompanyFactsProvider>,
) -> Result<Server, std::io::Error> {
    let provider: Data<dyn CompanyFactsProvider> = Data::from(provider);

    let server = HttpServer::new(move || {
        let query_config = web::QueryConfig::default().error_handler(|err, _req| {
            let response = HttpResponse::BadRequest().json(json!({"error": err.to_string()}));
            InternalError::from_response(err, response).into()
        });

        App::new()
            .wrap(Logger::default())
            .wrap(Cors::permissive())
            .service(default_route::default)
            .service(web::scope("/api").service(search_route::search))
            .app_data(query_config)
            .app_data(provider.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
