use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "message": "Company facts API is running",
        "tip": "Query /api/search?name=<company>&url=<optional page to read>"
    }))
}
