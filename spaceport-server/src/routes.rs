//! HTTP handlers for Spaceport server.

use actix_web::{HttpResponse, Responder, delete, get, post, web};
use serde::{Deserialize, Serialize};
use spaceport_core::{
    PageRequest, SharedStore, Ship, ShipDraft, ShipError, ShipFilter, ShipService,
};
use utoipa::{OpenApi, ToSchema};

use crate::openapi::ApiDoc;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Backing ship store.
    pub store: SharedStore,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

fn error_response(err: ShipError) -> HttpResponse {
    match err {
        ShipError::BadRequest(message) => HttpResponse::BadRequest().json(ErrorResponse { message }),
        ShipError::NotFound(_) => HttpResponse::NotFound().finish(),
        ShipError::Store(message) => {
            log::error!("ship store failure: {message}");
            HttpResponse::InternalServerError().json(ErrorResponse { message })
        }
    }
}

/// Run a service operation on the blocking pool.
async fn with_service<T, F>(state: &web::Data<AppState>, op: F) -> Result<T, HttpResponse>
where
    T: Send + 'static,
    F: FnOnce(ShipService<SharedStore>) -> spaceport_core::Result<T> + Send + 'static,
{
    let store = state.store.clone();
    match web::block(move || op(ShipService::new(store))).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(err)),
        Err(err) => Err(HttpResponse::InternalServerError().json(ErrorResponse {
            message: format!("ship task failed: {err}"),
        })),
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(ShipFilter, PageRequest),
    responses(
        (status = 200, description = "Page of matching ships", body = [Ship]),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List ships matching the filter, ordered and paged.
pub async fn list_ships(
    state: web::Data<AppState>,
    filter: web::Query<ShipFilter>,
    page: web::Query<PageRequest>,
) -> impl Responder {
    let filter = filter.into_inner();
    let page = page.into_inner();
    match with_service(&state, move |service| service.list(&filter, &page)).await {
        Ok(ships) => HttpResponse::Ok().json(ships),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    params(ShipFilter),
    responses(
        (status = 200, description = "Number of matching ships", body = u64),
        (status = 400, description = "Malformed query", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the filter.
pub async fn count_ships(
    state: web::Data<AppState>,
    filter: web::Query<ShipFilter>,
) -> impl Responder {
    let filter = filter.into_inner();
    match with_service(&state, move |service| service.count(&filter)).await {
        Ok(count) => HttpResponse::Ok().json(count),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found")
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a single ship.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match with_service(&state, move |service| service.get(&id)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let draft = payload.into_inner();
    match with_service(&state, move |service| service.create(draft)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    request_body = ShipDraft,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid identifier or field", body = ErrorResponse),
        (status = 404, description = "Ship not found")
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Update the supplied fields of a ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipDraft>,
) -> impl Responder {
    let id = path.into_inner();
    let draft = payload.into_inner();
    match with_service(&state, move |service| service.update(&id, draft)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = String, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted"),
        (status = 400, description = "Invalid identifier", body = ErrorResponse),
        (status = 404, description = "Ship not found")
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    match with_service(&state, move |service| service.delete(&id)).await {
        Ok(()) => HttpResponse::Ok().finish(),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Register every ship route; `count` precedes `{id}` so it is not captured.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_ships)
        .service(count_ships)
        .service(get_ship)
        .service(create_ship)
        .service(update_ship)
        .service(delete_ship)
        .service(openapi_json);
}
