pub mod auth;
pub mod products;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public auth routes plus the
/// token-guarded product and profile routes.
pub fn build_router(cors: CorsLayer, state: auth::ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let protected = Router::new()
        .route("/me", get(auth::me))
        .route("/insertproduct", post(products::create))
        .route("/products", get(products::list))
        .route("/products/:id", get(products::get_one))
        .route("/updateproduct/:id", put(products::update))
        .route("/deleteproduct/:id", delete(products::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    let docs = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    public
        .merge(protected)
        .merge(docs)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
