use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::shared::AppState;
use crate::{product, session, user};

async fn home() -> Json<Value> {
    Json(json!({ "message": "Welcome home" }))
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Builds the full HTTP surface. Protected routes sit behind `jwt_auth`;
/// registration, login and uploaded files are public.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let protected = Router::new()
        .route("/", get(home))
        .route("/logout", post(session::logout))
        .route(
            "/products",
            get(product::list_products).post(product::create_product),
        )
        .route(
            "/products/:id",
            get(product::get_product)
                .put(product::update_product)
                .delete(product::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::jwt_auth,
        ));

    let uploads = ServeDir::new(state.image_store.upload_dir());

    Router::new()
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .merge(protected)
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
