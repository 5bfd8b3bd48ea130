use axum::{http::HeaderValue, middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::database::models::{Item, Organization};
use crate::gateway::Entity;
use crate::handlers::{entity, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let prefix = state.config.api.prefix.trim_end_matches('/').to_string();

    // Auth runs only on matched entity routes, ahead of body extraction
    let protected = Router::new()
        .merge(entity_routes::<Item>(&prefix))
        .merge(entity_routes::<Organization>(&prefix))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(protected)
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.api)),
        )
        .with_state(state)
}

fn entity_routes<E: Entity>(prefix: &str) -> Router<AppState> {
    let collection = format!("{}/{}", prefix, E::TABLE);

    Router::new()
        .route(&collection, get(entity::list::<E>).post(entity::create::<E>))
        // The web client addresses collections with a trailing slash
        .route(
            &format!("{collection}/"),
            get(entity::list::<E>).post(entity::create::<E>),
        )
        .route(
            &format!("{collection}/:id"),
            get(entity::get::<E>)
                .put(entity::update::<E>)
                .delete(entity::delete::<E>),
        )
}

fn cors_layer(api: &ApiConfig) -> CorsLayer {
    if api.allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = api
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
