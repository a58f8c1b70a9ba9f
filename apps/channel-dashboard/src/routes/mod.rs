pub mod dashboard;
pub mod health;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(dashboard::router())
        .nest("/api", dashboard::api_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
