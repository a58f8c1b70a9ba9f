use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::error::{AppError, AppResult, FetchError};
use crate::pipeline::{self, DashboardData};
use crate::render::{self, DashboardContext};
use crate::state::AppState;

async fn load(state: &AppState) -> Result<DashboardData, FetchError> {
    pipeline::run(state.feed.as_ref(), Utc::now())
        .await
        .inspect_err(|err| {
            tracing::warn!(
                kind = err.kind(),
                status = ?err.status(),
                error = %err,
                "dashboard feed fetch failed"
            );
        })
}

pub(crate) async fn dashboard_view(State(state): State<AppState>) -> AppResult<Html<String>> {
    let data = load(&state).await.map_err(AppError::Page)?;
    let ctx = DashboardContext::new(&data, &state.config.viewer_name);
    Ok(Html(render::dashboard_page(&ctx)))
}

pub(crate) async fn dashboard_state(
    State(state): State<AppState>,
) -> AppResult<Json<DashboardContext>> {
    let data = load(&state).await.map_err(AppError::Api)?;
    Ok(Json(DashboardContext::new(&data, &state.config.viewer_name)))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(dashboard_view))
}

pub fn api_router() -> Router<AppState> {
    Router::new().route("/dashboard", get(dashboard_state))
}
