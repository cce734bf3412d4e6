//! Dashboard Route
//!
//! - GET /?period={7d|30d|3m} - Server-rendered dashboard page

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::dashboard::{resolve_period, DashboardPage};
use crate::web::state::AppState;

/// Query parameters of the dashboard page
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub period: Option<String>,
}

/// GET /
///
/// Fetches stats for the requested period and renders the page. A backend
/// failure still answers 200 with the error panel.
pub async fn dashboard_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> impl IntoResponse {
    let period = resolve_period(query.period.as_deref());
    let page = DashboardPage::load(&state.stats, period).await;

    (
        [(header::CACHE_CONTROL, "no-store")],
        page.render_html(),
    )
}
