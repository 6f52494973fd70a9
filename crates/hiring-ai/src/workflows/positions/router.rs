use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{PositionId, CITIES, CONTRACT_TYPES};
use super::listing::{
    available_cities, CityFilter, PositionListEngine, PositionSummary, SortDirection, SortField,
    SortState,
};
use super::repository::PositionRepository;

/// Query string accepted by the list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub city: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

impl ListParams {
    /// Without `sort` the default newest-first order applies; a named field defaults to ascending.
    pub fn into_engine(self) -> Result<PositionListEngine, String> {
        let sort = match self.sort.as_deref() {
            None => {
                let mut state = SortState::default();
                if let Some(direction) = self.direction.as_deref() {
                    state.direction = direction.parse::<SortDirection>()?;
                }
                state
            }
            Some(field) => SortState {
                field: field.parse::<SortField>()?,
                direction: match self.direction.as_deref() {
                    Some(direction) => direction.parse()?,
                    None => SortDirection::Asc,
                },
            },
        };

        Ok(PositionListEngine {
            search: self.search.unwrap_or_default(),
            city: CityFilter::from_param(self.city.as_deref()),
            sort,
        })
    }
}

/// Read-only browse endpoints over committed positions.
pub fn position_router<R>(repository: Arc<R>) -> Router
where
    R: PositionRepository + 'static,
{
    Router::new()
        .route("/api/v1/positions", get(list_handler::<R>))
        .route("/api/v1/positions/cities", get(cities_handler::<R>))
        .route("/api/v1/positions/options", get(options_handler))
        .route("/api/v1/positions/:position_id", get(detail_handler::<R>))
        .with_state(repository)
}

pub(crate) async fn list_handler<R>(
    State(repository): State<Arc<R>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: PositionRepository + 'static,
{
    let engine = match params.into_engine() {
        Ok(engine) => engine,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match repository.list() {
        Ok(positions) => {
            let rows: Vec<PositionSummary> = engine
                .apply(&positions)
                .iter()
                .map(PositionSummary::from)
                .collect();
            let payload = json!({
                "count": rows.len(),
                "sort": engine.sort,
                "city": engine.city.label(),
                "positions": rows,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => internal_error(err.to_string()),
    }
}

pub(crate) async fn cities_handler<R>(State(repository): State<Arc<R>>) -> Response
where
    R: PositionRepository + 'static,
{
    match repository.list() {
        Ok(positions) => {
            let payload = json!({ "cities": available_cities(&positions) });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => internal_error(err.to_string()),
    }
}

/// Catalogues offered by the draft form's location and contract pickers.
pub(crate) async fn options_handler() -> Response {
    let payload = json!({
        "cities": &CITIES[..],
        "contract_types": CONTRACT_TYPES,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn detail_handler<R>(
    State(repository): State<Arc<R>>,
    Path(position_id): Path<String>,
) -> Response
where
    R: PositionRepository + 'static,
{
    let id = PositionId(position_id);
    match repository.fetch(&id) {
        Ok(Some(position)) => (StatusCode::OK, axum::Json(position)).into_response(),
        Ok(None) => {
            let payload = json!({
                "error": "position not found",
                "position_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => internal_error(err.to_string()),
    }
}

fn internal_error(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
