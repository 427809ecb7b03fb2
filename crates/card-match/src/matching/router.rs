use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};

use super::repository::{CatalogSource, ResultsPublisher};
use super::service::{RecommendationService, RecommendationServiceError};
use crate::catalog::CardId;

/// Router builder exposing the recommendation and partner-value endpoints.
pub fn recommendation_router<C, P>(service: Arc<RecommendationService<C, P>>) -> Router
where
    C: CatalogSource + 'static,
    P: ResultsPublisher + 'static,
{
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler::<C, P>))
        .route(
            "/api/v1/cards/:card_id/partners",
            get(partners_handler::<C, P>),
        )
        .with_state(service)
}

pub(crate) async fn recommend_handler<C, P>(
    State(service): State<Arc<RecommendationService<C, P>>>,
    axum::Json(criteria): axum::Json<Value>,
) -> Response
where
    C: CatalogSource + 'static,
    P: ResultsPublisher + 'static,
{
    match service.recommend(&criteria) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(RecommendationServiceError::Validation(error)) => {
            let payload = json!({
                "error": "invalid matching criteria",
                "fields": error.fields,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn partners_handler<C, P>(
    State(service): State<Arc<RecommendationService<C, P>>>,
    Path(card_id): Path<String>,
) -> Response
where
    C: CatalogSource + 'static,
    P: ResultsPublisher + 'static,
{
    let id = CardId(card_id);
    match service.partner_values(&id) {
        Ok(values) => {
            let payload = json!({
                "card_id": id.0,
                "partners": values,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(RecommendationServiceError::CardNotFound(_)) => {
            let payload = json!({
                "error": format!("card {id} not found"),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
