//! Wish endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{parse_bool, JsonBody, QueryParams, WishId};
use crate::http::server::AppState;
use crate::models::{Wish, WishStats};

/// Create wish request. Missing or null fields read as empty and are
/// rejected by validation rather than as malformed JSON.
#[derive(Deserialize)]
pub struct CreateWishRequest {
    pub owner_email: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateWishRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// `?owner_email=&bought=`
#[derive(Deserialize)]
pub struct OwnerParams {
    #[serde(default)]
    pub owner_email: String,
    pub bought: Option<String>,
}

impl OwnerParams {
    /// An absent or empty `bought` means no filter.
    fn bought_filter(&self) -> Result<Option<bool>, ApiError> {
        match self.bought.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => parse_bool(raw)
                .map(Some)
                .ok_or(ApiError::BadRequest("invalid bought parameter")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WishResponse {
    pub id: i64,
    pub owner_email: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub is_bought: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bought_at: Option<String>,
    pub created_at: String,
}

impl From<Wish> for WishResponse {
    fn from(w: Wish) -> Self {
        Self {
            id: w.id,
            owner_email: w.owner_email,
            title: w.title,
            description: w.description,
            is_bought: w.is_bought,
            bought_at: w.bought_at.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            created_at: w.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

/// POST /wishes
async fn create_wish(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateWishRequest>,
) -> Result<(StatusCode, Json<WishResponse>), ApiError> {
    let wish = state
        .wishes
        .create_wish(
            req.owner_email.as_deref().unwrap_or_default(),
            req.title.as_deref().unwrap_or_default(),
            req.description.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(WishResponse::from(wish))))
}

/// GET /wishes/{id}
async fn get_wish(
    State(state): State<Arc<AppState>>,
    WishId(id): WishId,
) -> Result<Json<WishResponse>, ApiError> {
    let wish = state.wishes.get_wish(id).await?;
    Ok(Json(WishResponse::from(wish)))
}

/// GET /wishes?owner_email=&bought=
async fn list_wishes(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<OwnerParams>,
) -> Result<Json<Vec<WishResponse>>, ApiError> {
    let bought = params.bought_filter()?;
    let wishes = state.wishes.list_wishes(&params.owner_email, bought).await?;

    Ok(Json(wishes.into_iter().map(WishResponse::from).collect()))
}

/// PATCH /wishes/{id}
async fn update_wish(
    State(state): State<Arc<AppState>>,
    WishId(id): WishId,
    JsonBody(req): JsonBody<UpdateWishRequest>,
) -> Result<Json<WishResponse>, ApiError> {
    let wish = state
        .wishes
        .update_wish(
            id,
            req.title.as_deref().unwrap_or_default(),
            req.description.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(WishResponse::from(wish)))
}

/// DELETE /wishes/{id}
async fn delete_wish(
    State(state): State<Arc<AppState>>,
    WishId(id): WishId,
) -> Result<StatusCode, ApiError> {
    state.wishes.delete_wish(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /wishes/{id}/buy
async fn buy_wish(
    State(state): State<Arc<AppState>>,
    WishId(id): WishId,
) -> Result<StatusCode, ApiError> {
    state.wishes.buy_wish(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /wishes/stats?owner_email=
async fn wish_stats(
    State(state): State<Arc<AppState>>,
    QueryParams(params): QueryParams<OwnerParams>,
) -> Result<Json<WishStats>, ApiError> {
    let stats = state.wishes.get_stats(&params.owner_email).await?;
    Ok(Json(stats))
}

/// Wish routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wishes", get(list_wishes).post(create_wish))
        .route("/wishes/stats", get(wish_stats))
        .route(
            "/wishes/{id}",
            get(get_wish).patch(update_wish).delete(delete_wish),
        )
        .route("/wishes/{id}/buy", patch(buy_wish))
}
