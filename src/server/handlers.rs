use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::checkout::ShippingQuote;
use crate::location::{normalize_query, LocationQuery, LocationSource, ProvinceInfo, Resolution};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

pub struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

/// Malformed query strings get the same JSON body as every other error.
fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(p)| p)
        .map_err(|e| api_error(e.status(), e.body_text()))
}

/// Resolution may block on the geocoder; keep it off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        tracing::error!(error = %e, "resolution task failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "resolution task failed")
    })
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> &'static str {
    "ok"
}

// ─── GET /api/quote ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct QuoteParams {
    pub from: Option<String>,
    pub from_lat: Option<f64>,
    pub from_lon: Option<f64>,
    pub to: Option<String>,
    pub to_lat: Option<f64>,
    pub to_lon: Option<f64>,
}

impl QuoteParams {
    fn origin(&self) -> Option<LocationQuery> {
        let q = LocationQuery {
            province: self.from.clone(),
            lat: self.from_lat,
            lon: self.from_lon,
        };
        q.is_specified().then_some(q)
    }

    fn destination(&self) -> LocationQuery {
        LocationQuery {
            province: self.to.clone(),
            lat: self.to_lat,
            lon: self.to_lon,
        }
    }
}

pub async fn quote(
    State(state): State<Arc<AppState>>,
    params: Result<Query<QuoteParams>, QueryRejection>,
) -> Result<Json<ShippingQuote>, ApiError> {
    let start = Instant::now();
    let params = query_params(params)?;

    let origin = params
        .origin()
        .or_else(|| state.default_origin.clone())
        .unwrap_or_default();
    let destination = params.destination();

    let st = Arc::clone(&state);
    let (origin, destination, quote) = blocking(move || {
        let quote = st.checkout.quote(&origin, &destination);
        (origin, destination, quote)
    })
    .await?;

    tracing::info!(
        from = ?origin.province,
        to = ?destination.province,
        fee = ?quote.fee,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "GET /api/quote"
    );

    Ok(Json(quote))
}

// ─── GET /api/resolve ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveParams {
    pub province: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub lat: f64,
    pub lon: f64,
    pub source: LocationSource,
    pub formatted_coords: String,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ResolveParams>, QueryRejection>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let params = query_params(params)?;
    let query = LocationQuery {
        province: params.province,
        lat: params.lat,
        lon: params.lon,
    };
    if !query.is_specified() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Provide 'province' or valid 'lat'+'lon' parameters",
        ));
    }

    let st = Arc::clone(&state);
    let (query, resolved) = blocking(move || {
        let resolved = st.checkout.resolver().resolve_query(&query);
        (query, resolved)
    })
    .await?;

    let resolved = resolved.ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            format!("Location not found: '{}'", query.province_name().unwrap_or_default()),
        )
    })?;

    tracing::info!(province = ?query.province, source = %resolved.source, "GET /api/resolve");

    Ok(Json(ResolveResponse {
        lat: resolved.coordinate.lat(),
        lon: resolved.coordinate.lon(),
        source: resolved.source,
        formatted_coords: resolved.coordinate.to_string(),
    }))
}

// ─── GET /api/provinces ──────────────────────────────────────────

pub async fn province_list(State(state): State<Arc<AppState>>) -> Json<Vec<ProvinceInfo>> {
    Json(state.checkout.resolver().table().provinces())
}

// ─── GET /api/cache ──────────────────────────────────────────────

#[derive(Serialize)]
pub struct CacheStatus {
    pub entries: usize,
    pub unresolved: Vec<String>,
}

pub async fn cache_status(State(state): State<Arc<AppState>>) -> Json<CacheStatus> {
    let resolver = state.checkout.resolver();
    Json(CacheStatus {
        entries: resolver.cached_len(),
        unresolved: resolver.unresolved(),
    })
}

// ─── DELETE /api/cache/{province} ────────────────────────────────

#[derive(Serialize)]
pub struct ForgetResponse {
    pub key: String,
    pub previous: Resolution,
}

/// Clears one remembered geocode outcome so the next quote looks it up again.
pub async fn forget(
    State(state): State<Arc<AppState>>,
    Path(province): Path<String>,
) -> Result<Json<ForgetResponse>, ApiError> {
    let key = normalize_query(&province);
    if key.is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "Province name is blank"));
    }

    let previous = state.checkout.resolver().forget(&key);
    tracing::info!(key = %key, ?previous, "DELETE /api/cache");

    Ok(Json(ForgetResponse { key, previous }))
}
