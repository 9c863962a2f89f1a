// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod seed;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use roster_bid_api::{
    ApiError, BiddingService, GetBidResponse, Identity, ListRosterPeriodsResponse,
    MetricsResponse, PeriodLockResponse, QueryBidsRequest, QueryBidsResponse, Role,
    RunAllocationResponse, SubmitBidRequest, SubmitBidResponse, TimeFilterRequest,
    TimePredicateInfo, WithdrawBidResponse,
};
use roster_bid_domain::{Rank, SystemClock};
use roster_bid_persistence::Persistence;
use seed::SeedFile;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Roster Bid Server - HTTP server for roster-period leave bidding
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// JSON file with roster periods, persons, rank floors and approved
    /// leave, loaded at startup into a database that does not yet hold them
    #[arg(short, long)]
    seed: Option<PathBuf>,

    /// Seconds a metrics snapshot is served before a background refresh
    #[arg(long, default_value_t = 60)]
    metrics_ttl_secs: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    service: Arc<BiddingService>,
}

/// Headers carrying the identity asserted by the upstream identity service.
const PERSON_ID_HEADER: &str = "x-person-id";
const RANK_HEADER: &str = "x-person-rank";
const SENIORITY_HEADER: &str = "x-seniority-rank";
const ROLE_HEADER: &str = "x-role";

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error kind, e.g. `validation` or `conflict`.
    kind: String,
    /// Machine-readable reason code, where the kind has one.
    reason: Option<String>,
    /// Human-readable message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    kind: &'static str,
    reason: Option<&'static str>,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            kind: self.kind.to_string(),
            reason: self.reason.map(String::from),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Dependency { .. } => {
                error!(error = %err, "Dependency unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            kind: err.kind(),
            reason: err.reason(),
            message: err.to_string(),
        }
    }
}

impl HttpError {
    fn invalid_identity(message: String) -> Self {
        warn!(%message, "Rejected request identity");
        Self {
            status: StatusCode::UNAUTHORIZED,
            kind: "unauthenticated",
            reason: Some("INVALID_IDENTITY"),
            message,
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, HttpError> {
    headers
        .get(name)
        .ok_or_else(|| HttpError::invalid_identity(format!("Missing header '{name}'")))?
        .to_str()
        .map_err(|_| HttpError::invalid_identity(format!("Header '{name}' is not valid text")))
}

/// Reads the asserted identity from the request headers.
fn identity_from_headers(headers: &HeaderMap) -> Result<Identity, HttpError> {
    let person_id: i64 = header_value(headers, PERSON_ID_HEADER)?
        .parse()
        .map_err(|_| HttpError::invalid_identity(format!("Invalid '{PERSON_ID_HEADER}'")))?;
    let rank: Rank = header_value(headers, RANK_HEADER)?
        .parse()
        .map_err(|_| HttpError::invalid_identity(format!("Invalid '{RANK_HEADER}'")))?;
    let seniority_rank: u32 = header_value(headers, SENIORITY_HEADER)?
        .parse()
        .map_err(|_| HttpError::invalid_identity(format!("Invalid '{SENIORITY_HEADER}'")))?;
    let role: Role = header_value(headers, ROLE_HEADER)?
        .parse()
        .map_err(|_| HttpError::invalid_identity(format!("Invalid '{ROLE_HEADER}'")))?;
    Ok(Identity {
        person_id,
        rank,
        seniority_rank,
        role,
    })
}

/// Handler for GET `/roster_periods`.
async fn handle_list_roster_periods(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListRosterPeriodsResponse>, HttpError> {
    Ok(Json(app_state.service.list_roster_periods().await?))
}

/// Handler for POST `/roster_periods/{roster_period_id}/lock`.
async fn handle_lock_period(
    AxumState(app_state): AxumState<AppState>,
    Path(roster_period_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<PeriodLockResponse>, HttpError> {
    let identity: Identity = identity_from_headers(&headers)?;
    info!(roster_period_id, person_id = identity.person_id, "Handling lock_period request");
    Ok(Json(
        app_state
            .service
            .lock_period(&identity, roster_period_id)
            .await?,
    ))
}

/// Handler for POST `/roster_periods/{roster_period_id}/unlock`.
async fn handle_unlock_period(
    AxumState(app_state): AxumState<AppState>,
    Path(roster_period_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<PeriodLockResponse>, HttpError> {
    let identity: Identity = identity_from_headers(&headers)?;
    info!(roster_period_id, person_id = identity.person_id, "Handling unlock_period request");
    Ok(Json(
        app_state
            .service
            .unlock_period(&identity, roster_period_id)
            .await?,
    ))
}

/// Handler for POST `/roster_periods/{roster_period_id}/allocation`.
///
/// Runs allocation for the period and commits the outcome.
async fn handle_run_allocation(
    AxumState(app_state): AxumState<AppState>,
    Path(roster_period_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<RunAllocationResponse>, HttpError> {
    let identity: Identity = identity_from_headers(&headers)?;
    info!(roster_period_id, person_id = identity.person_id, "Handling run_allocation request");
    Ok(Json(
        app_state
            .service
            .run_allocation(&identity, roster_period_id)
            .await?,
    ))
}

/// Handler for POST `/bids`.
async fn handle_submit_bid(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<SubmitBidRequest>,
) -> Result<Json<SubmitBidResponse>, HttpError> {
    let identity: Identity = identity_from_headers(&headers)?;
    info!(
        person_id = identity.person_id,
        roster_period_id = req.roster_period_id,
        options = req.options.len(),
        "Handling submit_bid request"
    );
    Ok(Json(app_state.service.submit_bid(&identity, &req).await?))
}

/// Handler for GET `/bids/{bid_id}`.
async fn handle_get_bid(
    AxumState(app_state): AxumState<AppState>,
    Path(bid_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<GetBidResponse>, HttpError> {
    let identity: Identity = identity_from_headers(&headers)?;
    Ok(Json(app_state.service.get_bid(&identity, bid_id).await?))
}

/// Handler for DELETE `/bids/{bid_id}`.
async fn handle_withdraw_bid(
    AxumState(app_state): AxumState<AppState>,
    Path(bid_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<WithdrawBidResponse>, HttpError> {
    let identity: Identity = identity_from_headers(&headers)?;
    info!(bid_id, person_id = identity.person_id, "Handling withdraw_bid request");
    Ok(Json(app_state.service.withdraw_bid(&identity, bid_id).await?))
}

/// Handler for POST `/reports/bids`.
async fn handle_query_bids(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<QueryBidsRequest>,
) -> Result<Json<QueryBidsResponse>, HttpError> {
    identity_from_headers(&headers)?;
    Ok(Json(app_state.service.query_bids(&req).await?))
}

/// Handler for POST `/reports/time_filter`.
///
/// Resolves a time filter without running a report.
async fn handle_compose_time_filter(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    Json(req): Json<TimeFilterRequest>,
) -> Result<Json<TimePredicateInfo>, HttpError> {
    identity_from_headers(&headers)?;
    Ok(Json(app_state.service.compose_time_filter(&req).await?))
}

/// Handler for GET `/metrics`.
async fn handle_get_metrics(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MetricsResponse>, HttpError> {
    Ok(Json(app_state.service.get_metrics().await?))
}

/// Handler for POST `/metrics/refresh`.
///
/// Returns as soon as the refresh is requested.
async fn handle_refresh_metrics(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let identity: Identity = identity_from_headers(&headers)?;
    app_state.service.refresh_metrics(&identity)?;
    Ok(StatusCode::ACCEPTED)
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/roster_periods", get(handle_list_roster_periods))
        .route(
            "/roster_periods/{roster_period_id}/lock",
            post(handle_lock_period),
        )
        .route(
            "/roster_periods/{roster_period_id}/unlock",
            post(handle_unlock_period),
        )
        .route(
            "/roster_periods/{roster_period_id}/allocation",
            post(handle_run_allocation),
        )
        .route("/bids", post(handle_submit_bid))
        .route(
            "/bids/{bid_id}",
            get(handle_get_bid).delete(handle_withdraw_bid),
        )
        .route("/reports/bids", post(handle_query_bids))
        .route("/reports/time_filter", post(handle_compose_time_filter))
        .route("/metrics", get(handle_get_metrics))
        .route("/metrics/refresh", post(handle_refresh_metrics))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing roster bid server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!(path = %db_path, "Using file-based database");
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some(seed_path) = &args.seed {
        info!(path = %seed_path.display(), "Loading seed data");
        SeedFile::load(seed_path)?.apply(&mut persistence)?;
    }

    let service: BiddingService = BiddingService::new(
        persistence,
        Arc::new(SystemClock),
        Duration::from_secs(args.metrics_ttl_secs),
    );
    let app: Router = build_router(AppState {
        service: Arc::new(service),
    });

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!(%addr, metrics_ttl_secs = args.metrics_ttl_secs, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
