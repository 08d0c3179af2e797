//! The HTTP surface: `POST /setup`, `POST /dispatch` and a health probe.

use self::dto::{DispatchPayload, SetupPayload};
use self::error::ApiError;
use crate::car::{Car, CarCommand};
use crate::config::SlowdownConfig;
use crate::context::SharedNetwork;
use crate::error::DispatchError;
use crate::session;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use log::info;
use serde_json::{json, Value};
use std::sync::Arc;

pub mod dto;
pub mod error;

/// State shared by every handler.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// The active network.
    pub network: Arc<SharedNetwork>,
    /// The slowdown behaviour used when a setup gives none.
    pub defaults: SlowdownConfig,
}

impl AppState {
    pub fn new(defaults: SlowdownConfig) -> Self {
        Self {
            network: Arc::new(SharedNetwork::new()),
            defaults,
        }
    }
}

/// Creates the service's router.
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/setup", post(setup))
        .route("/dispatch", post(dispatch))
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn setup(
    State(state): State<AppState>,
    payload: Result<Json<SetupPayload>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let network = state.network.setup(payload.into(), state.defaults)?;
    info!(
        "Setup accepted: {} junctions, {} roads",
        network.iter_junctions().count(),
        network.iter_roads().count()
    );
    Ok(Json(json!({ "status": "success" })))
}

async fn dispatch(
    State(state): State<AppState>,
    payload: Result<Json<DispatchPayload>, JsonRejection>,
) -> Result<Json<Vec<CarCommand>>, ApiError> {
    let Json(payload) = payload?;
    let network = state.network.snapshot().ok_or(DispatchError::NoNetwork)?;
    let cars = payload.cars.into_iter().map(Car::from).collect::<Vec<_>>();
    let dispatched = session::dispatch(
        &payload.algorithm_name,
        &network,
        &cars,
        payload.next_request_in_seconds,
    )?;
    Ok(Json(dispatched.commands))
}
