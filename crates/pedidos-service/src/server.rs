//! HTTP server for the pedidos tracker API.
//!
//! This module provides a minimal HTTP server exposing the order
//! lifecycle, filtering, statistics, and frequent-customer operations.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Json},
	routing::{delete, get, put},
	Router,
};
use pedidos_config::ApiConfig;
use pedidos_core::{EngineError, OrderEngine, OrderFilter};
use pedidos_types::{
	ApiError, FrequentCustomerRequest, Order, StatisticsSnapshot, UpdateStatusRequest,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the order engine for processing requests.
	pub engine: Arc<OrderEngine>,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for all endpoints.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<OrderEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app_state = AppState { engine };

	// Build the router with /api base path
	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", get(handle_list_orders).post(handle_create_order))
				.route(
					"/orders/{id}",
					get(handle_get_order).delete(handle_delete_order),
				)
				.route("/orders/{id}/status", put(handle_update_status))
				.route("/statistics", get(handle_statistics))
				.route(
					"/customers/frequent",
					get(handle_list_frequent).post(handle_add_frequent),
				)
				.route("/customers/frequent/{name}", delete(handle_remove_frequent)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Pedidos API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles GET /api/orders requests.
///
/// Returns the order collection newest-first, narrowed by the optional
/// query criteria (status, customer, date prefix, code).
async fn handle_list_orders(
	State(state): State<AppState>,
	Query(filter): Query<OrderFilter>,
) -> Result<Json<Vec<Order>>, ApiError> {
	match state.engine.list_orders(&filter).await {
		Ok(orders) => Ok(Json(orders)),
		Err(e) => {
			tracing::warn!("Order listing failed: {}", e);
			Err(api_error(e))
		}
	}
}

/// Handles POST /api/orders requests.
///
/// Validates the submitted draft and returns the canonical created
/// record with its assigned id.
async fn handle_create_order(
	State(state): State<AppState>,
	Json(draft): Json<pedidos_types::OrderDraft>,
) -> Result<impl IntoResponse, ApiError> {
	match state.engine.create_order(&draft).await {
		Ok(order) => Ok((StatusCode::CREATED, Json(order))),
		Err(e) => {
			tracing::warn!("Order creation failed: {}", e);
			Err(api_error(e))
		}
	}
}

/// Handles GET /api/orders/{id} requests.
async fn handle_get_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<Order>, ApiError> {
	match state.engine.get_order(&id).await {
		Ok(order) => Ok(Json(order)),
		Err(e) => {
			tracing::warn!("Order retrieval failed: {}", e);
			Err(api_error(e))
		}
	}
}

/// Handles PUT /api/orders/{id}/status requests.
///
/// Applies a pipeline transition; any target status is legal and a
/// self-transition returns the record unchanged.
async fn handle_update_status(
	Path(id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, ApiError> {
	match state.engine.update_status(&id, request.status).await {
		Ok(order) => Ok(Json(order)),
		Err(e) => {
			tracing::warn!("Status update failed: {}", e);
			Err(api_error(e))
		}
	}
}

/// Handles DELETE /api/orders/{id} requests.
async fn handle_delete_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
	match state.engine.delete_order(&id).await {
		Ok(()) => Ok(StatusCode::NO_CONTENT),
		Err(e) => {
			tracing::warn!("Order deletion failed: {}", e);
			Err(api_error(e))
		}
	}
}

/// Handles GET /api/statistics requests.
///
/// Serves the snapshot aggregated from the current order collection.
async fn handle_statistics(
	State(state): State<AppState>,
) -> Result<Json<StatisticsSnapshot>, ApiError> {
	match state.engine.statistics().await {
		Ok(snapshot) => Ok(Json(snapshot)),
		Err(e) => {
			tracing::warn!("Statistics aggregation failed: {}", e);
			Err(api_error(e))
		}
	}
}

/// Handles GET /api/customers/frequent requests.
async fn handle_list_frequent(State(state): State<AppState>) -> Json<Vec<String>> {
	Json(state.engine.frequent_customers().await)
}

/// Handles POST /api/customers/frequent requests.
async fn handle_add_frequent(
	State(state): State<AppState>,
	Json(request): Json<FrequentCustomerRequest>,
) -> Result<Json<Vec<String>>, ApiError> {
	match state.engine.add_frequent_customer(&request.name).await {
		Ok(_) => Ok(Json(state.engine.frequent_customers().await)),
		Err(e) => {
			tracing::warn!("Frequent-customer add failed: {}", e);
			Err(api_error(e))
		}
	}
}

/// Handles DELETE /api/customers/frequent/{name} requests.
///
/// Removing an absent name is a no-op, not an error.
async fn handle_remove_frequent(
	Path(name): Path<String>,
	State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
	match state.engine.remove_frequent_customer(&name).await {
		Ok(_) => Ok(StatusCode::NO_CONTENT),
		Err(e) => {
			tracing::warn!("Frequent-customer removal failed: {}", e);
			Err(api_error(e))
		}
	}
}

/// Maps engine failures to structured API errors.
fn api_error(err: EngineError) -> ApiError {
	match err {
		EngineError::Validation(e) => ApiError::BadRequest {
			error_type: "VALIDATION_ERROR".to_string(),
			message: e.to_string(),
			details: None,
		},
		EngineError::NotFound(id) => ApiError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: format!("Order not found: {}", id),
		},
		EngineError::Storage(msg) => ApiError::InternalServerError {
			error_type: "STORAGE_ERROR".to_string(),
			message: msg,
		},
		EngineError::Time(msg) => ApiError::InternalServerError {
			error_type: "INTERNAL_ERROR".to_string(),
			message: msg,
		},
	}
}
