//! HTTP relay in front of the recipe API.
//!
//! The browser never sees the API key: it calls these routes and the relay
//! attaches the key on the way upstream.
//!
//! | route                                  | upstream                                 |
//! |----------------------------------------|------------------------------------------|
//! | `GET /api/recipes?ingredients=a,b,c`   | `GET /recipes/findByIngredients`         |
//! | `GET /api/recipe/{id}`                 | `GET /recipes/{id}/information`          |
//!
//! Failures are JSON objects of the form `{"error": ..., "message": ...}`:
//! 500 when no key is configured (checked before any upstream call), 401 when
//! upstream rejects the key, 500 for anything else, including requests the
//! relay cannot read. A repeated `ingredients` key is joined with commas.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, Request, State,
    },
    http::{header::CONTENT_TYPE, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{error, info, warn};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tower_http::cors::{Any, CorsLayer};

use crate::config::RelayConfig;
use crate::error::{ApiError, RelayError};
use crate::spoonacular::{RecipeSource, SpoonacularClient};

const SEARCH_FAILED: &str = "Failed to fetch recipes";
const DETAILS_FAILED: &str = "Failed to fetch recipe details";

pub struct AppState {
    pub source: Arc<dyn RecipeSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn RecipeSource>) -> Arc<Self> {
        Arc::new(Self { source })
    }
}

/// Every `ingredients` value in query order, joined with commas
fn ingredients_param(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .filter(|(key, _)| key == "ingredients")
        .map(|(_, value)| value.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the relay router over any recipe source
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/recipes", get(search_handler))
        .route("/api/recipe/{id}", get(recipe_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .layer(cors)
        .with_state(state)
}

async fn require_api_key(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.source.has_credential() {
        warn!("Rejecting {}: API key not configured", request.uri().path());
        return ApiError::missing_api_key().into_response();
    }

    next.run(request).await
}

pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(pairs) = query.map_err(|rejection| {
        error!("Unreadable search query: {}", rejection.body_text());
        ApiError::new(RelayError::InvalidRequest(rejection.body_text()), SEARCH_FAILED)
    })?;
    let ingredients = ingredients_param(&pairs);
    info!("Fetching recipes for ingredients: {}", ingredients);

    let recipes = state
        .source
        .find_by_ingredients(&ingredients)
        .await
        .map_err(|e| {
            error!("Recipe search failed: {}", e);
            ApiError::new(e, SEARCH_FAILED)
        })?;

    info!(
        "Found recipes: {}",
        recipes.as_array().map_or(0, Vec::len)
    );
    Ok(Json(recipes))
}

pub async fn recipe_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        error!("Unreadable recipe id: {}", rejection.body_text());
        ApiError::new(RelayError::InvalidRequest(rejection.body_text()), DETAILS_FAILED)
    })?;
    info!("Fetching details for recipe: {}", id);

    let recipe = state.source.recipe_information(&id).await.map_err(|e| {
        error!("Recipe {} lookup failed: {}", id, e);
        ApiError::new(e, DETAILS_FAILED)
    })?;

    Ok(Json(recipe))
}

/// Run the relay until Ctrl+C or SIGTERM
pub async fn serve(config: RelayConfig) -> Result<(), RelayError> {
    if config.api_key.is_none() {
        warn!("No Spoonacular API key configured; every route will answer 500");
    }

    let source = SpoonacularClient::new(&config)?;
    let app = router(AppState::new(Arc::new(source)));

    let address = config.address();
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server is running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
