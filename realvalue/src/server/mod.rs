// BSD 3-Clause License
//
// Copyright (c) 2025, BlackPortal ○
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice, this
//    list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
//    this list of conditions and the following disclaimer in the documentation
//    and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its
//    contributors may be used to endorse or promote products derived from
//    this software without specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
// DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
// SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
// CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
// OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
// OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! HTTP surface of the valuation service.
//!
//! The JSON API is mounted both at the root and under `/api/v1`. Anything
//! else is looked up in the frontend directory, and unknown paths get a JSON
//! 404.

mod handlers;

pub use handlers::*;

use std::sync::Arc;

use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::{get, post};
use log::info;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::errors::{PersistenceError, TrainingError};
use crate::session::{TrainingConfig, TrainingSession};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bind error: {0}")]
    Bind(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Training failed: {0}")]
    Training(#[from] TrainingError),

    #[error("Could not save preprocessor: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Training task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// State shared by every handler. The session is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<TrainingSession>,
}

impl AppState {
    pub fn new(session: TrainingSession) -> Self {
        AppState { session: Arc::new(session) }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/market/:neighborhood", get(handlers::market))
        .route("/health", get(handlers::health))
}

pub fn router(state: AppState, config: &Config) -> Router {
    let frontend = ServeDir::new(&config.frontend_dir)
        .not_found_service(handlers::not_found.into_service())
        .call_fallback_on_method_not_allowed(true);

    let app = Router::new()
        .nest("/api/v1", api_routes())
        .merge(api_routes())
        .fallback_service(frontend)
        .with_state(state);

    if config.cors_enabled { app.layer(CorsLayer::permissive()) } else { app }
}

/// Trains on a blocking thread so the runtime stays responsive.
pub async fn train(config: TrainingConfig) -> Result<TrainingSession, ServerError> {
    let session = tokio::task::spawn_blocking(move || TrainingSession::train(&config)).await??;
    Ok(session)
}

/// Trains the model, then binds and serves until the listener fails.
///
/// Nothing is bound before training succeeds.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let session = train(config.training.clone()).await?;

    if let Some(path) = &config.preprocessor_path {
        session.preprocessor().save(path)?;
    }

    let listener = TcpListener::bind(config.address)
        .await
        .map_err(|e| ServerError::Bind(format!("{}: {}", config.address, e)))?;
    info!("ReaValue API listening on http://{}", config.address);

    let app = router(AppState::new(session), &config);
    axum::serve(listener, app).await?;
    Ok(())
}
