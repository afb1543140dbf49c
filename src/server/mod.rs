//! HTTP API for processing uploads and reading dashboard state.
//!
//! JSON endpoints under `/api`:
//! - `POST /api/process-document` runs files through the pipeline
//! - `GET /api/documents` lists session documents by folder
//! - `GET /api/clients`, `/api/queue` and `/api/stats` expose the admin view

mod handlers;
mod routes;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::email::EmailClient;
use crate::extract::build_extractor;
use crate::pipeline::Pipeline;
use crate::services::AdminDashboard;
use crate::storage::{open_store, Records};

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub records: Records,
    pub dashboard: Arc<AdminDashboard>,
}

impl AppState {
    pub fn new(pipeline: Pipeline, records: Records, dashboard: AdminDashboard) -> Self {
        Self {
            pipeline,
            records,
            dashboard: Arc::new(dashboard),
        }
    }

    /// Build state from settings. Requests are never paced.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        settings.ensure_directories()?;
        let store = open_store(settings.store, &settings.data_dir)?;
        let records = Records::new(store);
        let pipeline = Pipeline::new(build_extractor(
            settings.extractor,
            settings.seed,
            &settings.ocr_language,
        ));
        let email = EmailClient::new(&settings.email_endpoint)?;
        let dashboard = AdminDashboard::new(records.clone(), email, &settings.admin_email);
        Ok(Self::new(pipeline, records, dashboard))
    }
}

/// Start the web server.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::from_settings(settings)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
