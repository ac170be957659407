// HTTP service mode
// Multi-session chat API over the support assistant

mod handlers;
mod session;

pub use handlers::{create_router, health_check, ChatRequest, ChatResponse};
pub use session::{SessionHandle, SessionManager, SessionState};

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::assistant::SupportAssistant;
pub use crate::config::ServerConfig;

pub struct SupportServer {
    /// Pipeline shared across sessions
    assistant: Arc<SupportAssistant>,
    session_manager: Arc<SessionManager>,
    config: ServerConfig,
}

impl SupportServer {
    pub fn new(assistant: SupportAssistant, config: ServerConfig, max_messages: usize) -> Self {
        let session_manager = SessionManager::new(
            config.max_sessions,
            config.session_timeout_minutes,
            max_messages,
        );

        Self {
            assistant: Arc::new(assistant),
            session_manager: Arc::new(session_manager),
            config,
        }
    }

    /// Start the HTTP server
    pub async fn serve(self) -> Result<()> {
        let addr: SocketAddr = self
            .config
            .bind_address
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.config.bind_address))?;

        self.session_manager.start_cleanup_task();

        let app = create_router(Arc::new(self))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        tracing::info!("Starting copechat server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn assistant(&self) -> &Arc<SupportAssistant> {
        &self.assistant
    }

    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session_manager
    }
}
