//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::{AccountValidator, MessageService};
use crate::config::Settings;
use crate::domain::entities::MessageRepository;
use crate::infrastructure::repositories::InMemoryMessageRepository;
use crate::presentation::http::{create_router, handlers::health};
use crate::presentation::middleware::{create_cors_layer, create_trace_layer};
use crate::presentation::websocket::{Hub, HubHandle};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn MessageRepository>,
    pub hub: HubHandle,
    pub accounts: Arc<AccountValidator>,
    pub messages: MessageService,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Wire the store, accounts and services, and start the hub.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(settings: Settings) -> Self {
        let store: Arc<dyn MessageRepository> = Arc::new(InMemoryMessageRepository::new());
        let hub = Hub::spawn(store.clone(), settings.hub.intake_buffer);
        let accounts = Arc::new(AccountValidator::from_settings(&settings.accounts));
        let messages = MessageService::new(store.clone(), settings.history.default_limit);

        Self {
            store,
            hub,
            accounts,
            messages,
            settings: Arc::new(settings),
        }
    }
}

/// Router with the HTTP middleware stack applied
pub fn build_router(state: AppState) -> Router {
    let cors = create_cors_layer(&state.settings.cors);

    create_router(state)
        .layer(create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();

        let addr = settings.server_addr();
        let state = AppState::new(settings);
        tracing::info!("Hub running");

        let router = build_router(state);

        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
