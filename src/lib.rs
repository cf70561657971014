/// Public library interface for the Diary Insight MCP server
///
/// This module exports the server implementation together with the analysis,
/// analytics, storage and backup layers so they can be used by other
/// applications or tests.

use std::path::PathBuf;
use thiserror::Error;

pub mod analytics;
pub mod analyzer;
pub mod backup;
pub mod domain;
pub mod mcp;
pub mod remote;
pub mod storage;
pub mod tools;

// Re-export public modules and types
pub use analytics::{AnalyticsEngine, DashboardSummary, PeriodKind, PeriodReview};
pub use analyzer::{AnalysisInput, LocalAnalyzer};
pub use domain::*;
pub use remote::{AnalysisOrigin, AnalysisProvider, GeminiProvider, ProviderError};
pub use storage::{DiaryStorage, SqliteStorage, StorageError};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("AI provider error: {0}")]
    Provider(#[from] remote::ProviderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main diary server that implements the MCP protocol
///
/// Entries and settings live in a SQLite database. Analyses go to the
/// remote provider when one is configured and fall back to the local
/// rule-based analyzer otherwise.
pub struct DiaryServer {
    storage: SqliteStorage,
    analytics: AnalyticsEngine,
    provider: Option<Box<dyn AnalysisProvider>>,
}

impl DiaryServer {
    /// Create a diary server with the specified database path
    ///
    /// The database schema is created or migrated as needed. With `offline`
    /// set no remote provider is created and every analysis runs locally.
    pub async fn new(db_path: PathBuf, offline: bool) -> Result<Self, ServerError> {
        tracing::info!("Initializing Diary Insight server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        let provider: Option<Box<dyn AnalysisProvider>> = if offline {
            tracing::info!("Offline mode, remote analysis disabled");
            None
        } else {
            Some(Box::new(GeminiProvider::new()?))
        };

        Ok(Self::with_storage(storage, provider))
    }

    /// Build a server around existing storage and an optional provider
    pub fn with_storage(storage: SqliteStorage, provider: Option<Box<dyn AnalysisProvider>>) -> Self {
        Self {
            storage,
            analytics: AnalyticsEngine::new(),
            provider,
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        // Test database connectivity
        let entries = self.storage.list_entries()?;
        tracing::info!("Server started successfully, found {} existing entries", entries.len());

        let mut mcp_server = mcp::McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the analytics engine
    pub fn analytics(&self) -> &AnalyticsEngine {
        &self.analytics
    }

    /// The remote provider, unless running offline
    pub fn provider(&self) -> Option<&dyn AnalysisProvider> {
        self.provider.as_deref()
    }
}
