//! StudyCoach core — turns uploaded course documents into a calendar of
//! study sessions.
//!
//! The pipeline recovers a document's latent structure from raw page text,
//! derives topics and key terms, partitions the structure into balanced study
//! chunks, and lays those chunks onto a spaced-repetition date curve that
//! intensifies near the exam. Persistence (SQLite) and the optional LLM
//! enhancement layer sit behind narrow collaborator contracts.

pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a host binary.
///
/// Respects `RUST_LOG` when set; otherwise falls back to the crate-level
/// default filter. Call once at startup.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("StudyCoach core v{}", config::APP_VERSION);
}
