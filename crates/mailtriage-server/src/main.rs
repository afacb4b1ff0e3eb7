//! MailTriage — single-binary support-email classification server.
//!
//! Accepts raw support-email text, masks PII, classifies the masked
//! email into a support category, and returns the masked text plus the
//! detected entities with their original offsets.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("MAILTRIAGE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                println!("MailTriage — support-email PII masking and classification server");
                println!();
                println!("Usage: mailtriage");
                println!();
                println!("Environment:");
                println!("  PORT                       HTTP port (default 8000)");
                println!("  MAILTRIAGE_DATA_DIR        Data directory (default ./data)");
                println!("  MAILTRIAGE_MAX_EMAIL_LEN   Max email body length (default 10000)");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'mailtriage help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    // Initialize configuration
    let config = mailtriage_core::MailTriageConfig::from_env(&data_dir)?;
    let port = config.port;

    // Initialize capabilities. Both degrade to no-op backends when
    // their models are missing; the unavailability is logged here,
    // once, and never again per request.
    let ner = mailtriage_mask::create_ner(&config.model_dir);
    let classifier = mailtriage_classify::create_classifier(&config.model_dir);

    // Build application state
    let state = Arc::new(AppState::new(config, ner, classifier));

    // Build router
    let app = routes::build_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MailTriage server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
