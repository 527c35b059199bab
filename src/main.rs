use std::sync::Arc;

use symptom_engine::config::{self, ServiceConfig};
use symptom_engine::engine::DiagnosisEngine;
use symptom_engine::knowledge::KnowledgeBase;
use symptom_engine::service::{start_predictor_server, ServiceContext, SymptomGuide};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    symptom_engine::init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    match run().await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;

    let kb = Arc::new(KnowledgeBase::load_json(&config.knowledge_base_path)?);
    let guide = SymptomGuide::load(&config.guide_path)?;
    let engine = DiagnosisEngine::from_config(kb, &config.engine)?;

    let server = start_predictor_server(ServiceContext::new(engine, guide), config.bind_addr).await?;
    tracing::info!(
        session_id = %server.session.session_id,
        addr = %server.session.server_addr,
        "Listening"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Interrupt received, shutting down");
    server.stop().await;
    Ok(())
}
