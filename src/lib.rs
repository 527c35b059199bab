pub mod config;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod models;
pub mod predictor;
pub mod recommender;
pub mod service;
pub mod vocabulary;

use tracing_subscriber::EnvFilter;

pub use engine::{DiagnosisEngine, DiagnosisRequest, QueryState, Strategy};
pub use error::{EngineError, FailureKind};
pub use knowledge::KnowledgeBase;
pub use models::DiagnosisResult;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// filter. A second call is a no-op.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }

    #[test]
    fn bundled_resources_load() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("resources");
        let kb = KnowledgeBase::load_json(&root.join("knowledge_base.json")).unwrap();
        assert!(!kb.is_empty());
        let guide = service::SymptomGuide::load(&root.join("symptom_guide.json")).unwrap();
        assert!(!guide.is_empty());

        let response = guide.predict(&["Seizures", "Speech Delay"]);
        assert!(!response.syndromes.is_empty());
    }
}
