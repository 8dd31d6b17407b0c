//! End-to-end tests for the application context

use ekmyth_app::{AppConfig, AppError, Ekmyth, LlmConfig, ProviderKind, StorageConfig, StorageKind};
use ekmyth_domain::{Draft, MythQuery, VerdictKind};
use ekmyth_llm::MockProvider;
use ekmyth_pipeline::{PipelineError, SubmissionPolicy, SubmissionState};
use ekmyth_store::{MemoryBackend, MythStore};
use ekmyth_verifier::{LlmVerifier, VerifierConfig};

fn mock_config(storage: StorageConfig) -> AppConfig {
    AppConfig {
        storage,
        llm: LlmConfig {
            provider: ProviderKind::Mock,
            mock_response: r#"{"verdict": "BUSTED", "confidence": 91, "reasoning": "Studies disagree."}"#
                .to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn goldfish() -> Draft {
    Draft::new(
        "Goldfish have a 3-second memory",
        "Goldfish forget everything after three seconds.",
        "Goldfish can remember things for months.",
    )
    .with_category("Science")
    .with_sources(["https://www.livescience.com/goldfish"])
}

#[tokio::test]
async fn test_full_session_in_memory() {
    let config = mock_config(StorageConfig {
        backend: StorageKind::Memory,
        path: None,
        seed_examples: true,
    });
    let mut app = ekmyth_app::open(&config).unwrap();
    assert_eq!(app.list().len(), 2);

    let mut submission = app.begin_submission(goldfish());
    let verdict = app.verify(&mut submission).await.unwrap();
    assert_eq!(verdict.kind, VerdictKind::Busted);

    let id = app.publish(&mut submission).unwrap().into_result().unwrap();
    assert_eq!(submission.state(), &SubmissionState::Published(id));
    assert_eq!(app.list()[0].id, id);

    app.add_comment(id, "", "Mine knows its name").unwrap().into_value();
    app.increment_vote(id).unwrap().into_value();
    app.toggle_bookmark(id).unwrap().into_value();

    let myth = app.get(id).unwrap();
    assert_eq!(myth.comments[0].author, "You");
    assert_eq!(myth.votes, 1);
    assert_eq!(app.bookmarked().len(), 1);
    assert_eq!(app.categories(), vec!["Science", "Health"]);
}

#[tokio::test]
async fn test_sqlite_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = mock_config(StorageConfig {
        backend: StorageKind::Sqlite,
        path: Some(dir.path().to_path_buf()),
        seed_examples: false,
    });

    let id = {
        let mut app = ekmyth_app::open(&config).unwrap();
        assert!(app.list().is_empty());
        app.submit(goldfish()).await.unwrap().into_result().unwrap()
    };

    let app = ekmyth_app::open(&config).unwrap();
    let myth = app.get(id).expect("published myth should be persisted");
    assert_eq!(myth.confidence.value(), 91);
    assert_eq!(myth.user_sources[0].domain(), "livescience.com");
}

#[tokio::test]
async fn test_file_session_keeps_seed_after_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let config = mock_config(StorageConfig {
        backend: StorageKind::File,
        path: Some(dir.path().to_path_buf()),
        seed_examples: true,
    });

    {
        let mut app = ekmyth_app::open(&config).unwrap();
        app.submit(goldfish()).await.unwrap().into_value();
    }

    let app = ekmyth_app::open(&config).unwrap();
    assert_eq!(app.list().len(), 3);
    let history = app.query(&MythQuery {
        category: Some("Health".to_string()),
        ..Default::default()
    });
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn test_failing_provider_still_publishes() {
    let verifier = LlmVerifier::new(MockProvider::failing(), VerifierConfig::default());
    let store = MythStore::open(MemoryBackend::new());
    let mut app = Ekmyth::new(store, verifier, SubmissionPolicy::default());

    let id = app.submit(goldfish()).await.unwrap().into_value();
    let myth = app.get(id).unwrap();
    assert_eq!(myth.verdict, VerdictKind::Uncertain);
    assert_eq!(myth.confidence.value(), 0);
}

#[tokio::test]
async fn test_policy_applies_to_submissions() {
    let verifier = LlmVerifier::new(MockProvider::new("{}"), VerifierConfig::default());
    let store = MythStore::open(MemoryBackend::new());
    let mut app = Ekmyth::new(store, verifier, SubmissionPolicy::strict());

    let result = app.submit(Draft::new("t", "c", "r")).await;
    assert!(matches!(result, Err(PipelineError::Validation(_))));
    assert!(app.list().is_empty());
}

#[test]
fn test_gemini_without_key_fails_to_open() {
    let mut config = mock_config(StorageConfig {
        backend: StorageKind::Memory,
        path: None,
        seed_examples: false,
    });
    config.llm.provider = ProviderKind::Gemini;
    config.llm.api_key_env = "EKMYTH_E2E_UNSET_KEY".to_string();

    assert!(matches!(
        ekmyth_app::open(&config),
        Err(AppError::MissingApiKey(_))
    ));
}
