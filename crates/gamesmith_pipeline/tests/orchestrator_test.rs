//! End-to-end pipeline tests with stub backends and a temporary store.

use async_trait::async_trait;
use gamesmith_core::{
    Artifact, ArtifactContent, ArtifactId, FailureKind, GenerationStatus, PromptPolicy,
};
use gamesmith_error::{GatewayErrorKind, StorageError, StorageErrorKind};
use gamesmith_models::StubGenerator;
use gamesmith_pipeline::Orchestrator;
use gamesmith_storage::{ArtifactStorage, FileSystemStorage};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const DOC: &str = "<!DOCTYPE html>\n<html>\n<head><title>Fractions</title></head>\n<body><h1>Pizza Fractions</h1></body>\n</html>";
const PROMPT: &str = "A pizza-slicing game that teaches fractions";

fn setup(stub: &StubGenerator) -> anyhow::Result<(Orchestrator, TempDir)> {
    let temp = TempDir::new()?;
    let storage = FileSystemStorage::new(temp.path())?;
    let orchestrator = Orchestrator::new(
        Arc::new(stub.clone()),
        Arc::new(storage),
        PromptPolicy::default(),
    );
    Ok((orchestrator, temp))
}

/// Every regular file under `root`, recursively.
fn stored_files(root: &Path) -> Vec<std::path::PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).unwrap().flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

fn failure(result: &gamesmith_core::GenerationResult) -> (FailureKind, String) {
    match result.status() {
        GenerationStatus::Failed { kind, reason } => (*kind, reason.clone()),
        GenerationStatus::Succeeded => panic!("expected failure, got {:?}", result),
    }
}

#[tokio::test]
async fn test_generate_then_play_returns_identical_bytes() -> anyhow::Result<()> {
    let stub = StubGenerator::respond(DOC);
    let (orchestrator, _temp) = setup(&stub)?;

    let result = orchestrator.handle_generate(PROMPT).await;
    assert!(result.is_success());
    let id = result.identifier().expect("identifier on success");

    let content = orchestrator.handle_play(&id.to_string()).await?;
    assert_eq!(content.as_bytes(), DOC.as_bytes());
    assert_eq!(stub.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_fenced_response_stores_only_document() -> anyhow::Result<()> {
    let response = format!(
        "Here's your game! Enjoy.\n\n```html\n{}\n```\n\nI hope your students like it.",
        DOC
    );
    let (orchestrator, _temp) = setup(&StubGenerator::respond(response))?;

    let result = orchestrator.handle_generate(PROMPT).await;
    let id = result.identifier().expect("identifier on success");

    let content = orchestrator.handle_play(&id.to_string()).await?;
    let text = String::from_utf8(content.into_bytes())?;
    assert_eq!(text, DOC);
    assert!(!text.contains("Enjoy"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_prompt_never_calls_backend() -> anyhow::Result<()> {
    let stub = StubGenerator::respond(DOC);
    let (orchestrator, temp) = setup(&stub)?;

    let long = "x".repeat(1001);
    for prompt in ["", "   \n\t", "too short", long.as_str()] {
        let result = orchestrator.handle_generate(prompt).await;
        assert_eq!(result.failure_kind(), Some(FailureKind::InvalidPrompt));
        assert!(result.identifier().is_none());
    }

    assert_eq!(stub.call_count(), 0);
    assert!(stored_files(temp.path()).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_timeout_stores_nothing() -> anyhow::Result<()> {
    let stub = StubGenerator::delayed(Duration::from_secs(10), DOC)
        .with_timeout(Duration::from_millis(50));
    let (orchestrator, temp) = setup(&stub)?;

    let result = orchestrator.handle_generate(PROMPT).await;
    let (kind, _) = failure(&result);

    assert_eq!(kind, FailureKind::Timeout);
    assert!(result.identifier().is_none());
    assert!(stored_files(temp.path()).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_gateway_failures_map_to_kinds() -> anyhow::Result<()> {
    let cases = [
        (
            GatewayErrorKind::QuotaExceeded("Resource has been exhausted".to_string()),
            FailureKind::QuotaExceeded,
        ),
        (
            GatewayErrorKind::Unavailable("HTTP 503: overloaded".to_string()),
            FailureKind::Unavailable,
        ),
        (
            GatewayErrorKind::MalformedResponse("no candidates".to_string()),
            FailureKind::MalformedResponse,
        ),
    ];

    for (gateway_kind, expected) in cases {
        let stub = StubGenerator::fail(gateway_kind);
        let (orchestrator, temp) = setup(&stub)?;

        let result = orchestrator.handle_generate(PROMPT).await;
        assert_eq!(result.failure_kind(), Some(expected));
        assert_eq!(stub.call_count(), 1, "no retries");
        assert!(stored_files(temp.path()).is_empty());
    }
    Ok(())
}

#[tokio::test]
async fn test_prose_response_is_malformed_and_not_stored() -> anyhow::Result<()> {
    let stub = StubGenerator::respond("I'm sorry, I can't create that game right now.");
    let (orchestrator, temp) = setup(&stub)?;

    let result = orchestrator.handle_generate(PROMPT).await;
    let (kind, reason) = failure(&result);

    assert_eq!(kind, FailureKind::MalformedResponse);
    assert!(!reason.is_empty());
    assert!(stored_files(temp.path()).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_truncated_document_is_malformed() -> anyhow::Result<()> {
    let stub = StubGenerator::respond("```html\n<!DOCTYPE html><html><body><script>let score =");
    let (orchestrator, _temp) = setup(&stub)?;

    let result = orchestrator.handle_generate(PROMPT).await;
    assert_eq!(result.failure_kind(), Some(FailureKind::MalformedResponse));
    Ok(())
}

#[tokio::test]
async fn test_truncated_draft_then_correction_is_malformed() -> anyhow::Result<()> {
    let response = format!(
        "```html\n<!DOCTYPE html><html><body>draft, cut off\n```\nOops, here is the fixed version:\n```html\n{}\n```",
        DOC
    );
    let (orchestrator, temp) = setup(&StubGenerator::respond(response))?;

    let result = orchestrator.handle_generate(PROMPT).await;
    assert_eq!(result.failure_kind(), Some(FailureKind::MalformedResponse));
    assert!(stored_files(temp.path()).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_play_unknown_identifier_is_not_found() -> anyhow::Result<()> {
    let (orchestrator, _temp) = setup(&StubGenerator::echo())?;

    let missing = ArtifactId::generate().to_string();
    for identifier in [
        missing.as_str(),
        "",
        "not-an-id",
        "../../etc/passwd",
        "..%2F..%2Fetc%2Fpasswd",
        "3F2A9C1E-0B7D-4C55-9A0E-6F1D2B3C4D5E",
    ] {
        let err = orchestrator.handle_play(identifier).await.unwrap_err();
        assert!(err.is_not_found(), "{:?} -> {}", identifier, err);
    }
    Ok(())
}

#[tokio::test]
async fn test_concurrent_generations_get_distinct_ids() -> anyhow::Result<()> {
    let stub = StubGenerator::echo();
    let (orchestrator, _temp) = setup(&stub)?;
    let orchestrator = Arc::new(orchestrator);

    let mut tasks = tokio::task::JoinSet::new();
    for n in 0..16 {
        let orchestrator = orchestrator.clone();
        tasks.spawn(async move {
            orchestrator
                .handle_generate(&format!("A counting game, variant number {}", n))
                .await
        });
    }

    let mut ids = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        let result = result?;
        let id = result.identifier().expect("identifier on success");
        let content = orchestrator.handle_play(&id.to_string()).await?;
        assert!(String::from_utf8(content.into_bytes())?.contains("A counting game"));
        ids.insert(id);
    }

    assert_eq!(ids.len(), 16);
    assert_eq!(stub.call_count(), 16);
    Ok(())
}

/// Store whose medium always fails.
struct BrokenStorage;

#[async_trait]
impl ArtifactStorage for BrokenStorage {
    async fn save(&self, _content: &ArtifactContent) -> Result<ArtifactId, StorageError> {
        Err(StorageError::new(StorageErrorKind::FileWrite(
            "/srv/games/ab/.abc.html.tmp: No space left on device".to_string(),
        )))
    }

    async fn load(&self, identifier: &str) -> Result<ArtifactContent, StorageError> {
        Err(StorageError::new(StorageErrorKind::NotFound(
            identifier.to_string(),
        )))
    }

    async fn load_artifact(&self, identifier: &str) -> Result<Artifact, StorageError> {
        Err(StorageError::new(StorageErrorKind::NotFound(
            identifier.to_string(),
        )))
    }

    async fn exists(&self, _identifier: &str) -> Result<bool, StorageError> {
        Ok(false)
    }
}

#[tokio::test]
async fn test_storage_failure_is_reported_without_paths() {
    let orchestrator = Orchestrator::new(
        Arc::new(StubGenerator::respond(DOC)),
        Arc::new(BrokenStorage),
        PromptPolicy::default(),
    );

    let result = orchestrator.handle_generate(PROMPT).await;
    let (kind, reason) = failure(&result);

    assert_eq!(kind, FailureKind::StorageFailure);
    assert!(result.identifier().is_none());
    assert!(!reason.contains("/srv/games"));
}

#[tokio::test]
async fn test_custom_policy_is_applied() -> anyhow::Result<()> {
    let temp = TempDir::new()?;
    let stub = StubGenerator::echo();
    let orchestrator = Orchestrator::new(
        Arc::new(stub.clone()),
        Arc::new(FileSystemStorage::new(temp.path())?),
        PromptPolicy {
            min_chars: 1,
            max_chars: 5,
        },
    );

    assert!(orchestrator.handle_generate("quiz").await.is_success());
    assert_eq!(
        orchestrator.handle_generate("a long prompt").await.failure_kind(),
        Some(FailureKind::InvalidPrompt)
    );
    assert_eq!(stub.call_count(), 1);
    Ok(())
}
