use std::collections::HashSet;
use std::sync::Arc;

use shutoff_core::AppError;
use shutoff_domain::{RemediationToken, ResourceKind};

use super::RemediationTokenService;
use crate::RemediationRecord;
use crate::test_support::FakeRemediationRepository;

#[tokio::test]
async fn create_then_resolve_returns_the_original_request_for_every_kind() {
    let repository = Arc::new(FakeRemediationRepository::default());
    let service = RemediationTokenService::new(repository);

    for kind in ResourceKind::all() {
        let token = service.create(*kind, "resource-1", "r1").await;
        assert!(token.is_ok());
        let token = token.unwrap_or_else(|_| unreachable!());

        let request = service.resolve(&token).await;
        assert!(request.is_ok());
        let request = request.unwrap_or_else(|_| unreachable!());
        assert_eq!(request.token(), &token);
        assert_eq!(request.kind(), *kind);
        assert_eq!(request.resource_id(), "resource-1");
        assert_eq!(request.region(), "r1");
    }
}

#[tokio::test]
async fn repeated_creates_issue_distinct_tokens() {
    let repository = Arc::new(FakeRemediationRepository::default());
    let service = RemediationTokenService::new(repository.clone());

    let mut tokens = HashSet::new();
    for index in 0..50 {
        let resource_id = format!("i-{index}");
        let token = service
            .create(ResourceKind::Compute, resource_id.as_str(), "r1")
            .await;
        assert!(token.is_ok());
        tokens.insert(token.unwrap_or_else(|_| unreachable!()));
    }

    assert_eq!(tokens.len(), 50);
    assert_eq!(repository.records.lock().await.len(), 50);

    for token in &tokens {
        let request = service.resolve(token).await;
        assert!(request.is_ok());
        let request = request.unwrap_or_else(|_| unreachable!());
        let stored = repository
            .records
            .lock()
            .await
            .get(token.as_str())
            .map(|record| record.resource_id.clone());
        assert_eq!(stored.as_deref(), Some(request.resource_id()));
    }
}

#[tokio::test]
async fn create_stamps_records_with_storage_values() {
    let repository = Arc::new(FakeRemediationRepository::default());
    let service = RemediationTokenService::new(repository.clone());

    let token = service.create(ResourceKind::Notebook, "analysis", "r2").await;
    assert!(token.is_ok());
    let token = token.unwrap_or_else(|_| unreachable!());

    let record = repository.records.lock().await.get(token.as_str()).cloned();
    assert!(record.is_some());
    let record = record.unwrap_or_else(|| unreachable!());
    assert_eq!(record.kind, "sagemaker");
    assert_eq!(record.resource_id, "analysis");
    assert_eq!(record.region, "r2");
    assert!(record.created_at.is_some());
}

#[tokio::test]
async fn colliding_token_is_regenerated() {
    let repository = Arc::new(FakeRemediationRepository::default());
    *repository.conflicts_remaining.lock().await = 2;
    let service = RemediationTokenService::new(repository.clone());

    let token = service.create(ResourceKind::Compute, "i-1", "r1").await;
    assert!(token.is_ok());
    assert_eq!(*repository.insert_attempts.lock().await, 3);
    assert_eq!(repository.records.lock().await.len(), 1);
}

#[tokio::test]
async fn persistent_collisions_give_up() {
    let repository = Arc::new(FakeRemediationRepository::default());
    *repository.conflicts_remaining.lock().await = 10;
    let service = RemediationTokenService::new(repository.clone());

    let token = service.create(ResourceKind::Compute, "i-1", "r1").await;
    assert!(matches!(token, Err(AppError::Internal(_))));
    assert_eq!(*repository.insert_attempts.lock().await, 3);
}

#[tokio::test]
async fn storage_failure_is_propagated() {
    let service = RemediationTokenService::new(Arc::new(FakeRemediationRepository::failing()));

    let created = service.create(ResourceKind::Compute, "i-1", "r1").await;
    assert!(matches!(created, Err(AppError::Internal(_))));

    let token = RemediationToken::parse("abc");
    assert!(token.is_ok());
    let resolved = service
        .resolve(&token.unwrap_or_else(|_| unreachable!()))
        .await;
    assert!(matches!(resolved, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn unknown_token_is_not_found() {
    let service = RemediationTokenService::new(Arc::new(FakeRemediationRepository::default()));

    let token = RemediationToken::parse("never-created");
    assert!(token.is_ok());
    let resolved = service
        .resolve(&token.unwrap_or_else(|_| unreachable!()))
        .await;
    assert!(matches!(resolved, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn stored_unknown_kind_resolves_as_unsupported() {
    let repository = Arc::new(FakeRemediationRepository::default());
    repository.records.lock().await.insert(
        "legacy-token".to_owned(),
        RemediationRecord {
            request_id: "legacy-token".to_owned(),
            kind: "rds".to_owned(),
            resource_id: "db-1".to_owned(),
            region: "r1".to_owned(),
            created_at: None,
        },
    );
    let service = RemediationTokenService::new(repository);

    let token = RemediationToken::parse("legacy-token");
    assert!(token.is_ok());
    let resolved = service
        .resolve(&token.unwrap_or_else(|_| unreachable!()))
        .await;
    assert!(matches!(resolved, Err(AppError::Unsupported(_))));
}

#[tokio::test]
async fn stored_record_without_instance_is_an_integrity_error() {
    let repository = Arc::new(FakeRemediationRepository::default());
    repository.records.lock().await.insert(
        "broken-token".to_owned(),
        RemediationRecord {
            request_id: "broken-token".to_owned(),
            kind: "ec2".to_owned(),
            resource_id: String::new(),
            region: "r1".to_owned(),
            created_at: None,
        },
    );
    let service = RemediationTokenService::new(repository);

    let token = RemediationToken::parse("broken-token");
    assert!(token.is_ok());
    let resolved = service
        .resolve(&token.unwrap_or_else(|_| unreachable!()))
        .await;
    assert!(matches!(resolved, Err(AppError::Internal(_))));
}
