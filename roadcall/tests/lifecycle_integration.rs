//! End-to-end tests for the dispatch lifecycle: nearby search, explicit
//! transitions, and proximity-driven autonomous completion racing manual
//! actions.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use roadcall::actor::{Actor, PartyId};
use roadcall::events::{CompletionTrigger, RequestEvent};
use roadcall::request::{RequestStatus, ServiceCategory};
use roadcall::service::{DispatchService, ServiceConfig, ServiceError};
use roadcall::watcher::ProximityWatcherConfig;

/// Requester's spot for every scenario (Bangalore).
const REQUESTER: (f64, f64) = (12.9716, 77.5946);
/// Provider start position, ~680m from the requester.
const PROVIDER_FAR: (f64, f64) = (12.9760, 77.5990);
/// Position ~40m north of the requester, inside the 50m threshold.
const PROVIDER_NEAR: (f64, f64) = (12.97196, 77.5946);

fn service_with_fast_watcher() -> DispatchService {
    DispatchService::new(
        ServiceConfig::builder()
            .watcher(ProximityWatcherConfig {
                eval_interval: Duration::from_millis(20),
                ..Default::default()
            })
            .build(),
    )
}

async fn wait_for_status(
    service: &DispatchService,
    id: roadcall::request::RequestId,
    status: RequestStatus,
) -> bool {
    for _ in 0..50 {
        if service.get_request(id).unwrap().status == status {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_proximity_completion_scenario() {
    let service = service_with_fast_watcher();
    service
        .upsert_provider("m1", PROVIDER_FAR.0, PROVIDER_FAR.1, true, vec![])
        .unwrap();

    // Requester discovers the provider by search
    let nearby = service
        .find_nearby_providers(REQUESTER.0, REQUESTER.1)
        .unwrap();
    assert_eq!(nearby.len(), 1);
    assert!(nearby[0].1 > 600.0 && nearby[0].1 < 760.0);

    let request = service
        .create_request(
            "u1",
            "m1",
            REQUESTER.0,
            REQUESTER.1,
            ServiceCategory::Puncture,
        )
        .unwrap();
    assert_eq!(request.status, RequestStatus::Pending);

    let mut rx = service.subscribe();
    let token = CancellationToken::new();
    let handle = service.spawn_watcher(token.clone());

    // Provider accepts; watcher ticks while still 680m out must not complete
    service
        .transition(request.id, &Actor::provider("m1"), RequestStatus::Accepted)
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(
        service.get_request(request.id).unwrap().status,
        RequestStatus::Accepted
    );

    // Provider closes to within 40m; the next tick completes the request
    service
        .update_provider_location(&PartyId::new("m1"), PROVIDER_NEAR.0, PROVIDER_NEAR.1)
        .unwrap();
    assert!(wait_for_status(&service, request.id, RequestStatus::Completed).await);

    // Exactly one proximity-triggered Completed event
    let mut completions = 0;
    while let Ok(event) = rx.try_recv() {
        if let RequestEvent::Completed { trigger, .. } = event {
            assert_eq!(trigger, CompletionTrigger::Proximity);
            completions += 1;
        }
    }
    assert_eq!(completions, 1);

    // A subsequent manual completion is a terminal-state InvalidTransition
    let result = service.transition(request.id, &Actor::provider("m1"), RequestStatus::Completed);
    assert_eq!(
        result,
        Err(ServiceError::InvalidTransition {
            from: RequestStatus::Completed,
            to: RequestStatus::Completed,
        })
    );

    token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_watcher_never_completes_beyond_threshold() {
    let service = service_with_fast_watcher();
    service
        .upsert_provider("m1", PROVIDER_FAR.0, PROVIDER_FAR.1, true, vec![])
        .unwrap();
    let request = service
        .create_request(
            "u1",
            "m1",
            REQUESTER.0,
            REQUESTER.1,
            ServiceCategory::EngineIssue,
        )
        .unwrap();
    service
        .transition(request.id, &Actor::provider("m1"), RequestStatus::Accepted)
        .unwrap();

    let token = CancellationToken::new();
    let handle = service.spawn_watcher(token.clone());

    // Many ticks at 680m: the request must stay accepted
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(
        service.get_request(request.id).unwrap().status,
        RequestStatus::Accepted
    );

    token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_cancellation_beats_late_accept() {
    let service = DispatchService::with_defaults();
    service
        .upsert_provider("m1", PROVIDER_FAR.0, PROVIDER_FAR.1, true, vec![])
        .unwrap();
    let request = service
        .create_request(
            "u1",
            "m1",
            REQUESTER.0,
            REQUESTER.1,
            ServiceCategory::FuelProblem,
        )
        .unwrap();

    service
        .transition(request.id, &Actor::requester("u1"), RequestStatus::Cancelled)
        .unwrap();

    let result = service.transition(request.id, &Actor::provider("m1"), RequestStatus::Accepted);
    assert_eq!(
        result,
        Err(ServiceError::InvalidTransition {
            from: RequestStatus::Cancelled,
            to: RequestStatus::Accepted,
        })
    );
}

#[tokio::test]
async fn test_at_most_one_winner_across_racers() {
    let service = Arc::new(DispatchService::with_defaults());
    service
        .upsert_provider("m1", PROVIDER_FAR.0, PROVIDER_FAR.1, true, vec![])
        .unwrap();
    let request = service
        .create_request(
            "u1",
            "m1",
            REQUESTER.0,
            REQUESTER.1,
            ServiceCategory::BrakeFailure,
        )
        .unwrap();

    // N concurrent explicit transitions out of pending: provider accepts
    // race requester cancellations on the same (request, pending) pair.
    let mut handles = Vec::new();
    for i in 0..16 {
        let service = Arc::clone(&service);
        let id = request.id;
        handles.push(tokio::task::spawn_blocking(move || {
            if i % 2 == 0 {
                service.transition(id, &Actor::provider("m1"), RequestStatus::Accepted)
            } else {
                service.transition(id, &Actor::requester("u1"), RequestStatus::Cancelled)
            }
        }));
    }

    let mut winners = 0;
    for handle in handles {
        let result = handle.await.unwrap();
        match result {
            Ok(_) => winners += 1,
            Err(ServiceError::ConflictingStatus { .. }) => {}
            // Racers that read the store after the winner wrote see the
            // new status already at authorization time.
            Err(ServiceError::InvalidTransition { .. }) => {}
            Err(ServiceError::Unauthorized { .. }) => {}
            Err(other) => panic!("unexpected failure: {:?}", other),
        }
    }
    assert_eq!(winners, 1, "exactly one racer may move the request");

    let final_status = service.get_request(request.id).unwrap().status;
    assert!(matches!(
        final_status,
        RequestStatus::Accepted | RequestStatus::Cancelled
    ));
}

#[tokio::test]
async fn test_watcher_race_with_manual_completion() {
    // Manual completion and the proximity trigger race on the same
    // (request, accepted) pair; the loser must observe the conflict and
    // the Completed event must fire exactly once.
    let service = service_with_fast_watcher();
    service
        .upsert_provider("m1", PROVIDER_NEAR.0, PROVIDER_NEAR.1, true, vec![])
        .unwrap();
    let request = service
        .create_request(
            "u1",
            "m1",
            REQUESTER.0,
            REQUESTER.1,
            ServiceCategory::BatteryIssue,
        )
        .unwrap();
    service
        .transition(request.id, &Actor::provider("m1"), RequestStatus::Accepted)
        .unwrap();

    let mut rx = service.subscribe();
    let token = CancellationToken::new();
    let handle = service.spawn_watcher(token.clone());

    // The provider is already inside the threshold, so the watcher may win
    // before this manual call lands. Both outcomes are legal; silent
    // double-completion is not.
    let manual = service.transition(request.id, &Actor::provider("m1"), RequestStatus::Completed);
    match manual {
        Ok(_) => {}
        Err(ServiceError::ConflictingStatus { .. }) => {}
        Err(ServiceError::InvalidTransition { .. }) => {}
        Err(other) => panic!("unexpected failure: {:?}", other),
    }

    assert!(wait_for_status(&service, request.id, RequestStatus::Completed).await);
    // Let any stray watcher cycle run before counting events
    tokio::time::sleep(Duration::from_millis(100)).await;

    let mut completions = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, RequestEvent::Completed { .. }) {
            completions += 1;
        }
    }
    assert_eq!(completions, 1, "completion must be observable exactly once");

    token.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_deleted_request_mid_watch_is_harmless() {
    let service = service_with_fast_watcher();
    service
        .upsert_provider("m1", PROVIDER_NEAR.0, PROVIDER_NEAR.1, true, vec![])
        .unwrap();
    let request = service
        .create_request(
            "u1",
            "m1",
            REQUESTER.0,
            REQUESTER.1,
            ServiceCategory::Other("Locked out".to_string()),
        )
        .unwrap();
    service
        .transition(request.id, &Actor::provider("m1"), RequestStatus::Accepted)
        .unwrap();

    let token = CancellationToken::new();
    let handle = service.spawn_watcher(token.clone());

    // Deleting while the watcher is running must not wedge the loop
    service
        .delete_request(request.id, &Actor::provider("m1"))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(
        service.get_request(request.id),
        Err(ServiceError::RequestNotFound(request.id))
    );

    token.cancel();
    handle.await.unwrap();
}
