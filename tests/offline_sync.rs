//! Offline queue and sync coordinator behavior through the public client

mod common;

use assert_matches::assert_matches;
use common::{expired_token, logged_in_client, memory_client, MockGateway, Reply};
use feedback_client::client::sync::{NetworkStatus, SyncOutcome, SyncWorker};
use feedback_client::client::{ClientError, SubmitOutcome};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_enqueue_order_and_distinct_ids() {
    let (client, _) = logged_in_client(Arc::new(MockGateway::new())).await;
    let queue = client.queue();

    let r1 = queue.enqueue("Teaching", "R1").await.unwrap();
    let r2 = queue.enqueue("Teaching", "R2").await.unwrap();
    let r3 = queue.enqueue("Library", "R3").await.unwrap();

    let all = queue.peek_all().await.unwrap();
    let texts: Vec<&str> = all.iter().map(|r| r.feedback_text.as_str()).collect();
    assert_eq!(texts, vec!["R1", "R2", "R3"]);
    assert_ne!(r1.local_id, r2.local_id);
    assert_ne!(r1.local_id, r3.local_id);
    assert_ne!(r2.local_id, r3.local_id);
}

#[tokio::test]
async fn test_sync_success_clears_queue() {
    let gateway = Arc::new(MockGateway::new());
    let (client, _) = logged_in_client(gateway.clone()).await;
    client.queue().enqueue("Teaching", "one").await.unwrap();
    client.queue().enqueue("Teaching", "two").await.unwrap();

    assert_eq!(client.sync().sync().await, SyncOutcome::Synced { count: 2 });
    assert!(client.queue().peek_all().await.unwrap().is_empty());

    let batches = gateway.synced_batches.lock().unwrap().clone();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[0][0]["status"], "unsynced");
    assert_eq!(batches[0][1]["feedback"], "two");
}

#[tokio::test]
async fn test_sync_failure_preserves_queue() {
    for reply in [Reply::Network, Reply::Status(500), Reply::Status(401)] {
        let gateway = Arc::new(MockGateway::new());
        gateway.set_sync_reply(reply);
        let (client, _) = logged_in_client(gateway.clone()).await;
        client.queue().enqueue("Teaching", "one").await.unwrap();
        client.queue().enqueue("Library", "two").await.unwrap();
        let before = client.queue().peek_all().await.unwrap();

        assert_matches!(client.sync().sync().await, SyncOutcome::Failed { .. });
        assert_eq!(client.queue().peek_all().await.unwrap(), before);
        assert_eq!(gateway.sync_count(), 1);
    }
}

#[tokio::test]
async fn test_sync_without_session_is_noop() {
    let gateway = Arc::new(MockGateway::new());
    let (client, _) = memory_client(gateway.clone());
    client.queue().enqueue("Teaching", "one").await.unwrap();

    assert_eq!(client.sync().sync().await, SyncOutcome::NoSession);
    assert_eq!(gateway.sync_count(), 0);
    assert_eq!(client.queue().len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_sync_with_expired_session_is_noop_and_purges() {
    let gateway = Arc::new(MockGateway::new());
    let (client, _) = memory_client(gateway.clone());
    client.session().save_session(&expired_token(), true).await.unwrap();
    client.queue().enqueue("Teaching", "one").await.unwrap();

    assert_eq!(client.sync().sync().await, SyncOutcome::NoSession);
    assert_eq!(gateway.sync_count(), 0);
    assert_eq!(client.queue().len().await.unwrap(), 1);
    assert_eq!(client.session().stored_token().await.unwrap(), None);
}

#[tokio::test]
async fn test_empty_queue_makes_no_call() {
    let gateway = Arc::new(MockGateway::new());
    let (client, _) = logged_in_client(gateway.clone()).await;

    assert_eq!(client.sync().sync().await, SyncOutcome::NothingToSync);
    assert_eq!(gateway.sync_count(), 0);
}

#[tokio::test]
async fn test_records_enqueued_mid_flight_survive() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_sync_reply(Reply::Delay(Duration::from_millis(200)));
    let (client, _) = logged_in_client(gateway.clone()).await;
    client.queue().enqueue("Teaching", "before").await.unwrap();

    let coordinator = client.sync();
    let in_flight = tokio::spawn(async move { coordinator.sync().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let late = client.queue().enqueue("Teaching", "during").await.unwrap();

    assert_eq!(in_flight.await.unwrap(), SyncOutcome::Synced { count: 1 });
    assert_eq!(client.queue().peek_all().await.unwrap(), vec![late]);
}

#[tokio::test]
async fn test_concurrent_syncs_submit_once() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_sync_reply(Reply::Delay(Duration::from_millis(100)));
    let (client, _) = logged_in_client(gateway.clone()).await;
    client.queue().enqueue("Teaching", "one").await.unwrap();
    client.queue().enqueue("Teaching", "two").await.unwrap();

    let first = client.sync();
    let second = client.sync();
    let (a, b) = tokio::join!(first.sync(), second.sync());

    let mut outcomes = vec![a, b];
    outcomes.sort_by_key(|o| matches!(o, SyncOutcome::NothingToSync));
    assert_eq!(
        outcomes,
        vec![SyncOutcome::Synced { count: 2 }, SyncOutcome::NothingToSync]
    );
    assert_eq!(gateway.sync_count(), 1);
}

#[tokio::test]
async fn test_sync_timeout_preserves_queue() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_sync_reply(Reply::Delay(Duration::from_secs(10)));
    let (client, _) = logged_in_client(gateway.clone()).await;
    client.queue().enqueue("Teaching", "slow").await.unwrap();

    let outcome = client.sync().sync().await;
    assert_matches!(outcome, SyncOutcome::Failed { ref reason } if reason.contains("timed out"));
    assert_eq!(client.queue().len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_sync_state_tracks_outcomes() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_sync_reply(Reply::Network);
    let (client, _) = logged_in_client(gateway.clone()).await;
    client.queue().enqueue("Teaching", "one").await.unwrap();

    client.sync().sync().await;
    let failed = client.sync().get_status().await;
    assert!(failed.last_error.is_some());
    assert!(failed.last_sync.is_none());
    assert_eq!(failed.pending_records, 1);

    gateway.set_sync_reply(Reply::Ok);
    client.sync().sync().await;
    let synced = client.sync().get_status().await;
    assert!(synced.last_error.is_none());
    assert!(synced.last_sync.is_some());
    assert_eq!(synced.pending_records, 0);
    assert!(!synced.is_syncing);
}

#[tokio::test]
async fn test_offline_submit_is_queued_and_replayed_on_reconnect() {
    let gateway = Arc::new(MockGateway::new());
    let (client, _) = logged_in_client(gateway.clone()).await;
    client.monitor().set_status(NetworkStatus::Offline);

    let outcome = client.feedback().submit("Teaching", "written offline").await.unwrap();
    assert_matches!(outcome, SubmitOutcome::Queued(_));
    assert_eq!(gateway.submit_count(), 0);

    let _worker = SyncWorker::start(client.sync());
    client.monitor().set_status(NetworkStatus::Online);

    tokio::time::timeout(Duration::from_secs(2), async {
        while !client.queue().is_empty().await.unwrap() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(gateway.sync_count(), 1);
}

#[tokio::test]
async fn test_online_transport_failure_is_queued() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_submit_reply(Reply::Network);
    let (client, _) = logged_in_client(gateway.clone()).await;

    let outcome = client.feedback().submit("Teaching", "flaky wifi").await.unwrap();
    assert_matches!(outcome, SubmitOutcome::Queued(ref record) if record.feedback_text == "flaky wifi");
    assert_eq!(gateway.submit_count(), 1);
    assert_eq!(client.queue().len().await.unwrap(), 1);
}

#[tokio::test]
async fn test_online_status_error_is_returned_not_queued() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_submit_reply(Reply::Status(400));
    let (client, _) = logged_in_client(gateway.clone()).await;

    let result = client.feedback().submit("Teaching", "rejected").await;
    assert_matches!(result, Err(ClientError::Status { status: 400, .. }));
    assert!(client.queue().is_empty().await.unwrap());
}

#[tokio::test]
async fn test_submit_clears_draft() {
    let gateway = Arc::new(MockGateway::new());
    let (client, _) = logged_in_client(gateway).await;
    let mut answers = std::collections::BTreeMap::new();
    answers.insert("Clarity".to_string(), "Good".to_string());
    client.feedback().save_draft("Teaching", &answers).await.unwrap();

    let outcome = client.feedback().submit("Teaching", "Clarity: Good").await.unwrap();
    assert_matches!(outcome, SubmitOutcome::Submitted(_));
    assert!(client.feedback().load_draft("Teaching").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_requires_session() {
    let gateway = Arc::new(MockGateway::new());
    let (client, _) = memory_client(gateway.clone());

    let result = client.feedback().submit("Teaching", "anonymous").await;
    assert_matches!(result, Err(ClientError::NotAuthenticated));
    assert_eq!(gateway.submit_count(), 0);
    assert!(client.queue().is_empty().await.unwrap());
}

#[tokio::test]
async fn test_concurrent_enqueues_all_persist() {
    let (client, _) = logged_in_client(Arc::new(MockGateway::new())).await;
    let queue = client.queue().clone();

    let tasks = (0..25).map(|i| {
        let queue = queue.clone();
        async move { queue.enqueue("Load", &format!("item {}", i)).await }
    });
    let results = futures_util::future::join_all(tasks).await;

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(queue.len().await.unwrap(), 25);
}

#[tokio::test]
async fn test_reconnect_during_failing_sync_triggers_another_sync() {
    let gateway = Arc::new(MockGateway::new());
    gateway.set_sync_reply(Reply::SlowNetwork(Duration::from_millis(200)));
    let (client, _) = logged_in_client(gateway.clone()).await;
    client.queue().enqueue("Teaching", "sent while flapping").await.unwrap();

    let _worker = SyncWorker::start(client.sync());

    tokio::time::sleep(Duration::from_millis(50)).await;
    client.monitor().set_status(NetworkStatus::Offline);
    tokio::time::sleep(Duration::from_millis(50)).await;
    gateway.set_sync_reply(Reply::Ok);
    client.monitor().set_status(NetworkStatus::Online);

    tokio::time::timeout(Duration::from_secs(2), async {
        while !client.queue().is_empty().await.unwrap() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(gateway.sync_count(), 2);
}
