//! Engine integration tests
//!
//! Exercise the restriction lifecycle across the core, store and service
//! crates using in-memory persistence.
//!
//! Run with: cargo test -p integration-tests --test engine_tests

use std::sync::Arc;

use tokio::sync::Barrier;

use bantools_core::{
    BanDuration, BanRecord, BanStore, DomainError, PlayerName, SoftBanRecord,
};
use bantools_service::{RestrictionSettings, SoftBanStep};
use chrono::{Duration, Utc};
use integration_tests::{identity, unique_name, FlakyStore, Kick, TestEngine};

fn is_not_found(err: &bantools_service::ServiceError) -> bool {
    err.as_domain().is_some_and(DomainError::is_not_found)
}

// ============================================================================
// Ban lifecycle
// ============================================================================

#[tokio::test]
async fn test_ban_then_unban_toggles_restriction() {
    let t = TestEngine::start().await;
    let name = unique_name("Player");
    let who = identity(&name, "any-id", "203.0.113.9");

    t.engine.ban(&name, Some("Cheating"), None).await.unwrap();
    assert!(t.engine.is_restricted(&who).await);

    t.engine.unban(&name).await.unwrap();
    assert!(!t.engine.is_restricted(&who).await);
    assert_eq!(t.engine.restriction_message(&who).await, "");
}

#[tokio::test]
async fn test_unban_twice_reports_not_found() {
    let t = TestEngine::start().await;
    t.engine.ban("Steve", None, None).await.unwrap();

    assert!(t.engine.unban("Steve").await.is_ok());
    let err = t.engine.unban("Steve").await.unwrap_err();
    assert!(is_not_found(&err));

    let err = t.engine.unban("NeverBanned").await.unwrap_err();
    assert!(is_not_found(&err));
}

#[tokio::test]
async fn test_ban_is_durable() {
    let t = TestEngine::start().await;
    t.engine.ban("Steve", Some("Griefing"), Some("30d")).await.unwrap();

    let stored = t.store.load_all_bans().await.unwrap();
    let record = stored.get("steve").expect("persisted under lowercase key");
    assert!(record.active);
    assert_eq!(record.reason, "Griefing");

    // A fresh engine over the same store sees the ban
    let restarted = TestEngine::start_with(Arc::clone(&t.store), RestrictionSettings::default()).await;
    assert!(restarted.engine.is_restricted(&identity("STEVE", "x", "y")).await);
}

#[tokio::test]
async fn test_ban_kicks_online_player_with_reason() {
    let t = TestEngine::start().await;
    t.sessions.join("Steve", "uuid-steve", "10.0.0.5");

    let record = t.engine.ban("steve", Some("Griefing"), None).await.unwrap();
    assert_eq!(record.id.as_deref(), Some("uuid-steve"));
    assert_eq!(record.address.as_deref(), Some("10.0.0.5"));
    assert_eq!(
        t.sessions.kicks(),
        vec![Kick {
            name: "steve".to_string(),
            message: "Griefing".to_string()
        }]
    );
}

#[tokio::test]
async fn test_protected_player_cannot_be_touched() {
    let t = TestEngine::start().await;
    t.sessions.join("Admin", "uuid-admin", "10.0.0.1");

    let err = t.engine.ban("admin", None, None).await.unwrap_err();
    assert!(err.as_domain().is_some_and(DomainError::is_protected));
    assert_eq!(err.to_string(), "This player is protected");

    assert!(t.engine.kick("Admin", None).is_err());
    assert!(t.engine.soft_ban_step("mod", "Owner", None).await.is_err());
    assert!(t.sessions.is_online("Admin"));
    assert!(t.engine.list_active_bans().is_empty());
}

// ============================================================================
// Matching
// ============================================================================

#[tokio::test]
async fn test_name_match_learns_identity() {
    let t = TestEngine::start().await;
    t.engine.ban("Foo", None, None).await.unwrap();

    let stored = t.store.load_all_bans().await.unwrap();
    assert_eq!(stored["foo"].id, None);

    assert!(t.engine.is_restricted(&identity("foo", "X", "1.2.3.4")).await);

    let stored = t.store.load_all_bans().await.unwrap();
    assert_eq!(stored["foo"].id.as_deref(), Some("X"));
    assert_eq!(stored["foo"].address.as_deref(), Some("1.2.3.4"));

    // The learned id now catches a renamed account
    assert!(t.engine.is_restricted(&identity("Bar", "X", "5.6.7.8")).await);
}

#[tokio::test]
async fn test_unknown_identity_never_matches() {
    let t = TestEngine::start().await;
    t.engine.ban("Foo", None, None).await.unwrap();

    // Neither id nor address is known yet, so only the name can match
    assert!(!t.engine.is_restricted(&identity("Bar", "X", "1.2.3.4")).await);
}

#[tokio::test]
async fn test_expired_ban_is_ignored_before_any_sweep() {
    let store = Arc::new(FlakyStore::new());
    let now = Utc::now();
    let name = PlayerName::parse("Expired").unwrap();
    let record = BanRecord::new(
        &name,
        "old",
        BanDuration::Until(now - Duration::seconds(1)),
        now - Duration::days(1),
    );
    store.inner().save_ban(&record).await.unwrap();

    let t = TestEngine::start_with(store, RestrictionSettings::default()).await;
    assert!(!t.engine.is_restricted(&identity("Expired", "a", "b")).await);
    assert!(t.engine.list_active_bans().is_empty());
}

#[tokio::test]
async fn test_soft_ban_restricts_and_reports_remaining_time() {
    let store = Arc::new(FlakyStore::new());
    let now = Utc::now();
    let name = PlayerName::parse("Sam").unwrap();
    let record = SoftBanRecord::new(&name, "cool off", Duration::minutes(90), now);
    store.inner().save_soft_ban(&record).await.unwrap();

    let t = TestEngine::start_with(store, RestrictionSettings::default()).await;
    let message = t.engine.restriction_message(&identity("sam", "a", "b")).await;
    assert!(message.starts_with("You have been temporarily banned!"));
    assert!(message.contains("cool off"));
    assert!(message.contains("hour"));
}

// ============================================================================
// Durations
// ============================================================================

#[tokio::test]
async fn test_duration_parsing_through_ban() {
    let t = TestEngine::start().await;

    let week = t.engine.ban("Week", None, Some("7d")).await.unwrap();
    assert_eq!(week.expires_at, Some(week.created_at + Duration::days(7)));

    for (player, input) in [("TooLong", "9999d"), ("Zero", "0d"), ("Garbage", "invalid")] {
        let record = t.engine.ban(player, None, Some(input)).await.unwrap();
        assert_eq!(
            record.expires_at,
            Some(record.created_at + Duration::days(1)),
            "{input} should fall back to one day"
        );
    }

    let permanent = t.engine.ban("Forever", None, Some("permanent")).await.unwrap();
    assert!(permanent.is_permanent());
}

// ============================================================================
// Soft-ban confirmation
// ============================================================================

#[tokio::test]
async fn test_soft_ban_confirmation_flow() {
    let t = TestEngine::start().await;
    let p = identity("P", "id-p", "10.1.1.1");

    let first = t.engine.soft_ban_step("A", "P", Some("x")).await.unwrap();
    assert!(matches!(first, SoftBanStep::ConfirmationRequired { .. }));
    assert!(!t.engine.is_restricted(&p).await);

    let second = t.engine.soft_ban_step("A", "P", Some("x")).await.unwrap();
    assert!(second.is_executed());
    assert!(t.engine.is_restricted(&p).await);

    // Repeating after execution is a duplicate, not a new confirmation
    let err = t.engine.soft_ban_step("A", "P", Some("x")).await.unwrap_err();
    assert!(err.as_domain().is_some_and(DomainError::is_duplicate_active));
}

#[tokio::test]
async fn test_confirmation_restarts_after_timeout() {
    let t = TestEngine::with_confirmation_timeout(Duration::milliseconds(50)).await;
    let p = identity("P", "id-p", "10.1.1.1");

    let first = t.engine.soft_ban_step("A", "P", None).await.unwrap();
    assert!(!first.is_executed());

    tokio::time::sleep(std::time::Duration::from_millis(120)).await;

    let again = t.engine.soft_ban_step("A", "P", None).await.unwrap();
    assert!(matches!(again, SoftBanStep::ConfirmationRequired { .. }));
    assert!(!t.engine.is_restricted(&p).await);
}

#[tokio::test]
async fn test_admins_confirm_independently() {
    let t = TestEngine::start().await;

    let a = t.engine.soft_ban_step("A", "P", None).await.unwrap();
    let b = t.engine.soft_ban_step("B", "P", None).await.unwrap();
    assert!(!a.is_executed());
    assert!(!b.is_executed());
    assert!(t.engine.list_active_soft_bans().is_empty());

    let b = t.engine.soft_ban_step("B", "P", None).await.unwrap();
    assert!(b.is_executed());
    assert_eq!(t.engine.list_active_soft_bans(), vec!["P".to_string()]);
}

#[tokio::test]
async fn test_remove_soft_ban() {
    let t = TestEngine::start().await;
    t.engine.soft_ban_step("A", "P", None).await.unwrap();
    t.engine.soft_ban_step("A", "P", None).await.unwrap();

    t.engine.remove_soft_ban("p").await.unwrap();
    assert!(!t.engine.is_restricted(&identity("P", "a", "b")).await);

    let err = t.engine.remove_soft_ban("p").await.unwrap_err();
    assert!(is_not_found(&err));
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_soft_ban_steps_execute_once() {
    for _ in 0..20 {
        let t = TestEngine::start().await;
        let engine = Arc::new(t.engine);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    engine.soft_ban_step("A", "P", Some("x")).await.unwrap()
                })
            })
            .collect();

        let mut executed = 0;
        for handle in handles {
            if handle.await.unwrap().is_executed() {
                executed += 1;
            }
        }
        assert_eq!(executed, 1);
        assert!(engine.is_restricted(&identity("P", "id-p", "10.1.1.1")).await);
        assert_eq!(engine.list_active_soft_bans(), vec!["P".to_string()]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_bans_admit_one() {
    for _ in 0..20 {
        let t = TestEngine::start().await;
        let engine = Arc::new(t.engine);
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let barrier = Arc::clone(&barrier);
                tokio::spawn(async move {
                    barrier.wait().await;
                    engine.ban("Steve", Some("Griefing"), None).await
                })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let err = outcomes.into_iter().find_map(Result::err).unwrap();
        assert!(matches!(
            err.as_domain(),
            Some(DomainError::AlreadyBanned { .. })
        ));
        assert_eq!(t.store.load_all_bans().await.unwrap().len(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_see_bans_during_reload() {
    let t = TestEngine::start().await;
    let engine = Arc::new(t.engine);
    engine.ban("Steve", None, None).await.unwrap();
    let steve = identity("Steve", "id-steve", "10.0.0.5");

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            let steve = steve.clone();
            tokio::spawn(async move {
                for _ in 0..200 {
                    assert!(engine.is_restricted(&steve).await);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for _ in 0..50 {
        engine.reload().await.unwrap();
    }
    for reader in readers {
        reader.await.unwrap();
    }
    assert_eq!(engine.list_active_bans(), vec!["Steve".to_string()]);
}

// ============================================================================
// Persistence failures
// ============================================================================

#[tokio::test]
async fn test_failed_write_leaves_index_unchanged() {
    let store = Arc::new(FlakyStore::new());
    let t = TestEngine::start_with(
        Arc::clone(&store) as Arc<dyn BanStore>,
        RestrictionSettings::default(),
    )
    .await;

    store.fail_writes(true);
    let err = t.engine.ban("Steve", None, None).await.unwrap_err();
    assert!(err.as_domain().is_some_and(DomainError::is_persistence));
    assert!(!t.engine.is_restricted(&identity("Steve", "a", "b")).await);
    assert!(t.engine.list_active_bans().is_empty());

    store.fail_writes(false);
    t.engine.ban("Steve", None, None).await.unwrap();

    store.fail_writes(true);
    assert!(t.engine.unban("Steve").await.is_err());
    assert!(t.engine.is_restricted(&identity("Steve", "a", "b")).await);
}

#[tokio::test]
async fn test_failed_soft_ban_write_reports_failure() {
    let store = Arc::new(FlakyStore::new());
    let t = TestEngine::start_with(
        Arc::clone(&store) as Arc<dyn BanStore>,
        RestrictionSettings::default(),
    )
    .await;

    t.engine.soft_ban_step("A", "P", None).await.unwrap();
    store.fail_writes(true);
    assert!(t.engine.soft_ban_step("A", "P", None).await.is_err());
    assert!(t.engine.list_active_soft_bans().is_empty());
}
