//! Proxy integration tests
//!
//! Wire the full proxy state from configuration and drive it the way the
//! console does.
//!
//! Run with: cargo test -p integration-tests --test proxy_tests

use std::path::PathBuf;

use bantools_common::StorageBackend;
use bantools_core::{OnlinePlayer, SessionDirectory};
use bantools_proxy::server::{create_proxy_state, run_console};
use bantools_proxy::{ReplyKind, SessionEvent};
use integration_tests::memory_config;
use tokio::sync::mpsc;

fn no_config_file() -> PathBuf {
    PathBuf::from("missing/bantools.toml")
}

fn player(name: &str, id: &str) -> OnlinePlayer {
    OnlinePlayer {
        name: name.to_string(),
        id: id.to_string(),
        address: "192.0.2.10".to_string(),
    }
}

#[tokio::test]
async fn test_console_script_bans_and_refuses_login() {
    let state = create_proxy_state(memory_config(), no_config_file())
        .await
        .expect("proxy state");

    let script = b"connect Steve id-1 192.0.2.10\n\
                   bt ban Steve Cheating\n\
                   connect Steve id-1 192.0.2.10\n\
                   bt softban Alex\n";
    run_console(&state, &script[..]).await.expect("console");

    assert_eq!(state.engine().list_active_bans(), vec!["Steve".to_string()]);
    assert!(state.engine().list_active_soft_bans().is_empty());
    assert_eq!(state.players().session_count(), 0);
}

#[tokio::test]
async fn test_login_guard_and_kick_flow() {
    let state = create_proxy_state(memory_config(), no_config_file())
        .await
        .expect("proxy state");

    let (tx, mut rx) = mpsc::channel(4);
    let session = state
        .login()
        .login(player("Alex", "id-alex"), tx)
        .await
        .expect("allowed");
    assert_eq!(state.players().all_online_names(), vec!["Alex".to_string()]);

    let first = state.dispatcher().dispatch("Admin", "bt softban alex").await;
    assert_eq!(first.kind, ReplyKind::Info);
    let second = state.dispatcher().dispatch("Admin", "bt softban alex").await;
    assert!(second.is_success());

    assert_eq!(
        rx.recv().await,
        Some(SessionEvent::Disconnect {
            message: "Temporarily kicked, please try again later".to_string()
        })
    );
    assert!(state.players().get_session(session.session_id()).is_none());

    // Identity captured while online catches the same account under a new name
    let (tx, _rx) = mpsc::channel(4);
    let refused = state
        .login()
        .login(player("Alex2", "id-alex"), tx)
        .await
        .expect_err("refused");
    assert!(refused.starts_with("You have been temporarily banned!"));
}

#[tokio::test]
async fn test_file_backend_survives_restart() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut config = memory_config();
    config.storage.backend = StorageBackend::File;
    config.storage.path = dir.path().join("data").join("bans.json");

    let state = create_proxy_state(config.clone(), no_config_file())
        .await
        .expect("proxy state");
    let reply = state.dispatcher().dispatch("console", "bt ban Steve Griefing 7d").await;
    assert!(reply.is_success());
    drop(state);

    let restarted = create_proxy_state(config, no_config_file())
        .await
        .expect("restarted state");
    assert_eq!(restarted.engine().list_active_bans(), vec!["Steve".to_string()]);
}

#[tokio::test]
async fn test_corrupted_file_is_quarantined_at_startup() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bans.json");
    std::fs::write(&path, "{ this is not json").expect("write");

    let mut config = memory_config();
    config.storage.backend = StorageBackend::File;
    config.storage.path = path.clone();

    let state = create_proxy_state(config, no_config_file())
        .await
        .expect("starts after repair");
    assert!(state.engine().list_active_bans().is_empty());

    let backups = std::fs::read_dir(dir.path())
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("bans.json.backup."))
        .count();
    assert_eq!(backups, 1);
    assert!(path.exists());
}
