use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dealerdash_rust::config::ClientOptions;
use dealerdash_rust::DealerDash;
use dealerdash_rust::routing::{home_path, RouteDecision, LOGIN_PATH, UNAUTHORIZED_PATH};
use dealerdash_rust::session::{Identity, Role, SessionEvent};

fn identity(role: Role) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        display_name: "E2E User".to_string(),
        role,
        dealer_id: None,
    }
}

#[tokio::test]
async fn login_guard_navigation_flow() {
    let client = DealerDash::new("https://dms.example.com").unwrap();

    // ハイドレート前はすべて loading
    let guard = client.guard();
    assert_eq!(guard.evaluate("/dealer-staff/dashboard"), RouteDecision::Loading);

    client.hydrate();

    // 未認証 → ログインへ
    assert!(matches!(
        guard.evaluate("/dealer-staff/dashboard"),
        RouteDecision::DeniedUnauthenticated { .. }
    ));
    assert!(client.navigation().is_empty());

    // ログイン後は自ロールのページに到達でき、メニューも出る
    client
        .session()
        .login(identity(Role::DealerStaff), "token", None)
        .unwrap();

    assert!(guard.evaluate(home_path(Role::DealerStaff)).is_granted());
    let nav = client.navigation();
    assert!(!nav.is_empty());
    assert!(nav.iter().all(|entry| entry.path.starts_with("/dealer-staff/")));

    // 他ロールのページは権限不足
    let decision = guard.evaluate("/admin/users");
    assert_eq!(
        decision.redirect().map(|r| r.to.as_str()),
        Some(UNAUTHORIZED_PATH)
    );

    // 権限不足ページからログアウトすると未認証に戻る
    client.session().logout();
    assert!(!client.session().is_authenticated());
    assert!(matches!(
        guard.evaluate("/admin/users"),
        RouteDecision::DeniedUnauthenticated { .. }
    ));
}

#[tokio::test]
async fn expired_persisted_session_hydrates_as_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    // 期限切れトークンで永続化しておく
    {
        let client = DealerDash::new_with_options(
            "https://dms.example.com",
            ClientOptions::default().with_session_file(&session_file),
        )
        .unwrap();
        client.hydrate();
        client
            .session()
            .login(
                identity(Role::Admin),
                "stale-token",
                Some(Utc::now() - Duration::hours(2)),
            )
            .unwrap();
    }

    // 再起動相当: 復元直後から未認証であり、認証済み状態は一度も見えない
    let client = DealerDash::new_with_options(
        "https://dms.example.com",
        ClientOptions::default().with_session_file(&session_file),
    )
    .unwrap();
    client.hydrate();

    assert!(!client.session().is_authenticated());
    assert!(matches!(
        client.guard().evaluate("/admin/dashboard"),
        RouteDecision::DeniedUnauthenticated { .. }
    ));
}

#[tokio::test]
async fn a_401_from_any_page_forces_logout_everywhere() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = DealerDash::new(&mock_server.uri()).unwrap();
    client.hydrate();
    client
        .session()
        .login(identity(Role::DealerManager), "revoked-token", None)
        .unwrap();

    let invalidated = Arc::new(AtomicBool::new(false));
    let observed = Arc::clone(&invalidated);
    client.session().subscribe(move |event| {
        if event == SessionEvent::Invalidated {
            observed.store(true, Ordering::SeqCst);
        }
    });

    let guard = client.guard();
    assert!(guard.evaluate("/dealer-manager/orders").is_granted());

    // どのページ発のリクエストであっても、401でセッションは破棄される
    let result = client
        .resources()
        .list::<serde_json::Value>(dealerdash_rust::resource::Resource::Orders, &[])
        .await;
    assert!(result.is_err());

    assert!(invalidated.load(Ordering::SeqCst));
    assert!(!client.session().is_authenticated());

    // 次のガード評価は未認証として解決する
    let decision = guard.evaluate("/dealer-manager/orders");
    assert_eq!(decision.redirect().map(|r| r.to.as_str()), Some(LOGIN_PATH));
}

#[tokio::test]
async fn resource_calls_carry_the_session_token_under_the_api_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/vehicles"))
        .and(header("Authorization", "Bearer live-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSuccess": true,
            "messages": [],
            "data": [{ "ok": true }]
        })))
        .mount(&mock_server)
        .await;

    let client = DealerDash::new(&mock_server.uri()).unwrap();
    client.hydrate();
    client
        .session()
        .login(identity(Role::EvmStaff), "live-token", None)
        .unwrap();

    let rows = client
        .resources()
        .list::<serde_json::Value>(dealerdash_rust::resource::Resource::Vehicles, &[])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}
