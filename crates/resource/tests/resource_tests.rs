use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dealerdash_resource::{
    DeleteOutcome, Keyed, ListCache, Resource, ResourceClient, ResourceError, ViewScope,
};
use dealerdash_session::{Identity, Role, SessionStore};

#[derive(Debug, Clone, serde::Deserialize)]
struct Row {
    id: Uuid,
    name: String,
}

impl Keyed for Row {
    fn key(&self) -> Uuid {
        self.id
    }
}

fn store() -> Arc<SessionStore> {
    let store = Arc::new(SessionStore::in_memory());
    store.hydrate();
    store
        .login(
            Identity {
                id: Uuid::new_v4(),
                display_name: "Integration".to_string(),
                role: Role::EvmStaff,
                dealer_id: None,
            },
            "integration-token",
            None,
        )
        .unwrap();
    store
}

fn row_body(id: Uuid, name: &str) -> serde_json::Value {
    json!({ "isSuccess": true, "messages": [], "data": { "id": id, "name": name } })
}

#[tokio::test]
async fn timeout_is_a_distinct_transport_failure() {
    let mock_server = MockServer::start().await;

    // クライアントのタイムアウトより長い遅延
    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "isSuccess": true, "messages": [], "data": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(&mock_server.uri(), store(), Client::new())
        .with_timeout(Duration::from_millis(100));

    let err = client
        .list::<serde_json::Value>(Resource::Vehicles, &[])
        .await
        .unwrap_err();

    assert!(matches!(err, ResourceError::Timeout));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn stale_response_from_a_dismissed_view_mutates_nothing() {
    let mock_server = MockServer::start().await;

    let slow_id = Uuid::new_v4();
    let fast_id = Uuid::new_v4();

    // A: 遅いリクエスト
    Mock::given(method("GET"))
        .and(path("/dealers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "isSuccess": true,
                    "messages": [],
                    "data": [{ "id": slow_id, "name": "slow" }]
                }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    // B: 速いリクエスト
    Mock::given(method("GET"))
        .and(path("/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSuccess": true,
            "messages": [],
            "data": [{ "id": fast_id, "name": "fast" }]
        })))
        .mount(&mock_server)
        .await;

    let client = Arc::new(ResourceClient::new(&mock_server.uri(), store(), Client::new()));
    let scope = ViewScope::new();
    let mut cache: ListCache<Row> = ListCache::new();

    // A（遅い）を発行してから B（速い）を発行する
    let slow = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.list::<Row>(Resource::Dealers, &[]).await })
    };
    let fast: Vec<Row> = client.list(Resource::Customers, &[]).await.unwrap();
    assert!(cache.apply_list(&scope, fast));
    assert_eq!(cache.items()[0].name, "fast");

    // ビューを閉じた後に A が完了する
    scope.dismiss();
    let late: Vec<Row> = slow.await.unwrap().unwrap();
    assert!(!cache.apply_list(&scope, late));

    // 可視状態は変化していない
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.items()[0].name, "fast");
}

#[tokio::test]
async fn create_then_update_then_idempotent_delete() {
    let mock_server = MockServer::start().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/vehicles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(row_body(id, "VF 8")))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path(format!("/vehicles/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(row_body(id, "VF 8 Plus")))
        .mount(&mock_server)
        .await;

    // 1回目の削除は成功、2回目は404
    Mock::given(method("DELETE"))
        .and(path(format!("/vehicles/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSuccess": true, "messages": [], "data": null
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/vehicles/{}", id)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = ResourceClient::new(&mock_server.uri(), store(), Client::new());

    let created: Row = client
        .create(Resource::Vehicles, &json!({ "name": "VF 8" }))
        .await
        .unwrap();
    assert_eq!(created.name, "VF 8");

    let updated: Row = client
        .update(Resource::Vehicles, id, &json!({ "name": "VF 8 Plus" }))
        .await
        .unwrap();
    assert_eq!(updated.name, "VF 8 Plus");

    // 二重削除: 1回目は Deleted、2回目は NotFound で、どちらも成功
    assert_eq!(
        client.delete(Resource::Vehicles, id).await.unwrap(),
        DeleteOutcome::Deleted
    );
    assert_eq!(
        client.delete(Resource::Vehicles, id).await.unwrap(),
        DeleteOutcome::NotFound
    );
}

#[tokio::test]
async fn parallel_requests_tolerate_out_of_order_completion() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "isSuccess": true,
                    "messages": [],
                    "data": [{ "id": Uuid::new_v4(), "name": "vehicle" }]
                }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/promotions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isSuccess": true,
            "messages": [],
            "data": [{ "id": Uuid::new_v4(), "name": "promo" }]
        })))
        .mount(&mock_server)
        .await;

    let client = Arc::new(ResourceClient::new(&mock_server.uri(), store(), Client::new()));

    // フォーム表示用に関連リソースを並列フェッチ
    let vehicles = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.list::<Row>(Resource::Vehicles, &[]).await })
    };
    let promotions = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.list::<Row>(Resource::Promotions, &[]).await })
    };

    let vehicles = vehicles.await.unwrap().unwrap();
    let promotions = promotions.await.unwrap().unwrap();

    assert_eq!(vehicles.len(), 1);
    assert_eq!(promotions.len(), 1);
}
