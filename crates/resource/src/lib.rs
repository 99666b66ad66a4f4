//! DealerDash CRUD resource client
//!
//! This crate provides the uniform request/response contract every
//! dashboard page uses against the REST backend: list/filter, get-by-id,
//! create, update and delete over a closed set of resource collections,
//! with the backend's `{data, messages, isSuccess}` envelope normalized
//! into a tagged result.
//!
//! # Features
//!
//! - Bearer-token attachment from the session store
//! - Transport / business / authorization failures kept distinct
//! - Forced logout on 401 via the session store's invalidation event
//! - Idempotent delete (`NotFound` is a tagged success, never an error)
//! - Stale-response guard for dismissed views ([`ViewScope`])

mod models;
mod validate;
mod view;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use dealerdash_session::SessionStore;

pub use models::{
    Appointment, AppointmentDraft, AppointmentStatus, Customer, Dealer, InventoryRecord, Order,
    OrderStatus, Promotion, User, UserDraft, Vehicle, VehicleDraft,
};
pub use validate::{FieldErrors, Validate};
pub use view::{Keyed, ListCache, ViewScope};

/// バックエンドのリソースコレクション（閉集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    Dealers,
    Vehicles,
    Customers,
    Orders,
    Appointments,
    Inventory,
    Promotions,
}

impl Resource {
    /// コレクションのパスセグメント
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Dealers => "dealers",
            Self::Vehicles => "vehicles",
            Self::Customers => "customers",
            Self::Orders => "orders",
            Self::Appointments => "appointments",
            Self::Inventory => "inventory",
            Self::Promotions => "promotions",
        }
    }
}

/// バックエンドの統一レスポンスエンベロープ
///
/// `isSuccess=false` はHTTPステータスに関わらず業務上の失敗を意味する。
/// 一部のエンドポイントは `resultStatus` という綴りを使うため alias で
/// 受ける。
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: Option<T>,

    #[serde(default)]
    pub messages: Vec<String>,

    #[serde(rename = "isSuccess", alias = "resultStatus", default)]
    pub is_success: bool,
}

/// 削除結果
///
/// 既に存在しないIDの削除は成功扱い（`NotFound`）。二重削除が
/// エラーになることはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// 削除された
    Deleted,
    /// 既に存在しなかった
    NotFound,
}

/// エラー型
///
/// トランスポート障害（レスポンスなし）、業務上の失敗
/// （`isSuccess=false`）、認可失敗（401）を区別する。
#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("Network error: {0}")]
    Network(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Session rejected by the server")]
    Unauthorized,

    #[error("Request rejected: {}", .messages.first().map(String::as_str).unwrap_or("no message"))]
    Rejected { messages: Vec<String> },

    #[error("Unexpected response (status {status}): {body}")]
    UnexpectedResponse { status: StatusCode, body: String },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Response envelope carried no data")]
    MissingData,
}

impl From<reqwest::Error> for ResourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }
}

impl ResourceError {
    /// 利用者に表示するメッセージ
    ///
    /// 業務上の失敗は先頭のサーバーメッセージをそのまま、それ以外は
    /// 種別ごとの汎用文言を返す。
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { messages } => messages
                .first()
                .cloned()
                .unwrap_or_else(|| "The request was rejected".to_string()),
            Self::Timeout => "The server did not respond in time. Please try again.".to_string(),
            Self::Network(_) => "A network error occurred. Please try again.".to_string(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// 再試行で解決しうる障害かどうか
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout)
    }
}

/// CRUDリソースクライアント
///
/// すべての呼び出しはセッションストアのトークンを bearer として
/// 添付する（なければ未認証のまま送る）。401を受け取った場合は
/// [`SessionStore::force_logout`] を呼んでセッションを破棄する。
/// ナビゲーションには一切関与しない。
pub struct ResourceClient {
    base_url: String,
    http_client: Client,
    session: Arc<SessionStore>,
    timeout: Duration,
}

impl ResourceClient {
    /// 新しいクライアントを作成
    pub fn new(base_url: &str, session: Arc<SessionStore>, http_client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            session,
            timeout: Duration::from_secs(30),
        }
    }

    /// リクエストのタイムアウトを設定
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.collection())
    }

    fn item_url(&self, resource: Resource, id: uuid::Uuid) -> String {
        format!("{}/{}/{}", self.base_url, resource.collection(), id)
    }

    fn prepare(&self, method: Method, url: &str) -> RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, url)
            .timeout(self.timeout)
            .header("Content-Type", "application/json");

        // トークンがあれば添付。なければ未認証のまま送り、要認証の
        // エンドポイントはサーバー側で拒否される
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<(StatusCode, String), ResourceError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            // 無効トークンはサーバーに拒否されて初めて分かる。ここで
            // セッションを破棄し、リダイレクトは invalidation イベントの
            // 購読側に委ねる
            log::warn!("server rejected the session token, forcing logout");
            self.session.force_logout();
            return Err(ResourceError::Unauthorized);
        }

        let body = response.text().await?;
        Ok((status, body))
    }

    fn parse_envelope<T: DeserializeOwned>(
        status: StatusCode,
        body: &str,
    ) -> Result<ApiEnvelope<T>, ResourceError> {
        match serde_json::from_str::<ApiEnvelope<T>>(body) {
            Ok(envelope) => {
                // isSuccess=false はHTTPステータスに関わらず業務上の失敗
                if !envelope.is_success {
                    return Err(ResourceError::Rejected {
                        messages: envelope.messages,
                    });
                }
                Ok(envelope)
            }
            Err(err) if status.is_success() => Err(ResourceError::Serialization(err)),
            Err(_) => Err(ResourceError::UnexpectedResponse {
                status,
                body: body.to_string(),
            }),
        }
    }

    /// 一覧取得（フィルタ付き）
    ///
    /// 副作用なし・再試行可能。
    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        filters: &[(&str, &str)],
    ) -> Result<Vec<T>, ResourceError> {
        let builder = self
            .prepare(Method::GET, &self.collection_url(resource))
            .query(filters);

        let (status, body) = self.send(builder).await?;
        let envelope = Self::parse_envelope::<Vec<T>>(status, &body)?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// ディーラー単位の注文一覧
    pub async fn list_dealer_orders<T: DeserializeOwned>(
        &self,
        dealer_id: uuid::Uuid,
    ) -> Result<Vec<T>, ResourceError> {
        let dealer_id = dealer_id.to_string();
        self.list(Resource::Orders, &[("dealerId", dealer_id.as_str())])
            .await
    }

    /// ID指定の取得
    ///
    /// 副作用なし・再試行可能。
    pub async fn get_by_id<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: uuid::Uuid,
    ) -> Result<T, ResourceError> {
        let builder = self.prepare(Method::GET, &self.item_url(resource, id));
        let (status, body) = self.send(builder).await?;
        let envelope = Self::parse_envelope::<T>(status, &body)?;
        envelope.data.ok_or(ResourceError::MissingData)
    }

    /// 作成
    ///
    /// 冪等ではない。同じペイロードを二度送れば二重に作成される。
    pub async fn create<T: DeserializeOwned, B: Serialize>(
        &self,
        resource: Resource,
        payload: &B,
    ) -> Result<T, ResourceError> {
        let builder = self
            .prepare(Method::POST, &self.collection_url(resource))
            .json(payload);

        let (status, body) = self.send(builder).await?;
        let envelope = Self::parse_envelope::<T>(status, &body)?;
        envelope.data.ok_or(ResourceError::MissingData)
    }

    /// 更新
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        resource: Resource,
        id: uuid::Uuid,
        payload: &B,
    ) -> Result<T, ResourceError> {
        let builder = self
            .prepare(Method::PUT, &self.item_url(resource, id))
            .json(payload);

        let (status, body) = self.send(builder).await?;
        let envelope = Self::parse_envelope::<T>(status, &body)?;
        envelope.data.ok_or(ResourceError::MissingData)
    }

    /// 削除
    ///
    /// リソースレベルで冪等。既に削除済みのIDに対しては
    /// [`DeleteOutcome::NotFound`] を返す。
    pub async fn delete(
        &self,
        resource: Resource,
        id: uuid::Uuid,
    ) -> Result<DeleteOutcome, ResourceError> {
        let builder = self.prepare(Method::DELETE, &self.item_url(resource, id));
        let (status, body) = self.send(builder).await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(DeleteOutcome::NotFound);
        }

        // 一部のエンドポイントは404ではなく、エンベロープの失敗として
        // 「見つからない」を返す。どちらの形でも NotFound に正規化する
        match Self::parse_envelope::<serde_json::Value>(status, &body) {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(ResourceError::Rejected { messages })
                if messages
                    .iter()
                    .any(|message| message.to_lowercase().contains("not found")) =>
            {
                Ok(DeleteOutcome::NotFound)
            }
            Err(err) => Err(err),
        }
    }
}
