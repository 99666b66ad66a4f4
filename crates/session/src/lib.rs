//! DealerDash session store
//!
//! This crate is the single source of truth for "who is logged in" on the
//! dashboard client, persisted across restarts. It owns the session
//! exclusively: every mutation goes through [`SessionStore::login`],
//! [`SessionStore::logout`], [`SessionStore::update_identity`] or
//! [`SessionStore::force_logout`].

mod identity;
mod session;
mod storage;

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

pub use identity::{Identity, IdentityPatch, Role};
pub use session::Session;
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};

/// エラー型
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// セッション状態の変化を通知するイベント
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// ログインによりセッションが確立された
    SignedIn,
    /// ログアウトによりセッションが破棄された
    SignedOut,
    /// プロフィールが更新された
    IdentityUpdated,
    /// サーバーがトークンを拒否し、セッションが強制破棄された
    Invalidated,
}

type EventListener = Arc<dyn Fn(SessionEvent) + Send + Sync>;

/// セッションストア
///
/// 永続ストレージを背後に持つ、ログイン状態の唯一の保持者。
/// 起動時に [`hydrate`](SessionStore::hydrate) を一度呼ぶまでは
/// 「解決中」の状態にあり、ガードはその間 loading を返す。
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    current: RwLock<Option<Session>>,
    hydrated: AtomicBool,
    listeners: Mutex<Vec<EventListener>>,
}

impl SessionStore {
    /// 指定ストレージの上にストアを作成（未ハイドレート状態）
    pub fn new(storage: Box<dyn SessionStorage>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
            hydrated: AtomicBool::new(false),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// インメモリストレージのストアを作成
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// 永続ストレージからセッションを復元する
    ///
    /// ストレージの読み込み・解析に失敗した場合は「セッションなし」として
    /// 扱う（fail closed）。期限切れのセッションが見つかった場合は、認証済み
    /// 状態を一度も外に見せることなくログアウト処理を行う。
    pub fn hydrate(&self) {
        let loaded = match self.storage.load() {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("session hydration failed, treating as signed out: {}", err);
                None
            }
        };

        match loaded {
            Some(session) if session.is_expired() => {
                log::info!("persisted session has expired, clearing it");
                if let Err(err) = self.storage.clear() {
                    log::warn!("failed to clear expired session: {}", err);
                }
            }
            Some(session) => {
                let mut current = self.current.write().unwrap();
                *current = Some(session);
            }
            None => {}
        }

        self.hydrated.store(true, Ordering::SeqCst);
    }

    /// ハイドレートが完了しているかどうか
    pub fn is_hydrated(&self) -> bool {
        self.hydrated.load(Ordering::SeqCst)
    }

    /// ログイン: identity とトークンを保存し、永続化する
    ///
    /// トークンは不透明な文字列としてそのまま受け入れる。
    pub fn login(
        &self,
        identity: Identity,
        token: impl Into<String>,
        token_expiry: Option<DateTime<Utc>>,
    ) -> Result<(), SessionError> {
        let session = Session::new(identity, token, token_expiry);

        {
            let mut current = self.current.write().unwrap();
            *current = Some(session.clone());
        }

        self.storage.store(&session)?;
        self.emit(SessionEvent::SignedIn);
        Ok(())
    }

    /// ログアウト: セッションを破棄する
    ///
    /// 既にログアウト済みの場合は何もしない（冪等）。
    pub fn logout(&self) {
        if self.clear_session() {
            self.emit(SessionEvent::SignedOut);
        }
    }

    /// サーバー側でトークンが無効と判明した際の強制ログアウト
    ///
    /// [`logout`](SessionStore::logout) と同じ破棄処理を行うが、
    /// [`SessionEvent::Invalidated`] を通知する点が異なる。リソース
    /// クライアントが401を受け取ったときに呼ぶ。
    pub fn force_logout(&self) {
        if self.clear_session() {
            self.emit(SessionEvent::Invalidated);
        }
    }

    fn clear_session(&self) -> bool {
        let had_session = {
            let mut current = self.current.write().unwrap();
            current.take().is_some()
        };

        if had_session {
            if let Err(err) = self.storage.clear() {
                log::warn!("failed to clear persisted session: {}", err);
            }
        }

        had_session
    }

    /// プロフィールの部分更新
    ///
    /// セッションが存在しない場合は何もしない。呼び出し側は
    /// 未認証状態で呼ばない責任を持つ（呼び出し規約）。
    pub fn update_identity(&self, patch: IdentityPatch) -> Result<(), SessionError> {
        let updated = {
            let mut current = self.current.write().unwrap();
            match current.as_mut() {
                Some(session) => {
                    session.identity.apply(patch);
                    Some(session.clone())
                }
                None => None,
            }
        };

        if let Some(session) = updated {
            self.storage.store(&session)?;
            self.emit(SessionEvent::IdentityUpdated);
        }
        Ok(())
    }

    /// 現在のセッションのコピー
    pub fn current(&self) -> Option<Session> {
        let current = self.current.read().unwrap();
        current.clone()
    }

    /// 現在のロール（認証済みの場合のみ）
    pub fn role(&self) -> Option<Role> {
        let current = self.current.read().unwrap();
        match current.as_ref() {
            Some(session) if !session.is_expired() => Some(session.identity.role),
            _ => None,
        }
    }

    /// 現在のトークン（あれば）
    pub fn token(&self) -> Option<String> {
        let current = self.current.read().unwrap();
        current.as_ref().map(|session| session.token.clone())
    }

    /// セッションが期限切れかどうか
    ///
    /// 有効期限が設定されていて現在時刻がそれ以降の場合のみ true。
    pub fn is_expired(&self) -> bool {
        let current = self.current.read().unwrap();
        current.as_ref().map(Session::is_expired).unwrap_or(false)
    }

    /// 認証済みかどうか
    ///
    /// identity とトークンが存在し、かつ期限切れでない場合に true。
    pub fn is_authenticated(&self) -> bool {
        let current = self.current.read().unwrap();
        match current.as_ref() {
            Some(session) => !session.is_expired(),
            None => false,
        }
    }

    /// セッションイベントの購読
    ///
    /// リスナーは通知時にストアへ再入してよい（ロック保持中には
    /// 呼ばれない）。
    pub fn subscribe(&self, listener: impl Fn(SessionEvent) + Send + Sync + 'static) {
        let mut listeners = self.listeners.lock().unwrap();
        listeners.push(Arc::new(listener));
    }

    fn emit(&self, event: SessionEvent) {
        // リスナーがストアへ再入してもデッドロックしないよう、
        // ロックの外で呼び出す
        let snapshot: Vec<EventListener> = {
            let listeners = self.listeners.lock().unwrap();
            listeners.clone()
        };
        for listener in snapshot {
            listener(event);
        }
    }
}
