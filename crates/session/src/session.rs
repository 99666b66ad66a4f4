//! Session data and expiry handling

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// セッション情報
///
/// トークンは不透明な文字列として扱い、形式の検証は行わない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// 認証済みユーザーのプロフィール
    pub identity: Identity,

    /// アクセストークン（不透明）
    pub token: String,

    /// トークンの有効期限。`None` は無期限
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expiry: Option<DateTime<Utc>>,
}

impl Session {
    /// 新しいセッションを作成
    pub fn new(identity: Identity, token: impl Into<String>, token_expiry: Option<DateTime<Utc>>) -> Self {
        Self {
            identity,
            token: token.into(),
            token_expiry,
        }
    }

    /// セッションが期限切れかどうか
    ///
    /// 有効期限が設定されていない場合は期限切れにならない。
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// 指定時刻を基準に期限切れかどうかを判定
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.token_expiry {
            Some(expiry) => now >= expiry,
            None => false,
        }
    }
}
