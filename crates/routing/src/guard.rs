//! Per-navigation authorization decisions

use std::sync::Arc;

use dealerdash_session::SessionStore;

use crate::registry::{RouteRegistry, LOGIN_PATH, UNAUTHORIZED_PATH};

/// リダイレクト時のブラウザ履歴の扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// 履歴に積む
    Push,
    /// 現在のエントリを置き換える（戻るでループしない）
    Replace,
}

/// リダイレクト指示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// 遷移先パス
    pub to: String,
    /// 履歴の扱い
    pub history: HistoryMode,
}

/// ナビゲーション1回ごとのガード判定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// セッション復元が未完了。ページにもリダイレクトにも確定しない
    Loading,

    /// 認証・認可ともに通過。要求されたページをそのまま描画する
    Granted {
        /// 描画するページの参照名
        page: String,
    },

    /// 未認証。ログインへリダイレクト（履歴は置き換え）
    DeniedUnauthenticated {
        redirect: Redirect,
    },

    /// 認証済みだが権限不足。権限不足ページへリダイレクト
    DeniedForbidden {
        redirect: Redirect,
    },
}

impl RouteDecision {
    /// ページ描画が許可されたかどうか
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    /// リダイレクト指示（あれば）
    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            Self::DeniedUnauthenticated { redirect } | Self::DeniedForbidden { redirect } => {
                Some(redirect)
            }
            _ => None,
        }
    }
}

/// 認可ガード
///
/// ナビゲーションのたびに [`evaluate`](AccessGuard::evaluate) を呼び直す。
/// 判定はキャッシュせず、常にセッションストアとレジストリの現在の
/// 状態から導出する。
pub struct AccessGuard {
    registry: Arc<RouteRegistry>,
    session: Arc<SessionStore>,
}

impl AccessGuard {
    /// 新しいガードを作成
    pub fn new(registry: Arc<RouteRegistry>, session: Arc<SessionStore>) -> Self {
        Self { registry, session }
    }

    /// 指定パスへのナビゲーションを判定する
    ///
    /// 判定順は固定: ハイドレート完了 → 認証 → ロール。未確定の
    /// identity に対してロール判定を行うことはない。
    pub fn evaluate(&self, path: &str) -> RouteDecision {
        // セッション復元中はどのページにも確定しない
        if !self.session.is_hydrated() {
            return RouteDecision::Loading;
        }

        let entry = match self.registry.lookup(path) {
            Some(entry) => entry,
            None => {
                // 未登録パスはログインへのフォールバック
                log::debug!("unregistered path {}, redirecting to login", path);
                return RouteDecision::DeniedUnauthenticated {
                    redirect: Redirect {
                        to: LOGIN_PATH.to_string(),
                        history: HistoryMode::Replace,
                    },
                };
            }
        };

        if entry.access.is_public() {
            return RouteDecision::Granted {
                page: entry.page.clone(),
            };
        }

        let role = match self.session.role() {
            Some(role) => role,
            None => {
                return RouteDecision::DeniedUnauthenticated {
                    redirect: Redirect {
                        to: LOGIN_PATH.to_string(),
                        history: HistoryMode::Replace,
                    },
                };
            }
        };

        if entry.access.permits(role) {
            RouteDecision::Granted {
                page: entry.page.clone(),
            }
        } else {
            log::debug!("role {} denied for path {}", role, path);
            RouteDecision::DeniedForbidden {
                redirect: Redirect {
                    to: UNAUTHORIZED_PATH.to_string(),
                    history: HistoryMode::Push,
                },
            }
        }
    }
}
