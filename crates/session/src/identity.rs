//! Identity and role types for the DealerDash session

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// 役割（ロール）
///
/// ビルド時に閉じた固定セット。セッションは identity を通じて
/// ちょうど1つのロールを持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    DealerStaff,
    DealerManager,
    EvmStaff,
    Admin,
}

impl Role {
    /// 安定した数値IDからロールを復元
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::DealerStaff),
            2 => Some(Self::DealerManager),
            3 => Some(Self::EvmStaff),
            4 => Some(Self::Admin),
            _ => None,
        }
    }

    /// ロールの安定した数値ID
    pub fn id(&self) -> i32 {
        match self {
            Self::DealerStaff => 1,
            Self::DealerManager => 2,
            Self::EvmStaff => 3,
            Self::Admin => 4,
        }
    }

    /// 表示名
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DealerStaff => "Dealer Staff",
            Self::DealerManager => "Dealer Manager",
            Self::EvmStaff => "EVM Staff",
            Self::Admin => "Admin",
        }
    }

    /// 全ロール（閉集合）
    pub fn all() -> [Role; 4] {
        [
            Self::DealerStaff,
            Self::DealerManager,
            Self::EvmStaff,
            Self::Admin,
        ]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// 認証済みユーザーのプロフィール
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// ユーザーID
    pub id: Uuid,

    /// 表示名
    pub display_name: String,

    /// ロール
    pub role: Role,

    /// 所属ディーラーID（あれば）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Uuid>,
}

impl Identity {
    /// 部分更新をマージ
    pub fn apply(&mut self, patch: IdentityPatch) {
        if let Some(display_name) = patch.display_name {
            self.display_name = display_name;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(dealer_id) = patch.dealer_id {
            self.dealer_id = Some(dealer_id);
        }
    }
}

/// Identity の部分更新
///
/// `None` のフィールドは変更されない。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<Uuid>,
}
