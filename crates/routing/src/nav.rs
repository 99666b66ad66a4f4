//! Navigation shell: role-filtered menu derivation

use dealerdash_session::Role;

use crate::registry::RouteRegistry;

/// メニューの1項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    /// 表示ラベル
    pub label: String,
    /// 遷移先パス
    pub path: String,
}

/// 現在のロールで表示可能なメニュー項目を導出する
///
/// 純粋な導出であり状態を持たない。描画のたびに呼び直す。
/// 未認証（`role` が `None`）の場合は空。ラベルを持たない
/// エントリ（ログイン・権限不足ページ）はメニューに出ない。
pub fn visible_entries(registry: &RouteRegistry, role: Option<Role>) -> Vec<NavEntry> {
    let role = match role {
        Some(role) => role,
        None => return Vec::new(),
    };

    registry
        .entries()
        .filter(|entry| !entry.access.is_public() && entry.access.permits(role))
        .filter_map(|entry| {
            entry.nav_label.as_ref().map(|label| NavEntry {
                label: label.clone(),
                path: entry.path.clone(),
            })
        })
        .collect()
}

/// ロール別のログイン後の着地ページ
pub fn home_path(role: Role) -> &'static str {
    match role {
        Role::DealerStaff => "/dealer-staff/dashboard",
        Role::DealerManager => "/dealer-manager/dashboard",
        Role::EvmStaff => "/evm-staff/dashboard",
        Role::Admin => "/admin/dashboard",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_registry;

    #[test]
    fn unauthenticated_menu_is_empty() {
        let registry = default_registry();
        assert!(visible_entries(&registry, None).is_empty());
    }

    #[test]
    fn menu_is_scoped_to_the_current_role() {
        let registry = default_registry();

        let entries = visible_entries(&registry, Some(Role::DealerStaff));
        assert!(!entries.is_empty());
        assert!(entries.iter().all(|entry| entry.path.starts_with("/dealer-staff/")));

        let entries = visible_entries(&registry, Some(Role::Admin));
        assert!(entries.iter().all(|entry| entry.path.starts_with("/admin/")));
    }

    #[test]
    fn public_pages_never_appear_in_the_menu() {
        let registry = default_registry();
        for role in Role::all() {
            let entries = visible_entries(&registry, Some(role));
            assert!(entries.iter().all(|entry| entry.path != "/login"));
            assert!(entries.iter().all(|entry| entry.path != "/unauthorized"));
        }
    }

    #[test]
    fn home_path_lands_on_the_role_dashboard() {
        let registry = default_registry();
        for role in Role::all() {
            let home = home_path(role);
            let access = registry.allowed_roles(home).expect("home path is registered");
            assert!(access.permits(role));
        }
    }
}
