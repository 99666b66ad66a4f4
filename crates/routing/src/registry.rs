//! Static role-to-route registry

use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use dealerdash_session::Role;

/// ログインページのパス（公開）
pub const LOGIN_PATH: &str = "/login";

/// 権限不足ページのパス（公開）
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";

/// エラー型
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// 同一パスの二重登録は設定ミス
    #[error("Duplicate route registration: {0}")]
    DuplicateRoute(String),

    /// 非公開ルートには少なくとも1つのロールが必要
    #[error("Restricted route has an empty role set: {0}")]
    EmptyRoleSet(String),
}

/// ルートのアクセス制限
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    /// 制限なし（ログイン・権限不足ページなど）
    Public,
    /// 指定ロールのみ到達可能
    Restricted(BTreeSet<Role>),
}

impl RouteAccess {
    /// ロール集合から制限付きアクセスを作成
    pub fn restricted<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self::Restricted(roles.into_iter().collect())
    }

    /// 指定ロールが到達可能かどうか
    pub fn permits(&self, role: Role) -> bool {
        match self {
            Self::Public => true,
            Self::Restricted(roles) => roles.contains(&role),
        }
    }

    /// 公開ルートかどうか
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Public)
    }
}

/// ルート登録の1エントリ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// パス
    pub path: String,

    /// 描画するページの参照名
    pub page: String,

    /// アクセス制限
    pub access: RouteAccess,

    /// メニューに表示する場合のラベル。`None` ならメニューに出ない
    pub nav_label: Option<String>,
}

impl RouteEntry {
    /// 公開エントリを作成
    pub fn public(path: &str, page: &str) -> Self {
        Self {
            path: path.to_string(),
            page: page.to_string(),
            access: RouteAccess::Public,
            nav_label: None,
        }
    }

    /// 制限付きエントリを作成
    pub fn restricted<I>(path: &str, page: &str, roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        Self {
            path: path.to_string(),
            page: page.to_string(),
            access: RouteAccess::restricted(roles),
            nav_label: None,
        }
    }

    /// メニューラベルを設定
    pub fn with_nav_label(mut self, label: &str) -> Self {
        self.nav_label = Some(label.to_string());
        self
    }
}

/// ロール→ルートの静的レジストリ
///
/// 登録済みパスの集合に対して (path → allowed roles) の対応は全域。
/// 未登録パスはガード側でログインへのフォールバックになる。
#[derive(Debug, Default)]
pub struct RouteRegistry {
    entries: HashMap<String, RouteEntry>,
    order: Vec<String>,
}

impl RouteRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ルートを登録
    ///
    /// 同一パスの二重登録と、空のロール集合を持つ制限付きルートは
    /// 設定エラーとして拒否する。
    pub fn register(&mut self, entry: RouteEntry) -> Result<(), RegistryError> {
        if let RouteAccess::Restricted(roles) = &entry.access {
            if roles.is_empty() {
                return Err(RegistryError::EmptyRoleSet(entry.path));
            }
        }

        if self.entries.contains_key(&entry.path) {
            return Err(RegistryError::DuplicateRoute(entry.path));
        }

        self.order.push(entry.path.clone());
        self.entries.insert(entry.path.clone(), entry);
        Ok(())
    }

    /// パスに対応するエントリを引く
    pub fn lookup(&self, path: &str) -> Option<&RouteEntry> {
        self.entries.get(path)
    }

    /// パスに対応するアクセス制限を引く
    pub fn allowed_roles(&self, path: &str) -> Option<&RouteAccess> {
        self.lookup(path).map(|entry| &entry.access)
    }

    /// 登録順のエントリ一覧
    pub fn entries(&self) -> impl Iterator<Item = &RouteEntry> {
        self.order.iter().filter_map(|path| self.entries.get(path))
    }

    /// 登録済みルート数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// ルートが1つも登録されていないかどうか
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// DealerDash の標準ルート表
///
/// ロール別のダッシュボード・CRUDページに、公開の2ページ
/// （ログイン・権限不足）を加えた閉集合。
pub fn default_registry() -> RouteRegistry {
    use Role::*;

    let mut registry = RouteRegistry::new();
    let mut add = |entry: RouteEntry| {
        // 静的なルート表なので二重登録は起こり得ない
        registry
            .register(entry)
            .expect("default route table must not contain duplicates");
    };

    add(RouteEntry::public(LOGIN_PATH, "LoginPage"));
    add(RouteEntry::public(UNAUTHORIZED_PATH, "UnauthorizedPage"));

    add(
        RouteEntry::restricted("/dealer-staff/dashboard", "DealerStaffDashboard", [DealerStaff])
            .with_nav_label("Dashboard"),
    );
    add(
        RouteEntry::restricted("/dealer-staff/vehicles", "DealerVehicleList", [DealerStaff])
            .with_nav_label("Vehicles"),
    );
    add(
        RouteEntry::restricted("/dealer-staff/customers", "CustomerList", [DealerStaff])
            .with_nav_label("Customers"),
    );
    add(
        RouteEntry::restricted("/dealer-staff/orders", "DealerOrderList", [DealerStaff])
            .with_nav_label("Orders"),
    );
    add(
        RouteEntry::restricted("/dealer-staff/appointments", "AppointmentList", [DealerStaff])
            .with_nav_label("Appointments"),
    );

    add(
        RouteEntry::restricted("/dealer-manager/dashboard", "DealerManagerDashboard", [DealerManager])
            .with_nav_label("Dashboard"),
    );
    add(
        RouteEntry::restricted("/dealer-manager/vehicles", "ManagerVehicleList", [DealerManager])
            .with_nav_label("Vehicles"),
    );
    add(
        RouteEntry::restricted("/dealer-manager/orders", "ManagerOrderList", [DealerManager])
            .with_nav_label("Orders"),
    );
    add(
        RouteEntry::restricted("/dealer-manager/staff", "DealerStaffAdmin", [DealerManager])
            .with_nav_label("Staff"),
    );
    add(
        RouteEntry::restricted("/dealer-manager/reports", "DealerReports", [DealerManager])
            .with_nav_label("Reports"),
    );

    add(
        RouteEntry::restricted("/evm-staff/dashboard", "EvmDashboard", [EvmStaff])
            .with_nav_label("Dashboard"),
    );
    add(
        RouteEntry::restricted("/evm-staff/dealers", "DealerList", [EvmStaff])
            .with_nav_label("Dealers"),
    );
    add(
        RouteEntry::restricted("/evm-staff/vehicles", "EvmVehicleList", [EvmStaff])
            .with_nav_label("Vehicles"),
    );
    add(
        RouteEntry::restricted("/evm-staff/inventory", "InventoryList", [EvmStaff])
            .with_nav_label("Inventory"),
    );
    add(
        RouteEntry::restricted("/evm-staff/promotions", "PromotionList", [EvmStaff])
            .with_nav_label("Promotions"),
    );

    add(
        RouteEntry::restricted("/admin/dashboard", "AdminDashboard", [Admin])
            .with_nav_label("Dashboard"),
    );
    add(RouteEntry::restricted("/admin/users", "UserAdmin", [Admin]).with_nav_label("Users"));
    add(RouteEntry::restricted("/admin/dealers", "DealerAdmin", [Admin]).with_nav_label("Dealers"));
    add(RouteEntry::restricted("/admin/reports", "AdminReports", [Admin]).with_nav_label("Reports"));

    registry
}
