//! Stale-response guard and the per-page list cache

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// ビューのライフサイクルを表すハンドル
///
/// ページ（モーダル）が表示されている間だけアクティブ。画面を閉じる
/// ときに [`dismiss`](ViewScope::dismiss) を呼ぶと、そのビューが発行した
/// 未完了リクエストの遅延レスポンスは適用されなくなる。
#[derive(Debug, Clone)]
pub struct ViewScope {
    active: Arc<AtomicBool>,
}

impl ViewScope {
    /// アクティブなスコープを作成
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// ビューを閉じる。以後このスコープ経由の適用はすべて無視される
    pub fn dismiss(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    /// ビューがまだ表示中かどうか
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

/// 一意なIDを持つレコード
pub trait Keyed {
    /// レコードのID
    fn key(&self) -> Uuid;
}

/// ページ単位のリソース一覧キャッシュ
///
/// バックエンドが常に正であり、このキャッシュは最後に成功した
/// フェッチの反映にすぎない。再フェッチが唯一の整合化手段。
/// すべての適用は [`ViewScope`] を通り、閉じられたビューからの
/// 遅延レスポンスで可視状態が変化することはない。
#[derive(Debug, Clone)]
pub struct ListCache<T> {
    items: Vec<T>,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> ListCache<T> {
    /// 空のキャッシュを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// キャッシュの内容
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 件数
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 一覧フェッチの結果を反映する
    ///
    /// スコープが閉じていれば何もせず false を返す。
    pub fn apply_list(&mut self, scope: &ViewScope, items: Vec<T>) -> bool {
        if !scope.is_active() {
            log::debug!("dropping stale list response ({} items)", items.len());
            return false;
        }
        self.items = items;
        true
    }

    /// 作成・更新されたレコードを反映する（同IDがあれば置換、なければ追加）
    pub fn apply_upsert(&mut self, scope: &ViewScope, item: T) -> bool {
        if !scope.is_active() {
            log::debug!("dropping stale upsert response");
            return false;
        }
        match self.items.iter_mut().find(|existing| existing.key() == item.key()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        true
    }

    /// 削除されたレコードを反映する
    pub fn apply_remove(&mut self, scope: &ViewScope, id: Uuid) -> bool {
        if !scope.is_active() {
            log::debug!("dropping stale delete response");
            return false;
        }
        self.items.retain(|existing| existing.key() != id);
        true
    }
}
