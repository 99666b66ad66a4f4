//! Client-side, pre-submit validation
//!
//! Validation runs synchronously before any network call. A failed
//! validation blocks submission and is surfaced per field; it never
//! reaches the transport layer.

use std::collections::BTreeMap;
use std::fmt;

/// フィールドごとの検証エラー
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    /// 空のエラー集合を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// フィールドのエラーを追加
    pub fn insert(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    /// フィールドのエラーを取得
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// エラーが1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// エラー件数
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// (フィールド, メッセージ) の反復
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// エラーがなければ `Ok(())`、あれば自身を `Err` として返す
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// 送信前検証
pub trait Validate {
    /// 同期的にフィールドを検証する
    fn validate(&self) -> Result<(), FieldErrors>;
}
