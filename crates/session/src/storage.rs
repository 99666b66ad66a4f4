//! Durable storage backends for the persisted session

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

use crate::session::Session;

/// ストレージのエラー型
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// セッションの永続化先
///
/// リロード／再起動をまたいでセッションを保持するキーバリュー永続化。
/// 起動時に一度読み込み、ログイン・更新時に書き込み、ログアウト時に消去する。
pub trait SessionStorage: Send + Sync {
    /// 永続化されたセッションを読み込む
    fn load(&self) -> Result<Option<Session>, StorageError>;

    /// セッションを書き込む
    fn store(&self, session: &Session) -> Result<(), StorageError>;

    /// 永続化されたセッションを消去する（存在しない場合も成功）
    fn clear(&self) -> Result<(), StorageError>;
}

/// ファイルベースのストレージ
///
/// セッションをJSONファイルとして保存する。ブラウザ版の
/// localStorage に相当する耐久ストレージ。
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// 指定パスのファイルストレージを作成
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    fn store(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// インメモリのストレージ
///
/// テストおよび永続化を無効にしたクライアント向け。シリアライズを
/// 経由するため、ファイル版と同じ読み書き経路を通る。
#[derive(Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    /// 空のインメモリストレージを作成
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Session>, StorageError> {
        let slot = self.slot.lock().unwrap();
        match slot.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn store(&self, session: &Session) -> Result<(), StorageError> {
        let raw = serde_json::to_string(session)?;
        let mut slot = self.slot.lock().unwrap();
        *slot = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        let mut slot = self.slot.lock().unwrap();
        *slot = None;
        Ok(())
    }
}
