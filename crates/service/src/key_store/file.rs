//! # ファイルシステム鍵ストア
//!
//! ディレクトリ構成:
//! - `{root}/{secret_name}/public.asc`
//! - `{root}/{secret_name}/private.asc`
//! - `{root}/{secret_name}/password`

use std::io;
use std::path::{Path, PathBuf};

use pgp_service_crypto::KeyPair;

use super::KeyStore;
use crate::error::ServiceError;

const PUBLIC_KEY_FILE: &str = "public.asc";
const PRIVATE_KEY_FILE: &str = "private.asc";
const PASSPHRASE_FILE: &str = "password";

/// ローカルディレクトリ（Kubernetes Secretのマウント等）から鍵素材を読み込む鍵ストア。
pub struct FileKeyStore {
    root: PathBuf,
}

impl FileKeyStore {
    /// 新しいFileKeyStoreを作成する。
    ///
    /// # 引数
    /// - `root`: シークレットごとのディレクトリを格納するルートパス
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// シークレットのディレクトリ。ルート外を指す名前は拒否する。
    fn secret_dir(&self, secret_name: &str) -> Result<PathBuf, ServiceError> {
        let escapes_root = secret_name.is_empty()
            || secret_name == "."
            || secret_name == ".."
            || secret_name.contains(['/', '\\']);
        if escapes_root {
            return Err(ServiceError::KeyMaterialUnavailable {
                path: self.root.clone(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid secret name: {secret_name:?}"),
                ),
            });
        }
        Ok(self.root.join(secret_name))
    }
}

#[async_trait::async_trait]
impl KeyStore for FileKeyStore {
    async fn load_key_material(&self, secret_name: &str) -> Result<KeyPair, ServiceError> {
        let dir = self.secret_dir(secret_name)?;

        // 順番に読み込み、最初の失敗で打ち切る
        let public_key_armored = read_artifact(&dir.join(PUBLIC_KEY_FILE)).await?;
        let private_key_armored = read_artifact(&dir.join(PRIVATE_KEY_FILE)).await?;
        let passphrase = read_artifact(&dir.join(PASSPHRASE_FILE)).await?;

        tracing::debug!(secret = %secret_name, "鍵素材を読み込みました");

        Ok(KeyPair::new(
            public_key_armored,
            private_key_armored,
            passphrase.trim_end_matches(['\r', '\n']),
        ))
    }
}

async fn read_artifact(path: &Path) -> Result<String, ServiceError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ServiceError::KeyMaterialUnavailable {
            path: path.to_path_buf(),
            source,
        })
}
