//! StorageReset port - 永続化ストアのリセット

use async_trait::async_trait;

use crate::domain::SourceError;

/// StorageReset は外部ストアを初期状態に戻す
///
/// 冪等な副作用であること。失敗しても呼び出し側は握りつぶし、
/// しきい値を満たしている次の機会に再度呼ばれます。
#[async_trait]
pub trait StorageReset: Send + Sync {
    async fn reset_storage(&self) -> Result<(), SourceError>;
}
