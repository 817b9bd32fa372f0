//! src/services/connection.rs
//!
//! Per-request store connections. Every gateway call goes through [`scoped`],
//! which opens one connection, runs the work against it and releases it on
//! every exit path.

use crate::{config::ConfigError, services::normalizer::DataShapeError};
use async_trait::async_trait;
use futures::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("document store: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("relational store: {0}")]
    Sql(#[from] sqlx::Error),
    #[error("booking `{booking_id}` or its confirmation document not found")]
    NotFound { booking_id: i64 },
    #[error(transparent)]
    DataShape(#[from] DataShapeError),
}

impl GatewayError {
    /// Short category, safe to show outside the process.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration",
            Self::Mongo(_) | Self::Sql(_) => "unavailable",
            Self::NotFound { .. } => "not_found",
            Self::DataShape(_) => "data_shape",
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Opens and releases connections to one backing store.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: Send;

    /// Name used in logs and readiness output.
    fn store_name(&self) -> &'static str;

    /// Open a connection ready for queries. A failed open leaves nothing to release.
    async fn open(&self) -> GatewayResult<Self::Connection>;

    /// Close a connection. Failures are logged, never returned.
    async fn release(&self, connection: Self::Connection);
}

/// Run `work` against a freshly opened connection and release it afterwards,
/// whether the work succeeded or not.
pub async fn scoped<C, T, F>(connector: &C, work: F) -> GatewayResult<T>
where
    C: Connector + ?Sized,
    T: Send,
    F: for<'c> FnOnce(&'c mut C::Connection) -> BoxFuture<'c, GatewayResult<T>> + Send,
{
    let mut connection = connector.open().await?;
    tracing::debug!(store = connector.store_name(), "connection opened");

    let result = work(&mut connection).await;

    connector.release(connection).await;
    tracing::debug!(
        store = connector.store_name(),
        ok = result.is_ok(),
        "connection released"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts opens and releases; optionally refuses to open.
    #[derive(Default)]
    struct CountingConnector {
        opened: AtomicUsize,
        released: AtomicUsize,
        refuse: bool,
    }

    #[async_trait]
    impl Connector for CountingConnector {
        type Connection = usize;

        fn store_name(&self) -> &'static str {
            "counting"
        }

        async fn open(&self) -> GatewayResult<usize> {
            if self.refuse {
                return Err(ConfigError::MissingConnectionString.into());
            }
            Ok(self.opened.fetch_add(1, Ordering::SeqCst))
        }

        async fn release(&self, _connection: usize) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn releases_after_success() {
        let connector = CountingConnector::default();
        let value = scoped(&connector, |conn| Box::pin(async move { Ok::<_, GatewayError>(*conn + 10) }))
            .await
            .unwrap();
        assert_eq!(value, 10);
        assert_eq!(connector.opened.load(Ordering::SeqCst), 1);
        assert_eq!(connector.released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn releases_after_repeated_failures() {
        let connector = CountingConnector::default();
        for _ in 0..5 {
            let result: GatewayResult<()> = scoped(&connector, |_conn| {
                Box::pin(async move { Err(GatewayError::NotFound { booking_id: 7 }) })
            })
            .await;
            assert!(matches!(result, Err(GatewayError::NotFound { booking_id: 7 })));
        }
        assert_eq!(connector.opened.load(Ordering::SeqCst), 5);
        assert_eq!(connector.released.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn failed_open_skips_work_and_release() {
        let connector = CountingConnector {
            refuse: true,
            ..Default::default()
        };
        let ran = AtomicUsize::new(0);
        let result: GatewayResult<()> = scoped(&connector, |_conn| {
            ran.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move { Ok::<_, GatewayError>(()) })
        })
        .await;
        assert!(matches!(
            result,
            Err(GatewayError::Config(ConfigError::MissingConnectionString))
        ));
        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(connector.released.load(Ordering::SeqCst), 0);
    }
}
