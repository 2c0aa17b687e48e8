//! Row-streaming cursor over a pooled connection.

use async_trait::async_trait;
use deadpool_postgres::{Object, Pool};
use futures::StreamExt;
use std::marker::PhantomData;
use std::pin::Pin;
use tokio_postgres::RowStream;
use tokio_postgres::types::ToSql;

use crate::database::error::StorageError;
use crate::database::models::FromRow;
use crate::database::repository::Cursor;

/// Streams rows lazily. The pooled connection is held until the stream ends
/// or the cursor is closed, then returned to the pool.
pub struct PgCursor<T> {
    rows: Option<Pin<Box<RowStream>>>,
    client: Option<Object>,
    query: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PgCursor<T> {
    pub async fn open(
        pool: &Pool,
        query: &'static str,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Self, StorageError> {
        let client = pool.get().await?;
        let rows = client
            .query_raw(query, slice_iter(params))
            .await
            .map_err(|e| StorageError::query(query, e))?;

        Ok(Self {
            rows: Some(Box::pin(rows)),
            client: Some(client),
            query,
            _marker: PhantomData,
        })
    }

    fn release(&mut self) {
        self.rows = None;
        self.client = None;
    }
}

#[async_trait]
impl<T: FromRow + Send + 'static> Cursor<T> for PgCursor<T> {
    async fn next(&mut self) -> Result<Option<T>, StorageError> {
        let Some(rows) = self.rows.as_mut() else {
            return Ok(None);
        };

        match rows.next().await {
            Some(Ok(row)) => T::from_row(&row)
                .map(Some)
                .map_err(|e| StorageError::query(self.query, e)),
            Some(Err(e)) => {
                self.release();
                Err(StorageError::query(self.query, e))
            }
            None => {
                self.release();
                Ok(None)
            }
        }
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        self.release();
        Ok(())
    }
}

fn slice_iter<'a>(
    s: &'a [&'a (dyn ToSql + Sync)],
) -> impl ExactSizeIterator<Item = &'a dyn ToSql> + 'a {
    s.iter().map(|s| *s as _)
}
