use async_trait::async_trait;

use quiz_core::model::{ResultId, ResultRecord};

use super::SqliteRepository;
use super::mapping::{map_result_row, result_id_from_i64};
use crate::repository::{ResultRepository, ResultRow, StorageError};

#[async_trait]
impl ResultRepository for SqliteRepository {
    async fn append_result(&self, record: &ResultRecord) -> Result<ResultId, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_results (student_name, score, total_questions, submitted_at)
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(record.student_name())
        .bind(i64::from(record.score()))
        .bind(i64::from(record.total_questions()))
        .bind(record.submitted_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        result_id_from_i64(res.last_insert_rowid())
    }

    async fn list_results(&self, limit: u32) -> Result<Vec<ResultRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, student_name, score, total_questions, submitted_at
                FROM quiz_results
                ORDER BY submitted_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }
}
