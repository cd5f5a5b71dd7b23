use async_trait::async_trait;
use sqlx::Row;

use quiz_core::model::{Question, QuestionId};

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_question_row, options_to_json, question_id_from_i64, ser};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait]
impl QuestionRepository for SqliteRepository {
    async fn list_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, prompt, options, correct_answer
                FROM questions
                ORDER BY position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_question_row(&row)?);
        }
        Ok(out)
    }

    async fn add_question(&self, question: &Question) -> Result<(), StorageError> {
        let id = id_to_i64("question_id", question.id().value())?;
        let options = options_to_json(question.options())?;

        let res = sqlx::query(
            r"
                INSERT INTO questions (id, position, prompt, options, correct_answer)
                VALUES (
                    ?1,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM questions),
                    ?2, ?3, ?4
                )
            ",
        )
        .bind(id)
        .bind(question.prompt())
        .bind(options)
        .bind(question.correct_answer())
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StorageError::Conflict)
            }
            Err(e) => Err(StorageError::Connection(e.to_string())),
        }
    }

    async fn remove_question_at(&self, index: usize) -> Result<(), StorageError> {
        let offset = i64::try_from(index)
            .map_err(|_| StorageError::Serialization("index overflow".into()))?;

        let row = sqlx::query(
            r"
                SELECT id FROM questions
                ORDER BY position ASC
                LIMIT 1 OFFSET ?1
            ",
        )
        .bind(offset)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        let id: i64 = row.try_get("id").map_err(ser)?;
        sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn next_question_id(&self) -> Result<QuestionId, StorageError> {
        let row = sqlx::query("SELECT COALESCE(MAX(id), 0) AS max_id FROM questions")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let max_id: i64 = row.try_get("max_id").map_err(ser)?;
        let next = question_id_from_i64(max_id)?;
        Ok(QuestionId::new(next.value() + 1))
    }
}
