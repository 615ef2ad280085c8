use crate::models::{AnswerSegment, CustomQuestion, Difficulty, Practicality, QaPair, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};
use std::sync::Arc;
use uuid::Uuid;

/// Repository Trait
///
/// Persistence contract for user profiles and user-authored questions.
/// Handlers and the auth extractor only see this trait, so tests swap in
/// in-memory implementations.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- User/Auth ---
    async fn get_user(&self, id: Uuid) -> Option<User>;
    async fn create_user(&self, user: User) -> Option<User>;

    // --- Custom Questions (Owner-Only) ---
    async fn count_custom_questions(&self, user_id: Uuid) -> i64;
    async fn get_custom_questions(&self, user_id: Uuid) -> Vec<CustomQuestion>;
    async fn add_custom_question(
        &self,
        user_id: Uuid,
        topic: String,
        question: QaPair,
    ) -> Option<CustomQuestion>;
    // Deletes only if `user_id` owns the question.
    async fn delete_custom_question(&self, id: Uuid, user_id: Uuid) -> bool;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the application state.
pub type RepositoryState = Arc<dyn Repository>;

/// Raw `custom_questions` row before the enum columns are validated.
#[derive(Debug, FromRow)]
struct CustomQuestionRow {
    id: Uuid,
    user_id: Uuid,
    topic: String,
    question: String,
    answer: Json<Vec<AnswerSegment>>,
    difficulty: i16,
    practicality: i16,
    tags: Vec<String>,
    estimated_time: i32,
    resources: Vec<String>,
    created_at: DateTime<Utc>,
}

impl CustomQuestionRow {
    fn into_custom_question(self) -> Option<CustomQuestion> {
        let difficulty = u8::try_from(self.difficulty)
            .ok()
            .and_then(|d| Difficulty::try_from(d).ok())?;
        let practicality = u8::try_from(self.practicality)
            .ok()
            .and_then(|p| Practicality::try_from(p).ok())?;
        let estimated_time = u32::try_from(self.estimated_time).ok()?;

        Some(CustomQuestion {
            id: self.id,
            user_id: self.user_id,
            topic: self.topic,
            question: QaPair {
                question: self.question,
                answer: self.answer.0,
                difficulty,
                practicality,
                tags: self.tags,
                estimated_time,
                resources: self.resources,
            },
            created_at: self.created_at,
        })
    }
}

const CUSTOM_QUESTION_COLUMNS: &str = "id, user_id, topic, question, answer, difficulty, \
     practicality, tags, estimated_time, resources, created_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> Option<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, username, full_name, image_url, role FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("get_user error: {:?}", e);
            None
        })
    }

    /// Creates the mirrored profile after the auth provider accepted the sign-up.
    async fn create_user(&self, user: User) -> Option<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO profiles (id, email, username, full_name, image_url, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, username, full_name, image_url, role
            "#,
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.username)
        .bind(user.full_name)
        .bind(user.image_url)
        .bind(user.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| tracing::error!("create_user error: {:?}", e))
        .ok()
    }

    async fn count_custom_questions(&self, user_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM custom_questions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .unwrap_or_else(|e| {
                tracing::error!("count_custom_questions error: {:?}", e);
                0
            })
    }

    /// Newest first. Rows with out-of-range enum columns are logged and skipped.
    async fn get_custom_questions(&self, user_id: Uuid) -> Vec<CustomQuestion> {
        let query = format!(
            "SELECT {} FROM custom_questions WHERE user_id = $1 ORDER BY created_at DESC",
            CUSTOM_QUESTION_COLUMNS
        );
        let rows = match sqlx::query_as::<_, CustomQuestionRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("get_custom_questions error: {:?}", e);
                return vec![];
            }
        };

        rows.into_iter()
            .filter_map(|row| {
                let id = row.id;
                let question = row.into_custom_question();
                if question.is_none() {
                    tracing::error!("custom question {} has invalid columns", id);
                }
                question
            })
            .collect()
    }

    async fn add_custom_question(
        &self,
        user_id: Uuid,
        topic: String,
        question: QaPair,
    ) -> Option<CustomQuestion> {
        let query = format!(
            r#"
            INSERT INTO custom_questions
                (id, user_id, topic, question, answer, difficulty, practicality, tags, estimated_time, resources, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW())
            RETURNING {}
            "#,
            CUSTOM_QUESTION_COLUMNS
        );
        let estimated_time = i32::try_from(question.estimated_time).ok()?;

        sqlx::query_as::<_, CustomQuestionRow>(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(topic)
            .bind(question.question)
            .bind(Json(question.answer))
            .bind(u8::from(question.difficulty) as i16)
            .bind(u8::from(question.practicality) as i16)
            .bind(question.tags)
            .bind(estimated_time)
            .bind(question.resources)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| tracing::error!("add_custom_question error: {:?}", e))
            .ok()
            .and_then(CustomQuestionRow::into_custom_question)
    }

    async fn delete_custom_question(&self, id: Uuid, user_id: Uuid) -> bool {
        match sqlx::query("DELETE FROM custom_questions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await
        {
            Ok(res) => res.rows_affected() > 0,
            Err(e) => {
                tracing::error!("delete_custom_question error: {:?}", e);
                false
            }
        }
    }
}
