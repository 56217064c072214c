//! PostgreSQL store
//!
//! One process-wide `PgPool` shared by all requests. Multi-statement writes
//! run in a `sqlx::Transaction`; an early return through `?` drops the
//! transaction, which rolls it back before the connection is reused.

use sqlx::postgres::PgPool;
use tracing::{debug, info};

use super::config::DatabaseConfig;
use super::errors::StoreResult;
use super::fault_point::{points, FaultInjector};
use super::records::{
    DataWrite, ExercisePatch, LessonPatch, LessonRecord, NewSection, NewSuperLesson,
    SectionPatch, SectionRecord, SuperLessonPatch, SuperLessonRecord,
};
use super::{LessonStore, StoreFuture};
use crate::tree::TreeRow;

/// Aggregate query feeding the tree builder. The ORDER BY is part of the
/// builder's input contract.
pub const TREE_QUERY: &str = r#"
SELECT
    sl.id AS super_id,
    sl.title AS super_title,
    sl.description AS super_description,
    s.id AS section_id,
    s.title AS section_title,
    s.position AS section_position,
    l.id AS lesson_id,
    l.title AS lesson_title,
    l.intro AS lesson_intro,
    l.before_exercise AS lesson_before_exercise,
    l.outro AS lesson_outro,
    l.section_id AS lesson_section_id,
    l.created_at AS lesson_created_at,
    l.updated_at AS lesson_updated_at,
    e.id AS exercise_id,
    e.lesson_id AS exercise_lesson_id,
    e.type AS exercise_type,
    e.question AS exercise_question,
    e.created_at AS exercise_created_at,
    ed.id AS data_id,
    ed.data AS data
FROM superLessons sl
LEFT JOIN sections s ON s.super_lesson_id = sl.id
LEFT JOIN lessons l ON l.section_id = s.id
LEFT JOIN exercises e ON e.lesson_id = l.id
LEFT JOIN exercise_data ed ON ed.exercise_id = e.id
ORDER BY sl.id ASC, s.position ASC NULLS LAST, s.id ASC, l.id ASC, e.id ASC
"#;

const LESSON_COLUMNS: &str =
    "id, title, intro, before_exercise, outro, section_id, created_at, updated_at";

/// PostgreSQL-backed [`LessonStore`]
pub struct PgLessonStore {
    pool: PgPool,
    faults: FaultInjector,
}

impl PgLessonStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            faults: FaultInjector::from_env(),
        }
    }

    /// Open the pool. Fails fast if the first connection cannot be made.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await?;

        info!(
            target_db = %config.display_target(),
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn faults(&self) -> &FaultInjector {
        &self.faults
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

impl LessonStore for PgLessonStore {
    fn fetch_tree_rows(&self) -> StoreFuture<'_, Vec<TreeRow>> {
        Box::pin(async move {
            let rows = sqlx::query_as::<_, TreeRow>(TREE_QUERY)
                .fetch_all(&self.pool)
                .await?;
            debug!(rows = rows.len(), "Fetched tree rows");
            Ok(rows)
        })
    }

    fn create_super_lesson(&self, new: NewSuperLesson) -> StoreFuture<'_, SuperLessonRecord> {
        Box::pin(async move {
            let record = sqlx::query_as::<_, SuperLessonRecord>(
                "INSERT INTO superLessons (title, description) VALUES ($1, $2) \
                 RETURNING id, title, description",
            )
            .bind(new.title)
            .bind(new.description)
            .fetch_one(&self.pool)
            .await?;
            Ok(record)
        })
    }

    fn update_super_lesson(
        &self,
        id: i64,
        patch: SuperLessonPatch,
    ) -> StoreFuture<'_, Option<SuperLessonRecord>> {
        Box::pin(async move {
            let record = sqlx::query_as::<_, SuperLessonRecord>(
                "UPDATE superLessons \
                 SET title = COALESCE($1, title), \
                     description = CASE WHEN $2 THEN $3 ELSE description END, \
                     updated_at = NOW() \
                 WHERE id = $4 \
                 RETURNING id, title, description",
            )
            .bind(patch.title)
            .bind(patch.description.is_some())
            .bind(patch.description.flatten())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(record)
        })
    }

    fn delete_super_lesson(&self, id: i64) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM superLessons WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        })
    }

    fn create_section(&self, new: NewSection) -> StoreFuture<'_, SectionRecord> {
        Box::pin(async move {
            let record = sqlx::query_as::<_, SectionRecord>(
                "INSERT INTO sections (super_lesson_id, title, position) VALUES ($1, $2, $3) \
                 RETURNING id, title, position",
            )
            .bind(new.super_lesson_id)
            .bind(new.title)
            .bind(new.position)
            .fetch_one(&self.pool)
            .await?;
            Ok(record)
        })
    }

    fn update_section(
        &self,
        id: i64,
        patch: SectionPatch,
    ) -> StoreFuture<'_, Option<SectionRecord>> {
        Box::pin(async move {
            let record = sqlx::query_as::<_, SectionRecord>(
                "UPDATE sections \
                 SET title = COALESCE($1, title), \
                     position = COALESCE($2, position), \
                     updated_at = NOW() \
                 WHERE id = $3 \
                 RETURNING id, title, position",
            )
            .bind(patch.title)
            .bind(patch.position)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(record)
        })
    }

    fn delete_section(&self, id: i64) -> StoreFuture<'_, u64> {
        Box::pin(async move {
            let result = sqlx::query("DELETE FROM sections WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected())
        })
    }

    fn delete_lesson(&self, id: i64) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                "DELETE FROM exercise_data \
                 WHERE exercise_id IN (SELECT id FROM exercises WHERE lesson_id = $1)",
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;

            let exercises = sqlx::query("DELETE FROM exercises WHERE lesson_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            if let Err(err) = self.faults.check(points::LESSON_AFTER_EXERCISES_DELETE) {
                tx.rollback().await?;
                return Err(err);
            }

            let deleted = sqlx::query("DELETE FROM lessons WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            if deleted == 0 {
                tx.rollback().await?;
                return Ok(false);
            }

            tx.commit().await?;
            debug!(lesson_id = id, exercises, "Deleted lesson");
            Ok(true)
        })
    }

    fn update_lesson(&self, id: i64, patch: LessonPatch) -> StoreFuture<'_, Option<LessonRecord>> {
        Box::pin(async move {
            let sql = format!(
                "UPDATE lessons \
                 SET title = COALESCE($1, title), \
                     intro = COALESCE($2, intro), \
                     before_exercise = COALESCE($3, before_exercise), \
                     outro = COALESCE($4, outro), \
                     updated_at = NOW() \
                 WHERE id = $5 \
                 RETURNING {}",
                LESSON_COLUMNS
            );
            let record = sqlx::query_as::<_, LessonRecord>(&sql)
                .bind(patch.title)
                .bind(patch.intro)
                .bind(patch.before_exercise)
                .bind(patch.outro)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(record)
        })
    }

    fn delete_exercise(&self, id: i64) -> StoreFuture<'_, bool> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await?;

            sqlx::query("DELETE FROM exercise_data WHERE exercise_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            if let Err(err) = self.faults.check(points::EXERCISE_AFTER_DATA_DELETE) {
                tx.rollback().await?;
                return Err(err);
            }

            let deleted = sqlx::query("DELETE FROM exercises WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            if deleted == 0 {
                tx.rollback().await?;
                return Ok(false);
            }

            tx.commit().await?;
            debug!(exercise_id = id, "Deleted exercise");
            Ok(true)
        })
    }

    fn update_exercise(&self, id: i64, patch: ExercisePatch) -> StoreFuture<'_, DataWrite> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await?;

            if patch.touches_exercise_row() {
                sqlx::query(
                    "UPDATE exercises \
                     SET type = COALESCE($1, type), question = COALESCE($2, question) \
                     WHERE id = $3",
                )
                .bind(patch.kind)
                .bind(patch.question)
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }

            if let Err(err) = self.faults.check(points::EXERCISE_AFTER_ROW_UPDATE) {
                tx.rollback().await?;
                return Err(err);
            }

            // Update-then-insert; racy without a unique index on exercise_id
            let write = match patch.data_content {
                None => DataWrite::Skipped,
                Some(content) => {
                    let updated =
                        sqlx::query("UPDATE exercise_data SET data = $1 WHERE exercise_id = $2")
                            .bind(&content)
                            .bind(id)
                            .execute(&mut *tx)
                            .await?
                            .rows_affected();

                    if updated == 0 {
                        sqlx::query("INSERT INTO exercise_data (exercise_id, data) VALUES ($1, $2)")
                            .bind(id)
                            .bind(&content)
                            .execute(&mut *tx)
                            .await?;
                        DataWrite::Inserted
                    } else {
                        DataWrite::Updated
                    }
                }
            };

            tx.commit().await?;
            debug!(exercise_id = id, data = ?write, "Updated exercise");
            Ok(write)
        })
    }
}
