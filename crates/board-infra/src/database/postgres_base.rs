use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DbConn, DbErr, EntityTrait, IntoActiveModel,
    PrimaryKeyTrait, SqlErr,
};

use board_core::error::RepoError;
use board_core::ports::BaseRepository;

/// Map a SeaORM error, surfacing unique and foreign key violations as constraints.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    if let Some(violation) = err.sql_err().and_then(constraint_violation) {
        return violation;
    }

    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        DbErr::RecordNotFound(_) => RepoError::NotFound,
        other => RepoError::Query(other.to_string()),
    }
}

fn constraint_violation(err: SqlErr) -> Option<RepoError> {
    match err {
        SqlErr::UniqueConstraintViolation(msg) | SqlErr::ForeignKeyConstraintViolation(msg) => {
            Some(RepoError::Constraint(msg))
        }
        _ => None,
    }
}

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id).one(&self.db).await.map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();

        // Every column is `Set`, so try the update first and insert when no row matched.
        let model = match active_model.clone().update(&self.db).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => {
                active_model.insert(&self.db).await.map_err(map_db_err)?
            }
            Err(e) => return Err(map_db_err(e)),
        };

        Ok(model.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_violations_map_to_constraint() {
        let unique = SqlErr::UniqueConstraintViolation(
            "duplicate key value violates unique constraint \"post_reports_post_id_reporter_id_key\"".into(),
        );
        assert!(matches!(
            constraint_violation(unique),
            Some(RepoError::Constraint(msg)) if msg.contains("post_reports")
        ));

        let foreign = SqlErr::ForeignKeyConstraintViolation("posts_created_by_fkey".into());
        assert!(matches!(
            constraint_violation(foreign),
            Some(RepoError::Constraint(_))
        ));
    }

    #[test]
    fn test_other_errors_keep_their_kind() {
        assert!(matches!(
            map_db_err(DbErr::RecordNotFound("post".into())),
            RepoError::NotFound
        ));
        assert!(matches!(
            map_db_err(DbErr::Custom("syntax error".into())),
            RepoError::Query(_)
        ));
    }
}
