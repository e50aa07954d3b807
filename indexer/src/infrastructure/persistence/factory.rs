use sea_orm::DatabaseConnection;

use crate::infrastructure::persistence::connection::DbPool;
use crate::infrastructure::persistence::repositories::{CheckpointRepository, Repositories};

/// Factory for creating repositories
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create all repositories
    pub fn create_repositories(db_pool: &DbPool) -> Repositories {
        let conn = db_pool.get_connection().clone();
        Repositories::new(Self::create_checkpoint_repository(conn))
    }

    /// Create a checkpoint repository
    pub fn create_checkpoint_repository(conn: DatabaseConnection) -> CheckpointRepository {
        CheckpointRepository::new(conn)
    }
}
