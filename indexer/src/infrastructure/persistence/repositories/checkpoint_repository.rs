use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::infrastructure::persistence::entities::checkpoint;
use crate::infrastructure::persistence::error::DbError;

/// Repository for the per-chain ingestion checkpoint
#[derive(Clone, Debug)]
pub struct CheckpointRepository {
    conn: DatabaseConnection,
}

impl CheckpointRepository {
    /// Create a new CheckpointRepository
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get the next height to process for a chain
    pub async fn get_checkpoint(&self, chain_id: &str) -> Result<Option<u64>, DbError> {
        let result = checkpoint::Entity::find()
            .filter(checkpoint::Column::ChainId.eq(chain_id))
            .one(&self.conn)
            .await?;

        Ok(result.map(|c| c.next_height as u64))
    }

    /// Store the checkpoint, refusing to move it backwards
    pub async fn save_checkpoint(&self, chain_id: &str, height: u64) -> Result<(), DbError> {
        let now = Utc::now().naive_utc();
        let existing = checkpoint::Entity::find()
            .filter(checkpoint::Column::ChainId.eq(chain_id))
            .one(&self.conn)
            .await?;

        match existing {
            Some(current) => {
                if (height as i64) < current.next_height {
                    return Err(DbError::QueryError(format!(
                        "checkpoint for {} cannot move backwards from {} to {}",
                        chain_id, current.next_height, height
                    )));
                }

                let mut active_model: checkpoint::ActiveModel = current.into();
                active_model.next_height = Set(height as i64);
                active_model.date_updated = Set(now);
                active_model.update(&self.conn).await?;
            }
            None => {
                let model = checkpoint::ActiveModel {
                    chain_id: Set(chain_id.to_string()),
                    next_height: Set(height as i64),
                    date_updated: Set(now),
                    ..Default::default()
                };
                model.insert(&self.conn).await?;
            }
        }

        Ok(())
    }
}
