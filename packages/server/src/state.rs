use std::sync::Arc;

use common::storage::filesystem::FilesystemAttachmentStore;
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::database::init_db;
use crate::services::ItemService;
use crate::store::SeaOrmItemStore;

#[derive(Clone)]
pub struct AppState {
    pub items: ItemService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection, attachments: FilesystemAttachmentStore) -> Self {
        Self {
            items: ItemService::new(
                Arc::new(SeaOrmItemStore::new(db)),
                Arc::new(attachments),
            ),
            config: Arc::new(config),
        }
    }

    /// Connect to the database, prepare the upload directory and wire up the
    /// item service.
    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let db = init_db(&config.database).await?;
        let attachments = FilesystemAttachmentStore::from_config(&config.storage).await?;
        Ok(Self::new(config, db, attachments))
    }
}
