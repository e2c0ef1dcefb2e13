use crate::entities::{files, prelude::*};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

/// Field set for a record about to be persisted; `id` and `created_at`
/// are assigned by the store.
pub struct NewFileRecord {
    pub name: String,
    pub path: String,
    pub url: String,
    pub size: String,
    pub mimetype: String,
    pub storage_class: String,
    pub modified: String,
    pub delete_key: Option<String>,
}

/// Repository over the `files` table: the metadata-store capability.
#[derive(Clone)]
pub struct FileRecords {
    db: DatabaseConnection,
}

impl FileRecords {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<files::Model>, DbErr> {
        Files::find()
            .filter(files::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    pub async fn find_by_path(&self, path: &str) -> Result<Option<files::Model>, DbErr> {
        Files::find()
            .filter(files::Column::Path.eq(path))
            .one(&self.db)
            .await
    }

    /// Inserts a record, atomically replacing `previous` when a collision on
    /// the generated name was detected. The delete + insert pair runs in one
    /// transaction so the unique index on `name` is never violated by an
    /// interleaved writer observing both rows.
    pub async fn replace(
        &self,
        previous: Option<&files::Model>,
        record: NewFileRecord,
    ) -> Result<files::Model, DbErr> {
        let txn = self.db.begin().await?;

        if let Some(old) = previous {
            Files::delete_by_id(&old.id).exec(&txn).await?;
        }

        let model = files::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(record.name),
            path: Set(record.path),
            url: Set(record.url),
            size: Set(record.size),
            mimetype: Set(record.mimetype),
            storage_class: Set(record.storage_class),
            modified: Set(record.modified),
            delete_key: Set(record.delete_key),
            created_at: Set(Utc::now()),
        };

        let inserted = model.insert(&txn).await?;
        txn.commit().await?;

        Ok(inserted)
    }

    pub async fn delete(&self, record: files::Model) -> Result<(), DbErr> {
        record.delete(&self.db).await?;
        Ok(())
    }
}
