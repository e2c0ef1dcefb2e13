use crate::services::classifier::MimeClassifier;
use crate::services::naming::ObjectNamer;
use crate::services::records::FileRecords;
use crate::services::storage::StorageGateway;

pub mod delete;
pub mod upload;

pub use delete::{DeleteOutcome, LookupOutcome};
pub use upload::{UploadOutcome, UploadRequest};

/// Composes naming, classification, the storage gateway and the metadata
/// store into the admission and deletion pipelines.
pub struct FileService {
    records: FileRecords,
    gateway: StorageGateway,
    classifier: MimeClassifier,
    namer: ObjectNamer,
}

impl FileService {
    pub fn new(
        records: FileRecords,
        gateway: StorageGateway,
        classifier: MimeClassifier,
        namer: ObjectNamer,
    ) -> Self {
        Self {
            records,
            gateway,
            classifier,
            namer,
        }
    }
}
