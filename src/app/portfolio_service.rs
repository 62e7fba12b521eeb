//! The Portfolio Service.
//!
//! This module sits between the HTTP handlers and storage. It is responsible for:
//! 1.  Translating each API operation into a single document store call.
//! 2.  Validating client input against the typed piece/info schemas before anything is written.
//! 3.  Keeping uploaded image files and their `photos` metadata in step.

use crate::app::error::{ServiceError, ServiceResult};
use crate::domain::category::title_case;
use crate::domain::model::{
    decode_all, Info, InfoField, InfoUpdate, Photo, Piece, PieceField, PieceReplacement,
    PieceUpdate, StoredModel,
};
use crate::storage::{
    Collection, DocumentStore, FileStore, FileStoreError, Filter, StoreError,
};
use chrono::Utc;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// One file from an `/upload` form, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// One stateless façade per process, shared by every request.
pub struct PortfolioService {
    store: Arc<dyn DocumentStore>,
    files: FileStore,
    max_upload_bytes: usize,
}

fn parse_id(raw: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ServiceError::Invalid(format!("'{}' is not a valid record id", raw)))
}

fn name_filter(name: &str) -> Filter {
    Filter::FieldEq(PieceField::Name.as_str(), JsonValue::from(name))
}

fn photo_filter(filename: &str) -> Filter {
    Filter::FieldEq(Photo::FILENAME_FIELD, JsonValue::from(filename))
}

impl PortfolioService {
    pub fn new(store: Arc<dyn DocumentStore>, files: FileStore, max_upload_bytes: usize) -> Self {
        Self {
            store,
            files,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub async fn ping(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    async fn find_one<T: StoredModel>(&self, filter: &Filter) -> ServiceResult<Option<T>> {
        let doc = self.store.find_one(T::COLLECTION, filter).await?;
        Ok(doc.map(T::from_document).transpose()?)
    }

    async fn find_all<T: StoredModel>(&self, filter: &Filter) -> ServiceResult<Vec<T>> {
        let docs = self.store.find(T::COLLECTION, filter).await?;
        Ok(decode_all(docs)?)
    }

    // --- reads -----------------------------------------------------------------------------

    /// Looks a piece up by name, falling back to its id when `key` parses as one.
    pub async fn find_piece(&self, key: &str) -> ServiceResult<Option<Piece>> {
        if let Some(piece) = self.find_piece_by_name(key).await? {
            return Ok(Some(piece));
        }
        match Uuid::parse_str(key) {
            Ok(id) => self.find_piece_by_id(id).await,
            Err(_) => Ok(None),
        }
    }

    pub async fn find_piece_by_name(&self, name: &str) -> ServiceResult<Option<Piece>> {
        self.find_one(&name_filter(name)).await
    }

    pub async fn find_piece_by_id(&self, id: Uuid) -> ServiceResult<Option<Piece>> {
        self.find_one(&Filter::Id(id)).await
    }

    pub async fn list_pieces(&self) -> ServiceResult<Vec<Piece>> {
        self.find_all(&Filter::All).await
    }

    pub async fn list_info(&self) -> ServiceResult<Vec<Info>> {
        self.find_all(&Filter::All).await
    }

    pub async fn list_photos(&self) -> ServiceResult<Vec<Photo>> {
        self.find_all(&Filter::All).await
    }

    /// Pieces whose stored category equals the title-cased slug.
    pub async fn pieces_in_category(&self, slug: &str) -> ServiceResult<Vec<Piece>> {
        let label = title_case(slug);
        self.find_all(&Filter::FieldEq(
            PieceField::Category.as_str(),
            JsonValue::from(label),
        ))
        .await
    }

    pub async fn featured_pieces(&self) -> ServiceResult<Vec<Piece>> {
        self.find_all(&Filter::FieldEq(
            PieceField::Featured.as_str(),
            JsonValue::Bool(true),
        ))
        .await
    }

    /// Attribute names a piece can carry.
    pub fn piece_keys(&self) -> Vec<&'static str> {
        Piece::keys().to_vec()
    }

    // --- piece writes ----------------------------------------------------------------------

    /// Sets `featured` on the first piece called `name`.
    pub async fn set_featured(&self, name: &str, value: &JsonValue) -> ServiceResult<Piece> {
        let update = PieceUpdate::new(PieceField::Featured, value)?;
        let doc = self
            .store
            .merge_one(Collection::Pieces, &name_filter(name), update.to_fields())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no piece named '{}'", name)))?;
        Ok(Piece::from_document(doc)?)
    }

    pub async fn add_piece(&self, name: &str) -> ServiceResult<Piece> {
        let update = PieceUpdate::new(PieceField::Name, &JsonValue::from(name))?;
        let doc = self
            .store
            .insert_one(Collection::Pieces, update.to_fields())
            .await?;
        info!(piece_id = %doc.id, name = %name, "Piece created");
        Ok(Piece::from_document(doc)?)
    }

    /// Replaces every attribute of the first piece whose title is `title`.
    pub async fn replace_piece_by_title(
        &self,
        title: &str,
        replacement: PieceReplacement,
    ) -> ServiceResult<Piece> {
        let filter = Filter::FieldEq(PieceField::Title.as_str(), JsonValue::from(title));
        let current: Piece = self
            .find_one(&filter)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no piece titled '{}'", title)))?;

        let replaced = replacement.into_piece(current.id)?;
        let doc = self
            .store
            .replace_one(Collection::Pieces, current.id, replaced.to_fields())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("piece {} vanished", current.id)))?;
        Ok(Piece::from_document(doc)?)
    }

    /// Sets one allow-listed attribute on the piece with `id`.
    pub async fn update_piece_field(
        &self,
        id: &str,
        key: &str,
        value: &JsonValue,
    ) -> ServiceResult<Piece> {
        let id = parse_id(id)?;
        let field: PieceField = key.parse()?;
        let update = PieceUpdate::new(field, value)?;

        let doc = self
            .store
            .merge_one(Collection::Pieces, &Filter::Id(id), update.to_fields())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no piece with id {}", id)))?;
        Ok(Piece::from_document(doc)?)
    }

    /// Removes every piece called `name`; returns how many went.
    pub async fn delete_pieces_by_name(&self, name: &str) -> ServiceResult<u64> {
        let removed = self
            .store
            .delete_many(Collection::Pieces, &name_filter(name))
            .await?;
        if removed == 0 {
            return Err(ServiceError::NotFound(format!("no piece named '{}'", name)));
        }
        info!(name = %name, removed, "Pieces deleted");
        Ok(removed)
    }

    // --- info writes -----------------------------------------------------------------------

    pub async fn update_info_field(
        &self,
        id: &str,
        key: &str,
        value: &JsonValue,
    ) -> ServiceResult<Info> {
        let id = parse_id(id)?;
        let field: InfoField = key.parse()?;
        let update = InfoUpdate::new(field, value)?;

        let doc = self
            .store
            .merge_one(Collection::Info, &Filter::Id(id), update.to_fields())
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no info record with id {}", id)))?;
        Ok(Info::from_document(doc)?)
    }

    // --- images ----------------------------------------------------------------------------

    /// Checks an incoming file against the upload policy before anything touches disk.
    pub fn check_upload(&self, name: &str, content_type: &str, size: usize) -> ServiceResult<()> {
        if !content_type.trim().to_lowercase().starts_with("image/") {
            return Err(ServiceError::UnsupportedType {
                name: name.to_string(),
                content_type: content_type.to_string(),
            });
        }
        if size > self.max_upload_bytes {
            return Err(ServiceError::TooLarge {
                name: name.to_string(),
                size,
                max: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// Stores every file of one upload, or none of them.
    ///
    /// All files are checked before the first write; a failure while storing rolls back the
    /// files and metadata already written for this upload.
    pub async fn store_uploads(&self, uploads: &[UploadedFile]) -> ServiceResult<Vec<Photo>> {
        for upload in uploads {
            self.check_upload(&upload.original_name, &upload.content_type, upload.bytes.len())?;
        }

        let mut stored: Vec<Photo> = Vec::with_capacity(uploads.len());
        for upload in uploads {
            match self.store_upload(upload).await {
                Ok(photo) => stored.push(photo),
                Err(e) => {
                    for photo in &stored {
                        self.discard_upload(&photo.filename).await;
                    }
                    return Err(e);
                }
            }
        }
        Ok(stored)
    }

    async fn store_upload(&self, upload: &UploadedFile) -> ServiceResult<Photo> {
        let size = upload.bytes.len();
        let filename = self.files.save(&upload.original_name, &upload.bytes).await?;
        let photo = Photo {
            id: Uuid::nil(),
            filename: filename.clone(),
            original_name: upload.original_name.clone(),
            content_type: upload.content_type.clone(),
            size: size as u64,
            uploaded_at: Utc::now(),
        };

        let doc = match self
            .store
            .insert_one(Collection::Photos, photo.to_fields())
            .await
        {
            Ok(doc) => doc,
            Err(e) => {
                // Don't leave a file behind that nothing references.
                if let Err(cleanup) = self.files.delete(&filename).await {
                    warn!(filename = %filename, error = %cleanup, "Failed to remove orphaned upload");
                }
                return Err(e.into());
            }
        };

        info!(filename = %filename, size, "Image uploaded");
        Ok(Photo::from_document(doc)?)
    }

    /// Best-effort removal of a stored upload and its metadata.
    async fn discard_upload(&self, filename: &str) {
        if let Err(e) = self
            .store
            .delete_many(Collection::Photos, &photo_filter(filename))
            .await
        {
            warn!(filename = %filename, error = %e, "Failed to remove upload metadata");
        }
        if let Err(e) = self.files.delete(filename).await {
            warn!(filename = %filename, error = %e, "Failed to remove upload file");
        }
    }

    /// Removes an image file together with its metadata record.
    pub async fn delete_image(&self, filename: &str) -> ServiceResult<()> {
        if !crate::storage::files::is_plain_file_name(filename) {
            return Err(FileStoreError::InvalidName(filename.to_string()).into());
        }

        let records = self
            .store
            .delete_many(Collection::Photos, &photo_filter(filename))
            .await?;

        match self.files.delete(filename).await {
            Ok(()) => {}
            // Metadata without a file is stale; removing it is enough.
            Err(FileStoreError::NotFound(_)) if records > 0 => {
                warn!(filename = %filename, "Image metadata had no file on disk");
            }
            Err(e) => return Err(e.into()),
        }

        info!(filename = %filename, records, "Image deleted");
        Ok(())
    }
}
