//! # Document Repository
//!
//! Stores file metadata for machines. A document reaches its company only
//! through its machine.

use crate::error::RepositoryError;
use crate::models::company::{Entity as Company, Model as CompanyModel};
use crate::models::document::{
    self, ActiveModel as DocumentActiveModel, Entity as Document, Model as DocumentModel,
};
use crate::models::machine::{self, Entity as Machine, Model as MachineModel};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

/// Field set for creating a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInput {
    pub title: String,
    pub description: Option<String>,
    pub doc_type: Option<String>,
    pub file_path: String,
    pub file_name: Option<String>,
    pub file_size: Option<i64>,
    pub mime_type: Option<String>,
    pub machine_id: i32,
}

impl DocumentInput {
    /// Input with only the required fields set
    pub fn new<T: Into<String>, P: Into<String>>(title: T, file_path: P, machine_id: i32) -> Self {
        Self {
            title: title.into(),
            description: None,
            doc_type: None,
            file_path: file_path.into(),
            file_name: None,
            file_size: None,
            mime_type: None,
            machine_id,
        }
    }
}

/// Repository for Document database operations
pub struct DocumentRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DocumentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, input: DocumentInput) -> Result<DocumentModel, RepositoryError> {
        validate_document(&input)?;

        let now = Utc::now();
        let document = DocumentActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            doc_type: Set(input.doc_type),
            file_path: Set(input.file_path),
            file_name: Set(input.file_name),
            file_size: Set(input.file_size),
            mime_type: Set(input.mime_type),
            machine_id: Set(input.machine_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let created = document
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::info!(
            document_id = created.id,
            machine_id = created.machine_id,
            "Document created"
        );
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<DocumentModel>, RepositoryError> {
        Document::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list_for_machine(
        &self,
        machine_id: i32,
    ) -> Result<Vec<DocumentModel>, RepositoryError> {
        Document::find()
            .filter(document::Column::MachineId.eq(machine_id))
            .order_by_asc(document::Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = Document::delete_by_id(id)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("Document", id));
        }

        Ok(())
    }

    pub async fn machine_of(
        &self,
        document: &DocumentModel,
    ) -> Result<MachineModel, RepositoryError> {
        document
            .find_related(Machine)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::not_found("Machine", document.machine_id))
    }

    /// Owning company, resolved through the document's machine
    pub async fn company_of(
        &self,
        document: &DocumentModel,
    ) -> Result<CompanyModel, RepositoryError> {
        Company::find()
            .inner_join(Machine)
            .filter(machine::Column::Id.eq(document.machine_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::not_found("Machine", document.machine_id))
    }
}

fn validate_document(input: &DocumentInput) -> Result<(), RepositoryError> {
    if input.title.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            "Document title cannot be empty",
        ));
    }

    if input.file_path.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            "Document file path cannot be empty",
        ));
    }

    if input.file_size.is_some_and(|size| size < 0) {
        return Err(RepositoryError::validation_error(
            "Document file size cannot be negative",
        ));
    }

    Ok(())
}
