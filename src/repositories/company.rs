//! # Company Repository
//!
//! CRUD operations for companies plus traversal to their machines and
//! documents. The machine count shown in listings is computed with a join, not
//! stored.

use crate::error::RepositoryError;
use crate::models::company::{
    self, ActiveModel as CompanyActiveModel, Entity as Company, Model as CompanyModel,
};
use crate::models::document::{self, Entity as Document};
use crate::models::machine::{self, Entity as Machine};
use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult,
    IntoActiveModel, ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

pub const NAME_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Validated field set used for both create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyInput {
    pub name: String,
    pub description: Option<String>,
}

/// Company row annotated with the number of machines referencing it
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct CompanyWithMachineCount {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub machines_count: i64,
}

/// Repository for Company database operations
pub struct CompanyRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All companies, newest first, each with its machine count
    pub async fn list_with_machine_count(
        &self,
    ) -> Result<Vec<CompanyWithMachineCount>, RepositoryError> {
        Company::find()
            .column_as(machine::Column::Id.count(), "machines_count")
            .left_join(Machine)
            .group_by(company::Column::Id)
            .order_by_desc(company::Column::CreatedAt)
            .order_by_desc(company::Column::Id)
            .into_model::<CompanyWithMachineCount>()
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Insert a new company stamped with the current time
    pub async fn create(&self, input: CompanyInput) -> Result<CompanyModel, RepositoryError> {
        validate_company(&input)?;

        let now = Utc::now();
        let company = CompanyActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let created = company
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::info!(company_id = created.id, "Company created");
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<CompanyModel>, RepositoryError> {
        Company::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Company with its machines eagerly loaded
    pub async fn find_with_machines(
        &self,
        id: i32,
    ) -> Result<(CompanyModel, Vec<machine::Model>), RepositoryError> {
        let company = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Company", id))?;

        let machines = self.machines_of(&company).await?;

        Ok((company, machines))
    }

    /// Overwrite name and description. An absent description clears the
    /// stored one; there is no partial update.
    pub async fn update(
        &self,
        id: i32,
        input: CompanyInput,
    ) -> Result<CompanyModel, RepositoryError> {
        validate_company(&input)?;

        let company = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Company", id))?;

        let mut active_company = company.into_active_model();
        active_company.name = Set(input.name);
        active_company.description = Set(input.description);
        active_company.updated_at = Set(Utc::now().into());

        let updated = active_company
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::info!(company_id = id, "Company updated");
        Ok(updated)
    }

    /// Hard delete; machines and their documents go with it via the
    /// foreign key cascade.
    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = Company::delete_by_id(id)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("Company", id));
        }

        tracing::info!(company_id = id, "Company deleted");
        Ok(())
    }

    pub async fn machines_of(
        &self,
        company: &CompanyModel,
    ) -> Result<Vec<machine::Model>, RepositoryError> {
        company
            .find_related(Machine)
            .order_by_asc(machine::Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Documents attached to any machine of the company
    pub async fn documents_of(
        &self,
        company: &CompanyModel,
    ) -> Result<Vec<document::Model>, RepositoryError> {
        Document::find()
            .inner_join(Machine)
            .filter(machine::Column::CompanyId.eq(company.id))
            .order_by_asc(document::Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn count(&self) -> Result<u64, RepositoryError> {
        Company::find()
            .count(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

fn validate_company(input: &CompanyInput) -> Result<(), RepositoryError> {
    if input.name.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            "Company name cannot be empty",
        ));
    }

    if input.name.chars().count() > NAME_MAX_CHARS {
        return Err(RepositoryError::validation_error(format!(
            "Company name cannot exceed {} characters",
            NAME_MAX_CHARS
        )));
    }

    if let Some(description) = &input.description
        && description.chars().count() > DESCRIPTION_MAX_CHARS
    {
        return Err(RepositoryError::validation_error(format!(
            "Company description cannot exceed {} characters",
            DESCRIPTION_MAX_CHARS
        )));
    }

    Ok(())
}
