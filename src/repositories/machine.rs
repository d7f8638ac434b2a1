//! # Machine Repository
//!
//! CRUD operations for machines and traversal to the owning company and to
//! attached documents.

use crate::error::RepositoryError;
use crate::models::company::{Entity as Company, Model as CompanyModel};
use crate::models::document::{self, Entity as Document};
use crate::models::machine::{
    self, ActiveModel as MachineActiveModel, Entity as Machine, Model as MachineModel,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

/// Field set for creating or fully replacing a machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineInput {
    pub name: String,
    pub model: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub company_id: i32,
}

impl MachineInput {
    /// Input with only the required fields set
    pub fn new<S: Into<String>>(name: S, company_id: i32) -> Self {
        Self {
            name: name.into(),
            model: None,
            category: None,
            description: None,
            company_id,
        }
    }
}

/// Repository for Machine database operations
pub struct MachineRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> MachineRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a machine. A `company_id` with no matching company fails with
    /// the database's foreign key error.
    pub async fn create(&self, input: MachineInput) -> Result<MachineModel, RepositoryError> {
        validate_machine(&input)?;

        let now = Utc::now();
        let machine = MachineActiveModel {
            name: Set(input.name),
            model: Set(input.model),
            category: Set(input.category),
            description: Set(input.description),
            company_id: Set(input.company_id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let created = machine
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::info!(
            machine_id = created.id,
            company_id = created.company_id,
            "Machine created"
        );
        Ok(created)
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<MachineModel>, RepositoryError> {
        Machine::find_by_id(id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list_for_company(
        &self,
        company_id: i32,
    ) -> Result<Vec<MachineModel>, RepositoryError> {
        Machine::find()
            .filter(machine::Column::CompanyId.eq(company_id))
            .order_by_asc(machine::Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn update(
        &self,
        id: i32,
        input: MachineInput,
    ) -> Result<MachineModel, RepositoryError> {
        validate_machine(&input)?;

        let machine = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Machine", id))?;

        let mut active_machine = machine.into_active_model();
        active_machine.name = Set(input.name);
        active_machine.model = Set(input.model);
        active_machine.category = Set(input.category);
        active_machine.description = Set(input.description);
        active_machine.company_id = Set(input.company_id);
        active_machine.updated_at = Set(Utc::now().into());

        active_machine
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Hard delete; documents of the machine cascade
    pub async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let result = Machine::delete_by_id(id)
            .exec(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("Machine", id));
        }

        tracing::info!(machine_id = id, "Machine deleted");
        Ok(())
    }

    pub async fn company_of(&self, machine: &MachineModel) -> Result<CompanyModel, RepositoryError> {
        machine
            .find_related(Company)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::not_found("Company", machine.company_id))
    }

    pub async fn documents_of(
        &self,
        machine: &MachineModel,
    ) -> Result<Vec<document::Model>, RepositoryError> {
        machine
            .find_related(Document)
            .order_by_asc(document::Column::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

fn validate_machine(input: &MachineInput) -> Result<(), RepositoryError> {
    if input.name.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            "Machine name cannot be empty",
        ));
    }

    for (field, value) in [
        ("name", Some(&input.name)),
        ("model", input.model.as_ref()),
        ("category", input.category.as_ref()),
    ] {
        if value.is_some_and(|v| v.chars().count() > 255) {
            return Err(RepositoryError::validation_error(format!(
                "Machine {} cannot exceed 255 characters",
                field
            )));
        }
    }

    if input
        .description
        .as_ref()
        .is_some_and(|v| v.chars().count() > 1000)
    {
        return Err(RepositoryError::validation_error(
            "Machine description cannot exceed 1000 characters",
        ));
    }

    Ok(())
}
