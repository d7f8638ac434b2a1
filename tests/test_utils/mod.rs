//! Test utilities for database testing.
//!
//! In-memory SQLite databases with migrations applied and foreign keys
//! enforced, plus small fixture builders.

use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use registry::models::{company, machine};
use registry::repositories::{CompanyInput, CompanyRepository, MachineInput, MachineRepository};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// Foreign keys are enforced so cascade deletes and missing-parent inserts
/// behave as they do on Postgres.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = ON".to_string(),
    ))
    .await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates a company with the given name and no description.
#[allow(dead_code)]
pub async fn create_test_company(db: &DatabaseConnection, name: &str) -> Result<company::Model> {
    let company = CompanyRepository::new(db)
        .create(CompanyInput {
            name: name.to_string(),
            description: None,
        })
        .await?;
    Ok(company)
}

/// Creates a machine owned by `company_id`.
#[allow(dead_code)]
pub async fn create_test_machine(
    db: &DatabaseConnection,
    company_id: i32,
    name: &str,
) -> Result<machine::Model> {
    let machine = MachineRepository::new(db)
        .create(MachineInput::new(name, company_id))
        .await?;
    Ok(machine)
}
