//! Database migrations for the registry service.
//!
//! Creates the `company`, `machine` and `document` tables. Foreign keys cascade
//! on delete so removing a company removes its machines and their documents.

pub use sea_orm_migration::prelude::*;

mod m2025_09_17_130000_create_company;
mod m2025_09_17_131000_create_machine;
mod m2025_09_17_132935_create_document;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_09_17_130000_create_company::Migration),
            Box::new(m2025_09_17_131000_create_machine::Migration),
            Box::new(m2025_09_17_132935_create_document::Migration),
        ]
    }
}
