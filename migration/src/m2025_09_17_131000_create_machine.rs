//! Migration to create the machine table.
//!
//! Every machine belongs to exactly one company; deleting the company deletes
//! its machines.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Machine::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Machine::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Machine::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Machine::Model).string_len(255).null())
                    .col(ColumnDef::new(Machine::Category).string_len(255).null())
                    .col(ColumnDef::new(Machine::Description).string_len(1000).null())
                    .col(ColumnDef::new(Machine::CompanyId).integer().not_null())
                    .col(
                        ColumnDef::new(Machine::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Machine::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_machine_company_id")
                            .from(Machine::Table, Machine::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_machine_company_id")
                    .table(Machine::Table)
                    .col(Machine::CompanyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_machine_company_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Machine::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Machine {
    Table,
    Id,
    Name,
    Model,
    Category,
    Description,
    CompanyId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Company {
    Table,
    Id,
}
