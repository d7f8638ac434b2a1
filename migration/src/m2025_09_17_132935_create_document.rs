//! Migration to create the document table.
//!
//! Documents hold file metadata for a machine and are removed together with it.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Document::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Document::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Document::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Document::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Document::Description).string_len(255).null())
                    .col(ColumnDef::new(Document::Type).string_len(255).null())
                    .col(ColumnDef::new(Document::FilePath).string_len(255).not_null())
                    .col(ColumnDef::new(Document::FileName).string_len(255).null())
                    .col(ColumnDef::new(Document::FileSize).big_integer().null())
                    .col(ColumnDef::new(Document::MimeType).string_len(255).null())
                    .col(ColumnDef::new(Document::MachineId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_machine_id")
                            .from(Document::Table, Document::MachineId)
                            .to(Machine::Table, Machine::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_document_machine_id")
                    .table(Document::Table)
                    .col(Document::MachineId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_document_machine_id").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Document::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Document {
    Table,
    Id,
    CreatedAt,
    UpdatedAt,
    Title,
    Description,
    Type,
    FilePath,
    FileName,
    FileSize,
    MimeType,
    MachineId,
}

#[derive(DeriveIden)]
enum Machine {
    Table,
    Id,
}
