//! Document entity model
//!
//! File metadata attached to a machine. The file itself lives outside the
//! database; only its path and descriptive fields are stored here.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    pub description: Option<String>,

    /// Document kind (manual, certificate, ...); stored in the `type` column
    #[sea_orm(column_name = "type")]
    pub doc_type: Option<String>,

    /// Storage path of the file (required)
    pub file_path: String,

    /// Original client-side file name
    pub file_name: Option<String>,

    /// File size in bytes
    pub file_size: Option<i64>,

    pub mime_type: Option<String>,

    pub machine_id: i32,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::machine::Entity",
        from = "Column::MachineId",
        to = "super::machine::Column::Id",
        on_delete = "Cascade"
    )]
    Machine,
}

impl Related<super::machine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Machine.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
