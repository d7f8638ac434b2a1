//! Company entity model
//!
//! A company is the top-level organisation owning machines.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "company")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name (required, at most 255 characters)
    pub name: String,

    /// Free-form description (at most 1000 characters)
    pub description: Option<String>,

    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::machine::Entity")]
    Machines,
}

impl Related<super::machine::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Machines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
