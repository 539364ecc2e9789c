//! A remote laboratory management system, the provider side of the
//! federation. The configuration column holds a provider specific JSON blob
//! (credentials, base urls) that the console never interprets.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "rlms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub location: String,
    pub url: String,
    pub version: String,
    pub configuration: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::laboratories::Entity")]
    Laboratories,
}

impl Related<super::laboratories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Laboratories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
