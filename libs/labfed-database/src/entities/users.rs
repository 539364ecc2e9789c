//! Console users. A user bound to an LMS administers that LMS only; users
//! without an LMS are global administrators.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub login: String,
    pub name: String,
    /// sha256 hex digest, never the clear text.
    pub password: String,
    pub access_level: i16,
    pub lms_id: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::embed_applications::Entity")]
    EmbedApplications,
}

impl Related<super::embed_applications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EmbedApplications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
