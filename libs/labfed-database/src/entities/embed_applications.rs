//! Catalogued third-party web tool embeddable in educational content.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "embed_applications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub identifier: String,
    pub owner_id: String,
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub height: Option<String>,
    /// Scale stored as an integer percentage (75 means 0.75).
    pub scale: Option<i32>,
    pub age_ranges_range: Option<String>,
    pub domains_text: Option<String>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub last_update: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Owner,
    #[sea_orm(has_many = "super::embed_application_translations::Entity")]
    Translations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::embed_application_translations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Translations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
