//! Authentication secret bound to exactly one LMS, used for signed API
//! calls between the console and the LMS.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub lms_id: String,
    pub key: String,
    pub kind: String,
    pub secret: String,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::lms::Entity",
        from = "Column::LmsId",
        to = "super::lms::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Lms,
}

impl Related<super::lms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
