//! A course inside an LMS, identified externally by the LMS context id.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub lms_id: String,
    pub context_id: String,
    pub name: String,
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
    #[sea_orm(has_many = "super::course_permissions::Entity")]
    CoursePermissions,
}

impl Related<super::lms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lms.def()
    }
}

impl Related<super::course_permissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoursePermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
