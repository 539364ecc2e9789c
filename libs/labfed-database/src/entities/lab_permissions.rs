//! Grants an LMS access to a laboratory. The local_identifier is the short
//! name the LMS uses to address the lab; courses hang their own permissions
//! off this record.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "lab_permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub lms_id: String,
    pub laboratory_id: String,
    pub configuration: String,
    pub local_identifier: String,
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
    #[sea_orm(
        belongs_to = "super::laboratories::Entity",
        from = "Column::LaboratoryId",
        to = "super::laboratories::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Laboratory,
    #[sea_orm(has_many = "super::course_permissions::Entity")]
    CoursePermissions,
}

impl Related<super::lms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lms.def()
    }
}

impl Related<super::laboratories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Laboratory.def()
    }
}

impl Related<super::course_permissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CoursePermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
