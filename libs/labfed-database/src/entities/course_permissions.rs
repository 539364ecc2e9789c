//! Grants a course access to a lab already granted to its LMS. Newly
//! requested permissions start in the pending state until an administrator
//! resolves them.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "course_permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub course_id: String,
    pub lab_permission_id: String,
    pub configuration: Option<String>,
    pub access: i16,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::lab_permissions::Entity",
        from = "Column::LabPermissionId",
        to = "super::lab_permissions::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    LabPermission,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::lab_permissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabPermission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
