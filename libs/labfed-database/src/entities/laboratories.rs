//! A laboratory offered by an RLMS. The laboratory_id is the provider's
//! composite external identifier, e.g. "robot-movement@Robot experiments".

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "laboratories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub rlms_id: String,
    pub name: String,
    pub laboratory_id: String,
    pub created_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rlms::Entity",
        from = "Column::RlmsId",
        to = "super::rlms::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Rlms,
    #[sea_orm(has_many = "super::lab_permissions::Entity")]
    LabPermissions,
}

impl Related<super::rlms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rlms.def()
    }
}

impl Related<super::lab_permissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LabPermissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
