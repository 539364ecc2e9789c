mod database;
mod entities;
mod model;

pub use database::{CourseAccessError, LabDatabase};
pub use model::*;
pub use sea_orm::DbErr;

use entities::prelude::*;
use sea_orm::EntityTrait;

type UsersModel = <Users as EntityTrait>::Model;
type UsersActiveModel = entities::users::ActiveModel;
type UsersColumn = <Users as EntityTrait>::Column;
type LmsModel = <LmsEntity as EntityTrait>::Model;
type LmsActiveModel = entities::lms::ActiveModel;
type LmsColumn = <LmsEntity as EntityTrait>::Column;
type CoursesModel = <Courses as EntityTrait>::Model;
type CoursesActiveModel = entities::courses::ActiveModel;
type CoursesColumn = <Courses as EntityTrait>::Column;
type RlmsModel = <RlmsEntity as EntityTrait>::Model;
type RlmsActiveModel = entities::rlms::ActiveModel;
type RlmsColumn = <RlmsEntity as EntityTrait>::Column;
type LaboratoriesModel = <Laboratories as EntityTrait>::Model;
type LaboratoriesActiveModel = entities::laboratories::ActiveModel;
type LaboratoriesColumn = <Laboratories as EntityTrait>::Column;
type LabPermissionsModel = <LabPermissions as EntityTrait>::Model;
type LabPermissionsActiveModel = entities::lab_permissions::ActiveModel;
type LabPermissionsColumn = <LabPermissions as EntityTrait>::Column;
type CoursePermissionsModel = <CoursePermissions as EntityTrait>::Model;
type CoursePermissionsActiveModel = entities::course_permissions::ActiveModel;
type CoursePermissionsColumn = <CoursePermissions as EntityTrait>::Column;
type CredentialsModel = <Credentials as EntityTrait>::Model;
type CredentialsActiveModel = entities::credentials::ActiveModel;
type CredentialsColumn = <Credentials as EntityTrait>::Column;
type EmbedApplicationsModel = <EmbedApplications as EntityTrait>::Model;
type EmbedApplicationsActiveModel = entities::embed_applications::ActiveModel;
type EmbedApplicationsColumn = <EmbedApplications as EntityTrait>::Column;
type EmbedTranslationsModel = <EmbedApplicationTranslations as EntityTrait>::Model;
type EmbedTranslationsActiveModel = entities::embed_application_translations::ActiveModel;
type EmbedTranslationsColumn = <EmbedApplicationTranslations as EntityTrait>::Column;
