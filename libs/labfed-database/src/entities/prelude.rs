pub use super::course_permissions::Entity as CoursePermissions;
pub use super::courses::Entity as Courses;
pub use super::credentials::Entity as Credentials;
pub use super::embed_application_translations::Entity as EmbedApplicationTranslations;
pub use super::embed_applications::Entity as EmbedApplications;
pub use super::lab_permissions::Entity as LabPermissions;
pub use super::laboratories::Entity as Laboratories;
pub use super::lms::Entity as LmsEntity;
pub use super::rlms::Entity as RlmsEntity;
pub use super::users::Entity as Users;
