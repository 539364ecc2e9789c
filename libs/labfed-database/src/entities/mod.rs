pub mod course_permissions;
pub mod courses;
pub mod credentials;
pub mod embed_application_translations;
pub mod embed_applications;
pub mod lab_permissions;
pub mod laboratories;
pub mod lms;
pub mod prelude;
pub mod rlms;
pub mod users;
