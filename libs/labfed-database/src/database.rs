use super::{entities, model::*, *};
use chrono::Utc;
use labfed_logger::{info, instrument, tracing, warn};
use labfed_database_migration::{Migrator, MigratorTrait};
use nanoid::nanoid;
use sea_orm::{
    prelude::*, ConnectionTrait, Database, JoinType, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sha2::{Digest, Sha256};

/// Login and password of the user seeded into an empty database so the
/// console can be bootstrapped. Operators are expected to rotate it.
const DEFAULT_ADMIN: (&str, &str) = ("admin", "password");

/// Outcome of a course access request that failed a business rule rather
/// than the database itself.
#[derive(Debug, PartialEq, Eq)]
pub enum CourseAccessError {
    CourseNotFound,
    GrantNotFound,
    /// The lab grant belongs to a different LMS than the course.
    LmsMismatch,
    Exist,
}

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub struct LabDatabase {
    pub pool: DatabaseConnection,
}

impl LabDatabase {
    pub async fn init_pool(database: &str) -> Result<Self, DbErr> {
        let pool = Database::connect(database).await?;
        Migrator::up(&pool, None).await?;
        let db = Self { pool };
        db.ensure_default_admin().await?;
        Ok(db)
    }

    #[instrument(skip(self))]
    async fn ensure_default_admin(&self) -> Result<(), DbErr> {
        if Users::find().count(&self.pool).await? > 0 {
            return Ok(());
        }
        let (login, password) = DEFAULT_ADMIN;
        warn!("users table is empty, seeding default administrator {login:?}");
        Users::insert(UsersActiveModel {
            id: Set(nanoid!()),
            login: Set(login.into()),
            name: Set("Administrator".into()),
            password: Set(hash_password(password)),
            access_level: Set(AccessLevel::Admin as i16),
            lms_id: Set(None),
            ..Default::default()
        })
        .exec(&self.pool)
        .await?;
        Ok(())
    }

    fn into_user(user: UsersModel) -> User {
        User {
            id: user.id,
            login: user.login,
            name: user.name,
            access_level: user.access_level.into(),
            lms_id: user.lms_id,
            created_at: user.created_at.unwrap_or_default().naive_local(),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_user_by_login(&self, login: &str) -> Result<Option<UsersModel>, DbErr> {
        info!("database get_user_by_login enter");
        Users::find()
            .filter(UsersColumn::Login.eq(login))
            .one(&self.pool)
            .await
    }

    #[instrument(skip(self, login))]
    pub async fn user_login(&self, login: UserLogin) -> Result<Option<User>, DbErr> {
        info!("database user_login enter");
        Users::find()
            .filter(UsersColumn::Login.eq(login.login))
            .filter(UsersColumn::Password.eq(hash_password(&login.password)))
            .one(&self.pool)
            .await
            .map(|user| user.map(Self::into_user))
    }

    #[instrument(skip(self, user))]
    pub async fn create_user(
        &self,
        lms_id: Option<String>,
        user: CreateUser,
    ) -> Result<Option<User>, DbErr> {
        info!("database create_user enter");
        if self.get_user_by_login(&user.login).await?.is_some() {
            return Ok(None);
        }
        Users::insert(UsersActiveModel {
            id: Set(nanoid!()),
            login: Set(user.login),
            name: Set(user.name),
            password: Set(hash_password(&user.password)),
            access_level: Set(user.access_level as i16),
            lms_id: Set(lms_id),
            ..Default::default()
        })
        .exec_with_returning(&self.pool)
        .await
        .map(|user| Some(Self::into_user(user)))
    }

    #[instrument(skip(self, data))]
    pub async fn update_user(
        &self,
        user_id: &str,
        scope: Option<String>,
        data: UpdateUser,
    ) -> Result<Option<User>, DbErr> {
        info!("database update_user enter");
        let Some(user) = Users::find_by_id(user_id).one(&self.pool).await? else {
            return Ok(None);
        };
        // callers bound to an LMS only touch rows of that LMS
        if scope.is_some() && user.lms_id != scope {
            return Ok(None);
        }

        let mut model = UsersActiveModel {
            id: Set(user.id.clone()),
            ..Default::default()
        };
        if let Some(name) = data.name {
            model.name = Set(name);
        }
        if let Some(password) = data.password {
            model.password = Set(hash_password(&password));
        }
        if let Some(access_level) = data.access_level {
            model.access_level = Set(access_level as i16);
        }
        // only a caller without an LMS may move a user between LMSes
        if scope.is_none() {
            if let Some(lms_id) = data.lms_id {
                model.lms_id = Set(Some(lms_id));
            }
        }

        Users::update(model)
            .filter(UsersColumn::Id.eq(user.id))
            .exec(&self.pool)
            .await
            .map(|user| Some(Self::into_user(user)))
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: &str, scope: Option<String>) -> Result<bool, DbErr> {
        info!("database delete_user enter");
        let mut query = Users::delete_many().filter(UsersColumn::Id.eq(user_id));
        if let Some(lms_id) = scope {
            query = query.filter(UsersColumn::LmsId.eq(lms_id));
        }
        query.exec(&self.pool).await.map(|r| r.rows_affected > 0)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self, lms_id: Option<String>) -> Result<Vec<User>, DbErr> {
        info!("database list_users enter");
        let mut query = Users::find();
        if let Some(lms_id) = lms_id {
            query = query.filter(UsersColumn::LmsId.eq(lms_id));
        }
        query
            .all(&self.pool)
            .await
            .map(|users| users.into_iter().map(Self::into_user).collect())
    }

    fn into_lms(lms: LmsModel) -> Lms {
        Lms {
            id: lms.id,
            name: lms.name,
            url: lms.url,
            created_at: lms.created_at.unwrap_or_default().naive_local(),
        }
    }

    #[instrument(skip(self, lms))]
    pub async fn create_lms(&self, lms: CreateLms) -> Result<Lms, DbErr> {
        info!("database create_lms enter");
        LmsEntity::insert(LmsActiveModel {
            id: Set(nanoid!()),
            name: Set(lms.name),
            url: Set(lms.url),
            ..Default::default()
        })
        .exec_with_returning(&self.pool)
        .await
        .map(Self::into_lms)
    }

    #[instrument(skip(self))]
    pub async fn list_lms(&self) -> Result<Vec<Lms>, DbErr> {
        info!("database list_lms enter");
        LmsEntity::find()
            .all(&self.pool)
            .await
            .map(|lms| lms.into_iter().map(Self::into_lms).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_lms_by_id(&self, lms_id: &str) -> Result<Option<LmsDetail>, DbErr> {
        info!("database get_lms_by_id enter");
        let Some(lms) = LmsEntity::find_by_id(lms_id).one(&self.pool).await? else {
            return Ok(None);
        };

        let course_count = Courses::find()
            .filter(CoursesColumn::LmsId.eq(lms_id))
            .count(&self.pool)
            .await?;
        let credential_count = Credentials::find()
            .filter(CredentialsColumn::LmsId.eq(lms_id))
            .count(&self.pool)
            .await?;

        Ok(Some(LmsDetail {
            course_count,
            credential_count,
            lms: Self::into_lms(lms),
        }))
    }

    #[instrument(skip(self, data))]
    pub async fn update_lms(&self, lms_id: &str, data: CreateLms) -> Result<Option<Lms>, DbErr> {
        info!("database update_lms enter");
        if LmsEntity::find_by_id(lms_id).one(&self.pool).await?.is_none() {
            return Ok(None);
        }
        LmsEntity::update(LmsActiveModel {
            id: Set(lms_id.into()),
            name: Set(data.name),
            url: Set(data.url),
            ..Default::default()
        })
        .filter(LmsColumn::Id.eq(lms_id))
        .exec(&self.pool)
        .await
        .map(|lms| Some(Self::into_lms(lms)))
    }

    #[instrument(skip(self))]
    pub async fn delete_lms(&self, lms_id: &str) -> Result<bool, DbErr> {
        info!("database delete_lms enter");
        LmsEntity::delete_many()
            .filter(LmsColumn::Id.eq(lms_id))
            .exec(&self.pool)
            .await
            .map(|r| r.rows_affected > 0)
    }

    fn into_course(course: CoursesModel) -> Course {
        Course {
            id: course.id,
            lms_id: course.lms_id,
            context_id: course.context_id,
            name: course.name,
            created_at: course.created_at.unwrap_or_default().naive_local(),
        }
    }

    #[instrument(skip(self, course))]
    pub async fn create_course(
        &self,
        lms_id: &str,
        course: CreateCourse,
    ) -> Result<Option<Course>, DbErr> {
        info!("database create_course enter");
        let exists = Courses::find()
            .filter(CoursesColumn::LmsId.eq(lms_id))
            .filter(CoursesColumn::ContextId.eq(course.context_id.clone()))
            .one(&self.pool)
            .await?;
        if exists.is_some() {
            return Ok(None);
        }
        Courses::insert(CoursesActiveModel {
            id: Set(nanoid!()),
            lms_id: Set(lms_id.into()),
            context_id: Set(course.context_id),
            name: Set(course.name),
            ..Default::default()
        })
        .exec_with_returning(&self.pool)
        .await
        .map(|course| Some(Self::into_course(course)))
    }

    #[instrument(skip(self))]
    pub async fn list_courses(&self, lms_id: &str) -> Result<Vec<Course>, DbErr> {
        info!("database list_courses enter");
        Courses::find()
            .filter(CoursesColumn::LmsId.eq(lms_id))
            .all(&self.pool)
            .await
            .map(|courses| courses.into_iter().map(Self::into_course).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_course(&self, course_id: &str) -> Result<Option<CoursesModel>, DbErr> {
        info!("database get_course enter");
        Courses::find_by_id(course_id).one(&self.pool).await
    }

    fn into_rlms(rlms: RlmsModel) -> Rlms {
        Rlms {
            id: rlms.id,
            kind: rlms.kind,
            location: rlms.location,
            url: rlms.url,
            version: rlms.version,
            configuration: parse_configuration(rlms.configuration.as_deref()),
        }
    }

    #[instrument(skip(self, rlms))]
    pub async fn create_rlms(&self, rlms: CreateRlms) -> Result<Rlms, DbErr> {
        info!("database create_rlms enter");
        RlmsEntity::insert(RlmsActiveModel {
            id: Set(nanoid!()),
            kind: Set(rlms.kind),
            location: Set(rlms.location),
            url: Set(rlms.url),
            version: Set(rlms.version),
            configuration: Set(rlms.configuration.map(|c| c.to_string())),
            ..Default::default()
        })
        .exec_with_returning(&self.pool)
        .await
        .map(Self::into_rlms)
    }

    #[instrument(skip(self))]
    pub async fn list_rlms(&self) -> Result<Vec<Rlms>, DbErr> {
        info!("database list_rlms enter");
        RlmsEntity::find()
            .all(&self.pool)
            .await
            .map(|rlms| rlms.into_iter().map(Self::into_rlms).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_rlms(&self, rlms_id: &str) -> Result<Option<Rlms>, DbErr> {
        info!("database get_rlms enter");
        RlmsEntity::find_by_id(rlms_id)
            .one(&self.pool)
            .await
            .map(|rlms| rlms.map(Self::into_rlms))
    }

    #[instrument(skip(self, data))]
    pub async fn update_rlms(&self, rlms_id: &str, data: UpdateRlms) -> Result<Option<Rlms>, DbErr> {
        info!("database update_rlms enter");
        if RlmsEntity::find_by_id(rlms_id)
            .one(&self.pool)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = RlmsActiveModel {
            id: Set(rlms_id.into()),
            ..Default::default()
        };
        if let Some(location) = data.location {
            model.location = Set(location);
        }
        if let Some(url) = data.url {
            model.url = Set(url);
        }
        if let Some(version) = data.version {
            model.version = Set(version);
        }
        if let Some(configuration) = data.configuration {
            model.configuration = Set(Some(configuration.to_string()));
        }

        RlmsEntity::update(model)
            .filter(RlmsColumn::Id.eq(rlms_id))
            .exec(&self.pool)
            .await
            .map(|rlms| Some(Self::into_rlms(rlms)))
    }

    #[instrument(skip(self))]
    pub async fn delete_rlms(&self, rlms_id: &str) -> Result<bool, DbErr> {
        info!("database delete_rlms enter");
        RlmsEntity::delete_many()
            .filter(RlmsColumn::Id.eq(rlms_id))
            .exec(&self.pool)
            .await
            .map(|r| r.rows_affected > 0)
    }

    fn into_laboratory(lab: LaboratoriesModel) -> Laboratory {
        Laboratory {
            id: lab.id,
            rlms_id: lab.rlms_id,
            name: lab.name,
            laboratory_id: lab.laboratory_id,
        }
    }

    #[instrument(skip(self, lab))]
    pub async fn register_laboratory(
        &self,
        rlms_id: &str,
        lab: RegisterLaboratory,
    ) -> Result<Option<Laboratory>, DbErr> {
        info!("database register_laboratory enter");
        let exists = Laboratories::find()
            .filter(LaboratoriesColumn::RlmsId.eq(rlms_id))
            .filter(LaboratoriesColumn::LaboratoryId.eq(lab.laboratory_id.clone()))
            .one(&self.pool)
            .await?;
        if exists.is_some() {
            return Ok(None);
        }
        Laboratories::insert(LaboratoriesActiveModel {
            id: Set(nanoid!()),
            rlms_id: Set(rlms_id.into()),
            name: Set(lab.name),
            laboratory_id: Set(lab.laboratory_id),
            ..Default::default()
        })
        .exec_with_returning(&self.pool)
        .await
        .map(|lab| Some(Self::into_laboratory(lab)))
    }

    #[instrument(skip(self))]
    pub async fn list_laboratories(&self, rlms_id: &str) -> Result<Vec<Laboratory>, DbErr> {
        info!("database list_laboratories enter");
        Laboratories::find()
            .filter(LaboratoriesColumn::RlmsId.eq(rlms_id))
            .all(&self.pool)
            .await
            .map(|labs| labs.into_iter().map(Self::into_laboratory).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_laboratory(&self, lab_id: &str) -> Result<Option<LaboratoriesModel>, DbErr> {
        info!("database get_laboratory enter");
        Laboratories::find_by_id(lab_id).one(&self.pool).await
    }

    fn into_grant(grant: LabPermissionsModel) -> LabGrant {
        LabGrant {
            id: grant.id,
            lms_id: grant.lms_id,
            laboratory_id: grant.laboratory_id,
            local_identifier: grant.local_identifier,
            configuration: parse_configuration(Some(&grant.configuration)),
            created_at: grant.created_at.unwrap_or_default().naive_local(),
        }
    }

    /// Grant a laboratory to an LMS. Returns None when the lab is already
    /// granted or the local identifier is taken for this LMS.
    #[instrument(skip(self, grant))]
    pub async fn grant_laboratory(
        &self,
        lms_id: &str,
        grant: GrantLaboratory,
    ) -> Result<Option<LabGrant>, DbErr> {
        info!("database grant_laboratory enter");
        let exists = LabPermissions::find()
            .filter(LabPermissionsColumn::LmsId.eq(lms_id))
            .filter(
                LabPermissionsColumn::LaboratoryId
                    .eq(grant.laboratory_id.clone())
                    .or(LabPermissionsColumn::LocalIdentifier.eq(grant.local_identifier.clone())),
            )
            .one(&self.pool)
            .await?;
        if exists.is_some() {
            return Ok(None);
        }
        LabPermissions::insert(LabPermissionsActiveModel {
            id: Set(nanoid!()),
            lms_id: Set(lms_id.into()),
            laboratory_id: Set(grant.laboratory_id),
            configuration: Set(grant
                .configuration
                .map(|c| c.to_string())
                .unwrap_or_else(|| "{}".into())),
            local_identifier: Set(grant.local_identifier),
            ..Default::default()
        })
        .exec_with_returning(&self.pool)
        .await
        .map(|grant| Some(Self::into_grant(grant)))
    }

    #[instrument(skip(self))]
    pub async fn list_lab_grants(&self, lms_id: &str) -> Result<Vec<LabGrantDetail>, DbErr> {
        info!("database list_lab_grants enter");
        LabPermissions::find()
            .select_only()
            .column_as(LabPermissionsColumn::Id, "id")
            .column_as(LabPermissionsColumn::LocalIdentifier, "local_identifier")
            .column_as(LaboratoriesColumn::Name, "laboratory_name")
            .column_as(LaboratoriesColumn::LaboratoryId, "external_laboratory_id")
            .column_as(RlmsColumn::Kind, "rlms_kind")
            .column_as(RlmsColumn::Location, "rlms_location")
            .join(
                JoinType::InnerJoin,
                entities::lab_permissions::Relation::Laboratory.def(),
            )
            .join(
                JoinType::InnerJoin,
                entities::laboratories::Relation::Rlms.def(),
            )
            .filter(LabPermissionsColumn::LmsId.eq(lms_id))
            .into_model::<LabGrantDetail>()
            .all(&self.pool)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_lab_grant(&self, grant_id: &str) -> Result<Option<LabPermissionsModel>, DbErr> {
        info!("database get_lab_grant enter");
        LabPermissions::find_by_id(grant_id).one(&self.pool).await
    }

    #[instrument(skip(self))]
    pub async fn revoke_lab_grant(&self, grant_id: &str) -> Result<bool, DbErr> {
        info!("database revoke_lab_grant enter");
        LabPermissions::delete_many()
            .filter(LabPermissionsColumn::Id.eq(grant_id))
            .exec(&self.pool)
            .await
            .map(|r| r.rows_affected > 0)
    }

    fn into_permission(permission: CoursePermissionsModel) -> CoursePermission {
        CoursePermission {
            id: permission.id,
            course_id: permission.course_id,
            lab_permission_id: permission.lab_permission_id,
            access: permission.access.into(),
            configuration: parse_configuration(permission.configuration.as_deref()),
            created_at: permission.created_at.unwrap_or_default().naive_local(),
        }
    }

    /// Request lab access for a course. The referenced lab grant must belong
    /// to the course's own LMS; the permission starts pending.
    #[instrument(skip(self, request))]
    pub async fn request_course_access(
        &self,
        course_id: &str,
        request: CreateCoursePermission,
    ) -> Result<Result<CoursePermission, CourseAccessError>, DbErr> {
        info!("database request_course_access enter");
        let trx = self.pool.begin().await?;

        let Some(course) = Courses::find_by_id(course_id).one(&trx).await? else {
            return Ok(Err(CourseAccessError::CourseNotFound));
        };
        let Some(grant) = LabPermissions::find_by_id(&request.lab_permission_id)
            .one(&trx)
            .await?
        else {
            return Ok(Err(CourseAccessError::GrantNotFound));
        };
        if grant.lms_id != course.lms_id {
            return Ok(Err(CourseAccessError::LmsMismatch));
        }

        let exists = CoursePermissions::find()
            .filter(CoursePermissionsColumn::CourseId.eq(course_id))
            .filter(CoursePermissionsColumn::LabPermissionId.eq(grant.id.clone()))
            .one(&trx)
            .await?;
        if exists.is_some() {
            return Ok(Err(CourseAccessError::Exist));
        }

        let permission = CoursePermissions::insert(CoursePermissionsActiveModel {
            id: Set(nanoid!()),
            course_id: Set(course.id),
            lab_permission_id: Set(grant.id),
            configuration: Set(request.configuration.map(|c| c.to_string())),
            access: Set(AccessStatus::Pending as i16),
            ..Default::default()
        })
        .exec_with_returning(&trx)
        .await?;

        trx.commit().await?;

        Ok(Ok(Self::into_permission(permission)))
    }

    #[instrument(skip(self))]
    pub async fn update_access_status(
        &self,
        permission_id: &str,
        access: AccessStatus,
    ) -> Result<Option<CoursePermission>, DbErr> {
        info!("database update_access_status enter");
        if CoursePermissions::find_by_id(permission_id)
            .one(&self.pool)
            .await?
            .is_none()
        {
            return Ok(None);
        }
        CoursePermissions::update(CoursePermissionsActiveModel {
            id: Set(permission_id.into()),
            access: Set(access as i16),
            ..Default::default()
        })
        .filter(CoursePermissionsColumn::Id.eq(permission_id))
        .exec(&self.pool)
        .await
        .map(|permission| Some(Self::into_permission(permission)))
    }

    #[instrument(skip(self))]
    pub async fn delete_course_permission(&self, permission_id: &str) -> Result<bool, DbErr> {
        info!("database delete_course_permission enter");
        CoursePermissions::delete_many()
            .filter(CoursePermissionsColumn::Id.eq(permission_id))
            .exec(&self.pool)
            .await
            .map(|r| r.rows_affected > 0)
    }

    #[instrument(skip(self))]
    pub async fn list_course_permissions(
        &self,
        course_id: &str,
    ) -> Result<Vec<CoursePermission>, DbErr> {
        info!("database list_course_permissions enter");
        CoursePermissions::find()
            .filter(CoursePermissionsColumn::CourseId.eq(course_id))
            .all(&self.pool)
            .await
            .map(|permissions| permissions.into_iter().map(Self::into_permission).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_course_labs(&self, course_id: &str) -> Result<Vec<CourseLabAccess>, DbErr> {
        info!("database list_course_labs enter");
        CoursePermissions::find()
            .select_only()
            .column_as(CoursePermissionsColumn::Id, "permission_id")
            .column_as(LabPermissionsColumn::LocalIdentifier, "local_identifier")
            .column_as(LaboratoriesColumn::Name, "laboratory_name")
            .column_as(CoursePermissionsColumn::Access, "access")
            .join(
                JoinType::InnerJoin,
                entities::course_permissions::Relation::LabPermission.def(),
            )
            .join(
                JoinType::InnerJoin,
                entities::lab_permissions::Relation::Laboratory.def(),
            )
            .filter(CoursePermissionsColumn::CourseId.eq(course_id))
            .into_model::<CourseLabAccess>()
            .all(&self.pool)
            .await
    }

    fn into_credential(credential: CredentialsModel) -> Credential {
        Credential {
            id: credential.id,
            lms_id: credential.lms_id,
            key: credential.key,
            kind: credential.kind,
            secret: credential.secret,
        }
    }

    #[instrument(skip(self, credential))]
    pub async fn create_credential(
        &self,
        lms_id: &str,
        credential: CreateCredential,
    ) -> Result<Option<Credential>, DbErr> {
        info!("database create_credential enter");
        let exists = Credentials::find()
            .filter(CredentialsColumn::LmsId.eq(lms_id))
            .filter(CredentialsColumn::Key.eq(credential.key.clone()))
            .one(&self.pool)
            .await?;
        if exists.is_some() {
            return Ok(None);
        }
        Credentials::insert(CredentialsActiveModel {
            id: Set(nanoid!()),
            lms_id: Set(lms_id.into()),
            key: Set(credential.key),
            kind: Set(credential.kind),
            secret: Set(credential.secret),
            ..Default::default()
        })
        .exec_with_returning(&self.pool)
        .await
        .map(|credential| Some(Self::into_credential(credential)))
    }

    #[instrument(skip(self))]
    pub async fn list_credentials(&self, lms_id: &str) -> Result<Vec<Credential>, DbErr> {
        info!("database list_credentials enter");
        Credentials::find()
            .filter(CredentialsColumn::LmsId.eq(lms_id))
            .all(&self.pool)
            .await
            .map(|credentials| credentials.into_iter().map(Self::into_credential).collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_credential(&self, credential_id: &str) -> Result<bool, DbErr> {
        info!("database delete_credential enter");
        Credentials::delete_many()
            .filter(CredentialsColumn::Id.eq(credential_id))
            .exec(&self.pool)
            .await
            .map(|r| r.rows_affected > 0)
    }

    fn into_application(application: EmbedApplicationsModel) -> EmbedApplication {
        EmbedApplication {
            identifier: application.identifier,
            owner_id: application.owner_id,
            name: application.name,
            url: application.url,
            description: application.description,
            height: application.height,
            scale: application.scale,
            age_ranges_range: application.age_ranges_range,
            domains_text: application.domains_text,
            last_update: application.last_update.unwrap_or_default().naive_local(),
        }
    }

    #[instrument(skip(self, application))]
    pub async fn create_embed_application(
        &self,
        owner_id: &str,
        application: CreateEmbedApplication,
    ) -> Result<EmbedApplication, DbErr> {
        info!("database create_embed_application enter");
        EmbedApplications::insert(EmbedApplicationsActiveModel {
            identifier: Set(nanoid!()),
            owner_id: Set(owner_id.into()),
            name: Set(application.name),
            url: Set(application.url),
            description: Set(application.description),
            height: Set(application.height),
            scale: Set(scale_percentage(application.scale)),
            age_ranges_range: Set(application.age_ranges_range),
            domains_text: Set(application.domains_text),
            ..Default::default()
        })
        .exec_with_returning(&self.pool)
        .await
        .map(Self::into_application)
    }

    #[instrument(skip(self))]
    pub async fn list_embed_applications(&self) -> Result<Vec<EmbedApplication>, DbErr> {
        info!("database list_embed_applications enter");
        EmbedApplications::find()
            .order_by_asc(EmbedApplicationsColumn::LastUpdate)
            .all(&self.pool)
            .await
            .map(|applications| applications.into_iter().map(Self::into_application).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_embed_applications_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<EmbedApplication>, DbErr> {
        info!("database list_embed_applications_by_owner enter");
        EmbedApplications::find()
            .filter(EmbedApplicationsColumn::OwnerId.eq(owner_id))
            .order_by_asc(EmbedApplicationsColumn::LastUpdate)
            .all(&self.pool)
            .await
            .map(|applications| applications.into_iter().map(Self::into_application).collect())
    }

    async fn translations_for<C: ConnectionTrait>(
        conn: &C,
        identifier: &str,
    ) -> Result<Vec<EmbedTranslationsModel>, DbErr> {
        EmbedApplicationTranslations::find()
            .filter(EmbedTranslationsColumn::ApplicationId.eq(identifier))
            .all(conn)
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_embed_application(
        &self,
        identifier: &str,
    ) -> Result<Option<EmbedApplicationDetail>, DbErr> {
        info!("database get_embed_application enter");
        let Some(application) = EmbedApplications::find_by_id(identifier)
            .one(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let translations = Self::translations_for(&self.pool, identifier)
            .await?
            .into_iter()
            .map(|t| EmbedTranslation {
                language: t.language,
                url: t.url,
            })
            .collect();

        Ok(Some(EmbedApplicationDetail {
            translations,
            application: Self::into_application(application),
        }))
    }

    #[instrument(skip(self))]
    pub async fn get_embed_application_owner(
        &self,
        identifier: &str,
    ) -> Result<Option<User>, DbErr> {
        info!("database get_embed_application_owner enter");
        Users::find()
            .join(
                JoinType::InnerJoin,
                entities::users::Relation::EmbedApplications.def(),
            )
            .filter(EmbedApplicationsColumn::Identifier.eq(identifier))
            .one(&self.pool)
            .await
            .map(|user| user.map(Self::into_user))
    }

    /// Update an application and reconcile its translation set against the
    /// posted language -> url map: new languages are inserted, changed URLs
    /// updated, languages absent from the map deleted. Idempotent per map.
    #[instrument(skip(self, data))]
    pub async fn update_embed_application(
        &self,
        identifier: &str,
        data: UpdateEmbedApplication,
    ) -> Result<Option<EmbedApplicationDetail>, DbErr> {
        info!("database update_embed_application enter");
        let trx = self.pool.begin().await?;

        let Some(application) = EmbedApplications::find_by_id(identifier).one(&trx).await? else {
            return Ok(None);
        };

        let mut model = EmbedApplicationsActiveModel {
            identifier: Set(application.identifier.clone()),
            last_update: Set(Some(Utc::now().into())),
            ..Default::default()
        };
        if let Some(name) = data.name {
            model.name = Set(name);
        }
        if let Some(url) = data.url {
            model.url = Set(url);
        }
        if let Some(description) = data.description {
            model.description = Set(Some(description));
        }
        if let Some(height) = data.height {
            model.height = Set(Some(height));
        }
        if let Some(scale) = scale_percentage(data.scale) {
            model.scale = Set(Some(scale));
        }
        if let Some(age_ranges_range) = data.age_ranges_range {
            model.age_ranges_range = Set(Some(age_ranges_range));
        }
        if let Some(domains_text) = data.domains_text {
            model.domains_text = Set(Some(domains_text));
        }

        EmbedApplications::update(model)
            .filter(EmbedApplicationsColumn::Identifier.eq(identifier))
            .exec(&trx)
            .await?;

        let existing = Self::translations_for(&trx, identifier).await?;
        for translation in &existing {
            match data.languages.get(&translation.language) {
                Some(url) if *url != translation.url => {
                    EmbedApplicationTranslations::update(EmbedTranslationsActiveModel {
                        id: Set(translation.id.clone()),
                        url: Set(url.clone()),
                        ..Default::default()
                    })
                    .filter(EmbedTranslationsColumn::Id.eq(translation.id.clone()))
                    .exec(&trx)
                    .await?;
                }
                // unchanged, don't trigger an unnecessary UPDATE
                Some(_) => {}
                None => {
                    EmbedApplicationTranslations::delete_many()
                        .filter(EmbedTranslationsColumn::Id.eq(translation.id.clone()))
                        .exec(&trx)
                        .await?;
                }
            }
        }
        for (language, url) in &data.languages {
            if !existing.iter().any(|t| t.language == *language) {
                EmbedApplicationTranslations::insert(EmbedTranslationsActiveModel {
                    id: Set(nanoid!()),
                    application_id: Set(identifier.into()),
                    language: Set(language.clone()),
                    url: Set(url.clone()),
                })
                .exec(&trx)
                .await?;
            }
        }

        trx.commit().await?;

        self.get_embed_application(identifier).await
    }

    #[instrument(skip(self))]
    pub async fn delete_embed_application(
        &self,
        identifier: &str,
        owner_id: &str,
    ) -> Result<bool, DbErr> {
        info!("database delete_embed_application enter");
        EmbedApplications::delete_many()
            .filter(EmbedApplicationsColumn::Identifier.eq(identifier))
            .filter(EmbedApplicationsColumn::OwnerId.eq(owner_id))
            .exec(&self.pool)
            .await
            .map(|r| r.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    async fn init_db() -> LabDatabase {
        LabDatabase::init_pool("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_default_admin_seeded() {
        let db = init_db().await;
        let admin = db
            .user_login(UserLogin {
                login: "admin".into(),
                password: "password".into(),
            })
            .await
            .unwrap()
            .unwrap();
        assert!(admin.access_level.can_admin());
        assert_eq!(admin.lms_id, None);

        // wrong password yields nothing
        let denied = db
            .user_login(UserLogin {
                login: "admin".into(),
                password: "hunter2".into(),
            })
            .await
            .unwrap();
        assert!(denied.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_login_rejected() {
        let db = init_db().await;
        let user = CreateUser {
            login: "teacher".into(),
            name: "Teacher".into(),
            password: "secret".into(),
            access_level: AccessLevel::Instructor,
            lms_id: None,
        };
        assert!(db.create_user(None, user.clone()).await.unwrap().is_some());
        assert!(db.create_user(None, user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_mutations_scoped_to_lms() {
        let db = init_db().await;
        let lms_a = db
            .create_lms(CreateLms {
                name: "Moodle A".into(),
                url: "http://a.example.org".into(),
            })
            .await
            .unwrap();
        let lms_b = db
            .create_lms(CreateLms {
                name: "Moodle B".into(),
                url: "http://b.example.org".into(),
            })
            .await
            .unwrap();

        let victim = db
            .create_user(
                Some(lms_b.id.clone()),
                CreateUser {
                    login: "teacher".into(),
                    name: "Teacher".into(),
                    password: "secret".into(),
                    access_level: AccessLevel::Admin,
                    lms_id: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        // an admin of LMS A cannot touch LMS B's user
        let blocked = db
            .update_user(
                &victim.id,
                Some(lms_a.id.clone()),
                UpdateUser {
                    name: Some("hijacked".into()),
                    password: None,
                    access_level: None,
                    lms_id: None,
                },
            )
            .await
            .unwrap();
        assert!(blocked.is_none());
        assert!(!db
            .delete_user(&victim.id, Some(lms_a.id.clone()))
            .await
            .unwrap());

        // a caller without an LMS may move the user between LMSes
        let moved = db
            .update_user(
                &victim.id,
                None,
                UpdateUser {
                    name: None,
                    password: None,
                    access_level: None,
                    lms_id: Some(lms_a.id.clone()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(moved.lms_id, Some(lms_a.id.clone()));

        assert!(db.delete_user(&victim.id, Some(lms_a.id)).await.unwrap());
    }

    #[tokio::test]
    async fn test_course_unique_per_context() {
        let db = init_db().await;
        let lms = db
            .create_lms(CreateLms {
                name: "My Moodle".into(),
                url: "http://moodle.example.org".into(),
            })
            .await
            .unwrap();

        let course = CreateCourse {
            context_id: "1".into(),
            name: "EE101".into(),
        };
        assert!(db
            .create_course(&lms.id, course.clone())
            .await
            .unwrap()
            .is_some());
        assert!(db.create_course(&lms.id, course).await.unwrap().is_none());

        let detail = db.get_lms_by_id(&lms.id).await.unwrap().unwrap();
        assert_eq!(detail.course_count, 1);
    }

    async fn setup_federation(db: &LabDatabase) -> (Lms, Course, LabGrant) {
        let lms = db
            .create_lms(CreateLms {
                name: "My Moodle".into(),
                url: "http://moodle.example.org".into(),
            })
            .await
            .unwrap();
        let course = db
            .create_course(
                &lms.id,
                CreateCourse {
                    context_id: "1".into(),
                    name: "EE101".into(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        let rlms = db
            .create_rlms(CreateRlms {
                kind: "WebLab-Deusto".into(),
                location: "Deusto Spain".into(),
                url: "https://www.weblab.deusto.es/".into(),
                version: "5.0".into(),
                configuration: Some(serde_json::json!({"remote_login": "weblabfed"})),
            })
            .await
            .unwrap();
        let lab = db
            .register_laboratory(
                &rlms.id,
                RegisterLaboratory {
                    name: "robot-movement@Robot experiments".into(),
                    laboratory_id: "robot-movement@Robot experiments".into(),
                },
            )
            .await
            .unwrap()
            .unwrap();
        let grant = db
            .grant_laboratory(
                &lms.id,
                GrantLaboratory {
                    laboratory_id: lab.id.clone(),
                    local_identifier: "robot".into(),
                    configuration: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        (lms, course, grant)
    }

    #[tokio::test]
    async fn test_course_access_flow() {
        let db = init_db().await;
        let (lms, course, grant) = setup_federation(&db).await;

        let permission = db
            .request_course_access(
                &course.id,
                CreateCoursePermission {
                    lab_permission_id: grant.id.clone(),
                    configuration: None,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(permission.access, AccessStatus::Pending);

        // duplicate request is rejected
        assert_eq!(
            db.request_course_access(
                &course.id,
                CreateCoursePermission {
                    lab_permission_id: grant.id.clone(),
                    configuration: None,
                },
            )
            .await
            .unwrap()
            .unwrap_err(),
            CourseAccessError::Exist
        );

        let granted = db
            .update_access_status(&permission.id, AccessStatus::Granted)
            .await
            .unwrap()
            .unwrap();
        assert!(granted.access.is_granted());

        let labs = db.list_course_labs(&course.id).await.unwrap();
        assert_eq!(labs.len(), 1);
        assert_eq!(labs[0].local_identifier, "robot");
        assert_eq!(labs[0].laboratory_name, "robot-movement@Robot experiments");
        assert_eq!(labs[0].access, AccessStatus::Granted);

        let grants = db.list_lab_grants(&lms.id).await.unwrap();
        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].rlms_kind, "WebLab-Deusto");
    }

    #[tokio::test]
    async fn test_cross_lms_grant_rejected() {
        let db = init_db().await;
        let (_, _, grant) = setup_federation(&db).await;

        let other_lms = db
            .create_lms(CreateLms {
                name: "Other".into(),
                url: "http://other.example.org".into(),
            })
            .await
            .unwrap();
        let other_course = db
            .create_course(
                &other_lms.id,
                CreateCourse {
                    context_id: "2".into(),
                    name: "PH201".into(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            db.request_course_access(
                &other_course.id,
                CreateCoursePermission {
                    lab_permission_id: grant.id,
                    configuration: None,
                },
            )
            .await
            .unwrap()
            .unwrap_err(),
            CourseAccessError::LmsMismatch
        );
    }

    #[tokio::test]
    async fn test_duplicate_lab_grant_rejected() {
        let db = init_db().await;
        let (lms, _, grant) = setup_federation(&db).await;

        // same lab again, different local identifier
        assert!(db
            .grant_laboratory(
                &lms.id,
                GrantLaboratory {
                    laboratory_id: grant.laboratory_id.clone(),
                    local_identifier: "robot2".into(),
                    configuration: None,
                },
            )
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_credentials_unique_per_key() {
        let db = init_db().await;
        let lms = db
            .create_lms(CreateLms {
                name: "My Moodle".into(),
                url: "http://moodle.example.org".into(),
            })
            .await
            .unwrap();

        let credential = CreateCredential {
            key: "admin".into(),
            kind: "OAuth1.0".into(),
            secret: "80072568beb3b2102325eb203f6d0ff92f5cef8e".into(),
        };
        assert!(db
            .create_credential(&lms.id, credential.clone())
            .await
            .unwrap()
            .is_some());
        assert!(db
            .create_credential(&lms.id, credential)
            .await
            .unwrap()
            .is_none());
        assert_eq!(db.list_credentials(&lms.id).await.unwrap().len(), 1);
    }

    async fn create_owner(db: &LabDatabase) -> User {
        db.create_user(
            None,
            CreateUser {
                login: "owner".into(),
                name: "App Owner".into(),
                password: "secret".into(),
                access_level: AccessLevel::Instructor,
                lms_id: None,
            },
        )
        .await
        .unwrap()
        .unwrap()
    }

    #[tokio::test]
    async fn test_embed_application_roundtrip() {
        let db = init_db().await;
        let owner = create_owner(&db).await;

        let application = db
            .create_embed_application(
                &owner.id,
                CreateEmbedApplication {
                    name: "Periodic table".into(),
                    url: "http://apps.example.org/periodic/".into(),
                    description: Some("Interactive periodic table".into()),
                    height: Some("600".into()),
                    scale: Some(0.75),
                    age_ranges_range: None,
                    domains_text: Some("chemistry".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(application.scale, Some(75));

        let detail = db
            .get_embed_application(&application.identifier)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.application.name, "Periodic table");
        assert!(detail.translations.is_empty());

        let found_owner = db
            .get_embed_application_owner(&application.identifier)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found_owner.name, "App Owner");
    }

    #[tokio::test]
    async fn test_translation_sync() {
        let db = init_db().await;
        let owner = create_owner(&db).await;
        let application = db
            .create_embed_application(
                &owner.id,
                CreateEmbedApplication {
                    name: "Periodic table".into(),
                    url: "http://apps.example.org/periodic/".into(),
                    description: None,
                    height: None,
                    scale: None,
                    age_ranges_range: None,
                    domains_text: None,
                },
            )
            .await
            .unwrap();

        let languages: HashMap<String, String> = [
            ("es".to_string(), "http://apps.example.org/es/".to_string()),
            ("fr".to_string(), "http://apps.example.org/fr/".to_string()),
        ]
        .into();
        let update = UpdateEmbedApplication {
            name: None,
            url: None,
            description: None,
            height: None,
            scale: None,
            age_ranges_range: None,
            domains_text: None,
            languages: languages.clone(),
        };

        let detail = db
            .update_embed_application(&application.identifier, update.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.translations.len(), 2);

        // reposting the same set changes nothing
        let detail = db
            .update_embed_application(&application.identifier, update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.translations.len(), 2);

        // dropping a language deletes its translation, updating a URL sticks
        let languages: HashMap<String, String> =
            [("es".to_string(), "http://apps.example.org/es2/".to_string())].into();
        let detail = db
            .update_embed_application(
                &application.identifier,
                UpdateEmbedApplication {
                    name: None,
                    url: None,
                    description: None,
                    height: None,
                    scale: None,
                    age_ranges_range: None,
                    domains_text: None,
                    languages,
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.translations.len(), 1);
        assert_eq!(detail.translations[0].language, "es");
        assert_eq!(detail.translations[0].url, "http://apps.example.org/es2/");
    }

    #[tokio::test]
    async fn test_delete_embed_application_owner_scoped() {
        let db = init_db().await;
        let owner = create_owner(&db).await;
        let application = db
            .create_embed_application(
                &owner.id,
                CreateEmbedApplication {
                    name: "Periodic table".into(),
                    url: "http://apps.example.org/periodic/".into(),
                    description: None,
                    height: None,
                    scale: None,
                    age_ranges_range: None,
                    domains_text: None,
                },
            )
            .await
            .unwrap();

        assert!(!db
            .delete_embed_application(&application.identifier, "someone-else")
            .await
            .unwrap());
        assert!(db
            .delete_embed_application(&application.identifier, &owner.id)
            .await
            .unwrap());
    }
}
