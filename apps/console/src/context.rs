use crate::{config::Config, constants, key::KeyContext};
use handlebars::Handlebars;
use labfed_database::LabDatabase;
use reqwest::Client;

pub struct Context {
    pub db: LabDatabase,
    pub key: KeyContext,
    pub config: Config,
    pub http_client: Client,
    pub pages: Handlebars<'static>,
}

impl Context {
    pub async fn new() -> Context {
        let db_env =
            dotenvy::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:labfed.db?mode=rwc".into());
        let db = LabDatabase::init_pool(&db_env)
            .await
            .expect("wrong database URL");

        let key_env = dotenvy::var("SIGN_KEY").expect("should provide sign key");

        Self::new_with_db(db, &key_env)
    }

    fn new_with_db(db: LabDatabase, key: &str) -> Context {
        let mut pages = Handlebars::new();
        pages
            .register_template_string("APP_HTML", constants::EMBED_APP_HTML)
            .expect("should provide valid app html template");
        pages
            .register_template_string("APP_XML", constants::EMBED_APP_XML)
            .expect("should provide valid app xml template");

        Self {
            db,
            key: KeyContext::new(key),
            config: Config::new(),
            http_client: Client::new(),
            pages,
        }
    }

    #[cfg(test)]
    pub(crate) fn new_test_client(db: LabDatabase) -> Context {
        Self::new_with_db(db, "test-sign-key")
    }
}
