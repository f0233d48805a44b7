use std::error::Error;

use diesel::{pg::Pg, r2d2::ConnectionManager, Connection, PgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use once_cell::sync::Lazy;
use r2d2::Pool;
use reqwest::redirect::Policy;
use uuid::Uuid;
use widget_checkout::{configuration::{DatabaseSettings, Settings}, db_interaction::Store, startup::Application, telemetry::{get_subscriber, init_subscriber}, utils::DbPool};
use wiremock::{matchers::{method, path}, Mock, MockServer, ResponseTemplate};

static LOGGER_INSTANCE: Lazy<()> = Lazy::new(|| {
    let log_level = "info".to_string();
    let name = "widget-checkout-test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(name, log_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(name, log_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

fn run_migrations(connection: &mut impl MigrationHarness<Pg>) 
    -> Result<(), Box<dyn Error + Send + Sync + 'static>> 
{
    connection.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

pub struct TestApp{
    pub host: String,
    pub port: u16,
    pub pool: DbPool,
    pub store: Store,
    pub stripe_api: MockServer,
    pub api_client: reqwest::Client
}

impl TestApp {
    fn create_db(settings: &DatabaseSettings) -> DbPool{
        let mut connection = PgConnection::establish(&settings.get_database_url())
                                .expect("Failed to connect to postgres database");

        let query = format!(r#"CREATE DATABASE "{}";"#, settings.name);
        diesel::sql_query(query)
            .execute(&mut connection)
            .expect("Failed to create test database");

        let pool = Pool::new(ConnectionManager::<PgConnection>::new(settings.get_database_table_url()))
            .expect("Failed to build connection pool to test database");

        let mut conn = pool.get().expect("Failed to get connection to test database");
        run_migrations(&mut conn).expect("Failed to run migrations");

        pool
    }

    pub fn get_app_url(&self) -> String{
        format!("http://{}:{}", self.host, self.port)
    }

    pub async fn spawn_app() -> TestApp{
        Lazy::force(&LOGGER_INSTANCE);

        let stripe_api = MockServer::start().await;

        let mut settings = Settings::get().expect("Failed to read configuration");
        settings.application.port = 0;
        settings.database.name = Uuid::new_v4().to_string();
        settings.stripe.base_url = stripe_api.uri();

        let pool = TestApp::create_db(&settings.database);
        let store = Store::from_settings(&settings.database);

        let application = Application::new(settings)
                            .await
                            .expect("Failed to build application");

        let host = application.host.clone();
        let port = application.port;
        tokio::task::spawn(application.run_until_stopped());

        let api_client = reqwest::Client::builder()
                            .redirect(Policy::none())
                            .build()
                            .unwrap();

        TestApp{
            host,
            port,
            pool,
            store,
            stripe_api,
            api_client
        }
    }

    pub async fn post_payment_succeeded<Body: serde::Serialize>(&self, body: &Body) -> reqwest::Response {
        self.api_client.post(format!("{}/payment-succeeded", self.get_app_url()))
            .form(body)
            .send()
            .await
            .expect("Failed to send request to payment-succeeded endpoint")
    }

    // Processor accepts the charge and reports card 4242 expiring 12/2030
    pub async fn mock_successful_charge(&self) {
        self.mock_successful_charges(1).await;
    }

    pub async fn mock_successful_charges(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pi_test",
                "object": "payment_intent",
                "amount": 1000,
                "currency": "usd",
                "status": "succeeded",
                "latest_charge": "ch_test"
            })))
            .expect(times)
            .mount(&self.stripe_api)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/payment_methods/pm_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pm_test",
                "object": "payment_method",
                "card": { "brand": "visa", "last4": "4242", "exp_month": 12, "exp_year": 2030 }
            })))
            .expect(times)
            .mount(&self.stripe_api)
            .await;
    }

    pub async fn mock_declined_charge(&self, code: &str) {
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": {
                    "type": "card_error",
                    "code": code,
                    "message": "The processor declined this card."
                }
            })))
            .expect(1)
            .mount(&self.stripe_api)
            .await;
    }
}

pub fn checkout_body() -> serde_json::Value {
    serde_json::json!({
        "cardholder-name": "Jane Doe",
        "cardholder-email": "jane@example.com",
        "payment-intent": "pi_test",
        "payment-method": "pm_test",
        "payment-amount": "1000",
        "payment-currency": "usd",
        "widget-id": "1"
    })
}
