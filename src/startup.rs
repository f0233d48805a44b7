use std::net::TcpListener;

use actix_web::{dev::Server, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{
    checkout::CheckoutWorkflow,
    configuration::Settings,
    db_interaction::Store,
    payment_gateway::PaymentGateway,
    routes::{get_widget, health_check, payment_succeeded}
};

pub struct Application{
    pub host: String,
    pub port: u16,
    pub server: Server
}

impl Application {
    // Binds the listener, port 0 picks a random free port
    pub async fn new(settings: Settings) -> Result<Self, anyhow::Error>{
        let store = Store::from_settings(&settings.database);
        let gateway = PaymentGateway::from_settings(&settings.stripe);
        let workflow = CheckoutWorkflow::new(store.clone(), gateway, settings.stripe.currency.clone());

        let listener = TcpListener::bind((settings.application.host.as_str(), settings.application.port))?;
        let port = listener.local_addr()?.port();

        let server = get_server(listener, store, workflow)?;

        Ok(Application{
            host: settings.application.host,
            port,
            server
        })
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

fn get_server(
    listener: TcpListener,
    store: Store,
    workflow: CheckoutWorkflow
) -> Result<Server, anyhow::Error>{
    let store = web::Data::new(store);
    let workflow = web::Data::new(workflow);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .route("/health", web::get().to(health_check))
            .route("/widget/{id}", web::get().to(get_widget))
            .route("/payment-succeeded", web::post().to(payment_succeeded))
            .app_data(store.clone())
            .app_data(workflow.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
