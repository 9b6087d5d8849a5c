use std::time::Duration;

use crate::{
    booking_service::SlotBookingService, configuration::Configuration,
    configuration_handler::ConfigurationHandler, database_store::DatabaseStore, http::create_app,
    local_store::LocalStore,
};
use tokio::time::sleep;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod booking_service;
mod configuration;
mod configuration_handler;
mod database_store;
mod http;
mod local_store;
mod schema;
mod store;
#[cfg(test)]
mod testutils;
mod types;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    info!("Listening on {address}");
    let listener = tokio::net::TcpListener::bind(address).await.unwrap();

    let app = if let Some(database_url) = configuration.database_url() {
        let store = loop {
            match DatabaseStore::new(&database_url) {
                Ok(store) => {
                    info!("Successfully connected to database");
                    break store;
                }
                Err(err) => {
                    error!(?err, "Failed to establish database connection: {database_url}. Retry in 1 sec. You may want to restart without a database URL (impersistent store).");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(SlotBookingService::new(store))
    } else {
        let store = LocalStore::default();
        store.insert_example_data();
        create_app(SlotBookingService::new(store))
    };

    axum::serve(listener, app).await.unwrap();
}
