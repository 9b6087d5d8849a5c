use crate::configuration::Configuration;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(about = "Pet-care appointment booking backend")]
struct CliArguments {
    /// Port the HTTP server listens on.
    #[arg(long, default_value_t = 3000)]
    port: u16,
    /// Postgres connection URL. Falls back to the DATABASE_URL
    /// environment variable; without either, timeslots are kept in
    /// memory and lost on restart.
    #[arg(long)]
    database_url: Option<String>,
}

#[derive(Clone)]
pub struct ConfigurationHandler {
    arguments: CliArguments,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        dotenvy::dotenv().ok();
        Self {
            arguments: CliArguments::parse(),
        }
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> u16 {
        self.arguments.port
    }

    fn database_url(&self) -> Option<String> {
        self.arguments
            .database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
    }
}
