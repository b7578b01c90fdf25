mod cli;
mod infra;
mod routes;
mod server;
mod upload;
mod views;

use compliance_mapping::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
