mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use harbor_mail::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
