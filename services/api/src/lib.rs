mod check;
mod cli;
mod infra;
mod routes;
mod server;

use min_order::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
