mod batch;
mod cli;
mod infra;
mod routes;
mod server;

use claim_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
