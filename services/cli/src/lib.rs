mod cli;
mod commands;
mod context;
mod render;

use monitoria::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
