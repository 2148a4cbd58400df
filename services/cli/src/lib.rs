mod cli;
mod demo;
mod infra;
mod reports;

use cashback::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
