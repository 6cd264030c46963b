use std::process::ExitCode;

use fleximart_catalog::mongo::catalog_handler::with_session;
use fleximart_catalog::{workflow, Config};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            log::error!("Error: {error}");
            return ExitCode::FAILURE;
        }
    };
    let params = config.params.clone();

    let outcome = with_session(&config, |products| async move {
        workflow::run(products, &params).await
    })
    .await;

    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("Error: {error:?}");
            ExitCode::FAILURE
        }
    }
}
