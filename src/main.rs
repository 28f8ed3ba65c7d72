use assessflow::application::AssessmentReportUseCase;
use assessflow::application::RecommendationService;
use assessflow::infrastructure::config::AppConfig;
use assessflow::infrastructure::llm_clients::{LLMClient, RouterClient};
use assessflow::interfaces::http::start_server;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Failed to load configuration");
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                err.to_string(),
            ));
        }
    };

    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new());
    let recommendation_service = Arc::new(RecommendationService::new(
        llm_client,
        config.llm_config(),
    ));
    let report_use_case = AssessmentReportUseCase::new();
    let logs = Arc::new(Mutex::new(Vec::new()));

    info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting AssessFlow server"
    );

    start_server(
        report_use_case,
        recommendation_service,
        logs,
        config.server.host.clone(),
        config.server.port,
    )?
    .await
}
