use crate::application::use_cases::recommendation_service::{
    RecommendationRequest, RecommendationService,
};
use crate::application::use_cases::summary_export::{
    export_summary_csv, SUMMARY_EXPORT_FILENAME,
};
use crate::application::AssessmentReportUseCase;
use crate::domain::assessment::AreaSummary;
use crate::domain::error::AppError;
use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub report_use_case: AssessmentReportUseCase,
    pub recommendation_service: Arc<RecommendationService>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentRequest {
    pub csv_text: String,
}

#[derive(Serialize)]
pub struct ExportResponse {
    pub filename: String,
    pub csv: String,
}

#[post("/assessment")]
async fn perform_assessment(
    data: web::Data<HttpState>,
    req: web::Json<AssessmentRequest>,
) -> impl Responder {
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!("Performing assessment ({} bytes)", req.csv_text.len()),
    );

    match data.report_use_case.execute(&req.csv_text) {
        Ok(report) => {
            // A fresh upload invalidates every cached recommendation
            data.recommendation_service.clear();
            add_log(
                &data.logs,
                "INFO",
                "HttpApi",
                &format!(
                    "{} records parsed and {} assessment areas analyzed",
                    report.items.len(),
                    report.areas.len()
                ),
            );
            HttpResponse::Ok().json(report)
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Assessment failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[post("/recommendations")]
async fn area_recommendations(
    data: web::Data<HttpState>,
    req: web::Json<RecommendationRequest>,
) -> impl Responder {
    add_log(
        &data.logs,
        "INFO",
        "HttpApi",
        &format!(
            "Generating recommendations for '{}' ({} questions, avg {})",
            req.area,
            req.questions.len(),
            req.average_score
        ),
    );

    match data.recommendation_service.fetch_for_area(&req).await {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Recommendations failed for '{}': {}", req.area, e),
            );
            error_response(&e)
        }
    }
}

#[post("/export")]
async fn export_summary(
    data: web::Data<HttpState>,
    req: web::Json<Vec<AreaSummary>>,
) -> impl Responder {
    match export_summary_csv(&req) {
        Ok(csv) => HttpResponse::Ok().json(ExportResponse {
            filename: SUMMARY_EXPORT_FILENAME.to_string(),
            csv,
        }),
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Export failed: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data.logs.lock().unwrap();
    HttpResponse::Ok().json(&*logs)
}

fn error_response(error: &AppError) -> HttpResponse {
    match error {
        AppError::ParseError(_) | AppError::ValidationError(_) => {
            HttpResponse::BadRequest().body(error.to_string())
        }
        AppError::LLMError(_) => HttpResponse::BadGateway().body(error.to_string()),
        AppError::Internal(_) | AppError::IoError(_) => {
            HttpResponse::InternalServerError().body(error.to_string())
        }
    }
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap();
    logs.push(entry.clone());
    if logs.len() > 100 {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn start_server(
    report_use_case: AssessmentReportUseCase,
    recommendation_service: Arc<RecommendationService>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
    host: String,
    port: u16,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState {
        report_use_case,
        recommendation_service,
        logs,
    });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new().wrap(cors).app_data(state.clone()).service(
            web::scope("/api")
                .service(perform_assessment)
                .service(area_recommendations)
                .service(export_summary)
                .service(get_logs),
        )
    })
    .bind((host.as_str(), port))?
    .run();

    Ok(server)
}
