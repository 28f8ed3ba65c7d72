pub mod use_cases;

pub use use_cases::assessment_report::AssessmentReportUseCase;
pub use use_cases::recommendation_service::RecommendationService;
