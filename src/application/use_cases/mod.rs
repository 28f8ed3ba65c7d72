pub mod area_aggregator;
pub mod assessment_report;
pub mod recommendation_service;
pub mod summary_export;
