pub mod assessment;
pub mod error;
pub mod llm_config;
