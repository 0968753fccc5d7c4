/// Settings for [`build_action_pipeline`](crate::service::middleware::build_action_pipeline).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Label the timing layer reports durations under.
    pub label: String,
    /// Indentation of the logging layer; 0 marks an outermost handler.
    pub log_indentation: usize,
    /// Total attempts made by the retry layer, first call included.
    pub retry_attempts: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            label: "action".to_string(),
            log_indentation: 0,
            retry_attempts: 1,
        }
    }
}
