//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_INFERENCE_PROVIDER: &str = "gemini";
pub(crate) const DEFAULT_INFERENCE_MODEL: &str = "gemini-2.0-flash-exp";
pub(crate) const DEFAULT_INFERENCE_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub(crate) const DEFAULT_SEARCH_PROVIDER: &str = "duckduckgo";
pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
pub(crate) const DEFAULT_LOG_DIR: &str = "logs";
pub(crate) const DEFAULT_EVENT_LOG_FILE: &str = "agent.log";

pub(crate) fn default_inference_provider() -> String {
    DEFAULT_INFERENCE_PROVIDER.to_string()
}

pub(crate) fn default_inference_model() -> String {
    DEFAULT_INFERENCE_MODEL.to_string()
}

pub(crate) fn default_inference_api_base_url() -> String {
    DEFAULT_INFERENCE_API_BASE_URL.to_string()
}

pub(crate) fn default_inference_timeout_secs() -> u64 {
    120
}

pub(crate) fn default_upload_timeout_secs() -> u64 {
    1800
}

pub(crate) fn default_poll_interval_ms() -> u64 {
    1000
}

pub(crate) fn default_max_poll_interval_ms() -> u64 {
    8000
}

pub(crate) fn default_media_ready_timeout_secs() -> u64 {
    600
}

pub(crate) fn default_search_provider() -> String {
    DEFAULT_SEARCH_PROVIDER.to_string()
}

pub(crate) fn default_max_results() -> usize {
    5
}

pub(crate) fn default_search_timeout_secs() -> u64 {
    20
}

pub(crate) fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

pub(crate) fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

pub(crate) fn default_event_log_file() -> String {
    DEFAULT_EVENT_LOG_FILE.to_string()
}

pub(crate) fn default_server_port() -> u16 {
    8700
}

pub(crate) fn default_max_upload_mb() -> usize {
    512
}
