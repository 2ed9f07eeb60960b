use std::env;
use secrecy::SecretString;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub topics_collection: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub cors_allowed_origin: String,
    pub openai_api_key: Option<SecretString>,
    pub openai_model: String,
    pub openai_api_base: Option<String>,
    pub azure_speech_key: Option<SecretString>,
    pub azure_speech_region: Option<String>,
}

/// Reads an environment variable, treating empty or whitespace values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "research-coach-local".to_string()),
            topics_collection: env::var("TOPICS_COLLECTION")
                .unwrap_or_else(|_| "topics".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3001),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            openai_api_key: non_empty_var("OPENAI_API_KEY").map(SecretString::from),
            openai_model: non_empty_var("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            openai_api_base: non_empty_var("OPENAI_API_BASE"),
            azure_speech_key: non_empty_var("AZURE_SPEECH_KEY").map(SecretString::from),
            azure_speech_region: non_empty_var("AZURE_SPEECH_REGION"),
        }
    }

    /// Names of the provider credentials that are not configured.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.is_none() {
            missing.push("OPENAI_API_KEY");
        }
        if self.azure_speech_key.is_none() {
            missing.push("AZURE_SPEECH_KEY");
        }
        if self.azure_speech_region.is_none() {
            missing.push("AZURE_SPEECH_REGION");
        }
        missing
    }

    /// Logs missing provider credentials. The server still starts; the
    /// affected endpoints answer 500 until the variables are set.
    pub fn report_missing_credentials(&self) {
        for name in self.missing_credentials() {
            log::error!("{} is not set; dependent endpoints will return 500", name);
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "research-coach-test".to_string(),
            topics_collection: "topics".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 3001,
            cors_allowed_origin: "http://localhost:5173".to_string(),
            openai_api_key: Some(SecretString::from("sk-test".to_string())),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            openai_api_base: None,
            azure_speech_key: Some(SecretString::from("speech-test".to_string())),
            azure_speech_region: Some("japaneast".to_string()),
        }
    }
}
