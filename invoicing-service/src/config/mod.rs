use billing_core::AppError;
use secrecy::Secret;
use serde::Deserialize;

/// Runtime settings, loaded from an optional `configuration` file and
/// `APP_`-prefixed environment variables (env wins).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path of the JSON data file backing the ledger.
    #[serde(default = "default_data_file")]
    pub data_file: String,
    #[serde(default)]
    pub jwt: JwtSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Initial password assigned to seeded users on first boot.
    #[serde(default = "default_seed_password")]
    pub seed_password: Secret<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    #[serde(default = "default_jwt_secret")]
    pub secret: Secret<String>,
    #[serde(default = "default_token_expiry_hours")]
    pub token_expiry_hours: i64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            token_expiry_hours: default_token_expiry_hours(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3002
}

fn default_data_file() -> String {
    "data/billing.json".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_seed_password() -> Secret<String> {
    Secret::new("emb2025".to_string())
}

fn default_jwt_secret() -> Secret<String> {
    Secret::new("emb_secret_key_2025".to_string())
}

fn default_token_expiry_hours() -> i64 {
    24
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
