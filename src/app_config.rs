use crate::error::CouponSearchError;

/// Process-wide configuration, loaded once at startup from the environment
/// (and an optional local `.env` file, tolerant of being absent).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub log_level: String,
    pub environment: String,
    pub coupon_code_folder_path: String,
    pub coupon_code_file_partial_index_chunk_size: usize,
    pub coupon_code_file_concurrent_pool_size: usize,
}

impl AppConfig {
    pub fn load() -> Result<AppConfig, CouponSearchError> {
        let _ = dotenvy::dotenv();

        Ok(
            AppConfig {
                port: env_int("PORT", 8080)? as u16,
                log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
                environment: env_string("ENVIRONMENT", "development").to_lowercase(),
                coupon_code_folder_path: require_env("COUPON_CODE_FOLDER_PATH")?,
                coupon_code_file_partial_index_chunk_size: env_int("COUPON_CODE_FILE_PARTIAL_INDEX_CHUNK_SIZE", 100_000)?,
                coupon_code_file_concurrent_pool_size: env_int("COUPON_CODE_FILE_CONCURRENT_POOL_SIZE", 5)?,
            }
        )
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_int(key: &str, default: usize) -> Result<usize, CouponSearchError> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(val) => {
            match val.parse::<usize>() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    log::warn!("failed to parse {} as an integer: {}, using default {}", key, e, default);
                    Ok(default)
                }
            }
        }
    }
}

fn require_env(key: &str) -> Result<String, CouponSearchError> {
    std::env::var(key).map_err(|_| CouponSearchError::Config(format!("required environment variable {} not set", key)))
}
