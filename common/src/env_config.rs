use std::{env, sync::Arc};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// Holds everything needed to start the voucher service: database and
/// listener settings, admin session signing, SMS gateway access and the
/// tuning knobs for caching and rate limiting.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for admin session tokens.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS (Cross-Origin Resource Sharing).
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// Requests per second accepted across the whole server.
    pub rate_limit_per_second: u32,
    /// Lifetime of cached voucher availability, in seconds. Zero disables the cache.
    pub voucher_cache_ttl_seconds: u64,
    /// SMS gateway settings.
    pub sms: SmsConfig,
    /// Admin profile to create or refresh at startup.
    pub admin_bootstrap: Option<AdminBootstrap>,
}

#[derive(Clone, Debug)]
/// Configuration for admin session tokens.
///
/// The secret signs both the JWT handed to the admin client and the
/// session cookie, so it has to be at least 32 bytes long.
pub struct JwtConfig {
    /// The secret key used to sign and verify JWTs.
    pub secret: String,
    /// The expiration time for admin sessions in hours.
    pub expiration_hours: i64,
}

#[derive(Clone, Debug)]
/// Access to the external SMS gateway.
pub struct SmsConfig {
    /// Full URL of the send-sms endpoint.
    pub api_url: String,
    /// Value of the `X-API-Key` header.
    pub api_key: String,
    /// Country calling code without the plus sign, e.g. `256`.
    pub country_code: String,
    /// Brand name used in message templates.
    pub brand_name: String,
    /// HTTP timeout for a single gateway call.
    pub timeout_seconds: u64,
}

#[derive(Clone, Debug)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// - `JWT_SECRET`: Required, at least 32 bytes.
    /// - `SESSION_TTL_HOURS`: Optional. Defaults to 12 hours.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is missing or too short, or if
    /// `SESSION_TTL_HOURS` is not a number.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
        assert!(
            secret.len() >= 32,
            "JWT_SECRET must be at least 32 bytes long"
        );

        JwtConfig {
            secret,
            expiration_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .expect("SESSION_TTL_HOURS must be a valid number"),
        }
    }
}

impl SmsConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        SmsConfig {
            api_url: env::var("SMS_API_URL").unwrap_or_else(|_| {
                "https://lucosms-api.onrender.com/api/v1/client/send-sms".to_string()
            }),
            api_key: env::var("SMS_API_KEY").expect("SMS_API_KEY must be set"),
            country_code: env::var("SMS_COUNTRY_CODE").unwrap_or_else(|_| "256".to_string()),
            brand_name: env::var("SMS_BRAND_NAME").unwrap_or_else(|_| "Luco WIFI".to_string()),
            timeout_seconds: env::var("SMS_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: `development` or `production`
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret for admin sessions (via `JwtConfig::from_env()`)
    /// - `SMS_API_KEY`: SMS gateway key (via `SmsConfig::from_env()`)
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "http://localhost:3000")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `RATE_LIMIT_PER_SECOND`: Global request quota (default: 20)
    /// - `VOUCHER_CACHE_TTL_SECONDS`: Availability cache lifetime (default: 30)
    /// - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: Admin profile bootstrapped at startup
    ///
    /// # Panics
    ///
    /// Panics if required environment variables are missing.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        let admin_bootstrap = match (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(username), Ok(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { username, password })
            }
            _ => None,
        };

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_config: JwtConfig::from_env(),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            rate_limit_per_second: env::var("RATE_LIMIT_PER_SECOND")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .unwrap_or(20),
            voucher_cache_ttl_seconds: env::var("VOUCHER_CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            sms: SmsConfig::from_env(),
            admin_bootstrap,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
