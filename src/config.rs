use jsonwebtoken::Algorithm;
use std::env;
use std::str::FromStr;

/// Process-wide settings, loaded once at startup from the environment
/// (optionally via a `.env` file) and immutable afterwards.
pub struct Settings {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub auth: AuthConfig,
}

/// The subset of settings the token service needs: signing secret,
/// signing algorithm and access-token lifetime.
#[derive(Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            auth: AuthConfig::from_env(),
        }
    }
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let algorithm = env::var("ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        Self {
            secret_key: env::var("SECRET_KEY").expect("SECRET_KEY must be set"),
            algorithm: Algorithm::from_str(&algorithm)
                .expect("ALGORITHM must be a valid JWT algorithm"),
            access_token_expire_minutes: env::var("ACCESS_TOKEN_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("ACCESS_TOKEN_EXPIRE_MINUTES must be a number"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_env() {
        // Set required environment variables
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("SECRET_KEY", "test-secret");
        env::remove_var("SERVER_PORT");
        env::remove_var("SERVER_HOST");
        env::remove_var("ALGORITHM");
        env::remove_var("ACCESS_TOKEN_EXPIRE_MINUTES");

        let settings = Settings::from_env();

        assert_eq!(settings.database_url, "postgres://test");
        assert_eq!(settings.server_port, 8080);
        assert_eq!(settings.server_host, "127.0.0.1");
        assert_eq!(settings.auth.secret_key, "test-secret");
        assert_eq!(settings.auth.algorithm, Algorithm::HS256);
        assert_eq!(settings.auth.access_token_expire_minutes, 30);

        // Test custom values
        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("ALGORITHM", "HS384");
        env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "60");

        let settings = Settings::from_env();

        assert_eq!(settings.server_port, 3000);
        assert_eq!(settings.server_host, "0.0.0.0");
        assert_eq!(settings.auth.algorithm, Algorithm::HS384);
        assert_eq!(settings.auth.access_token_expire_minutes, 60);
    }
}
