use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub shop: ShopConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    /// 为空时允许任意来源 (本地开发)
    #[serde(default)]
    pub allowed_origin: Option<String>,
}

/// 商城业务参数，金额单位为分
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopConfig {
    pub initial_balance: i64,
    pub max_top_up: i64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1_000_000,
            max_top_up: 1_000_000,
        }
    }
}

const DEFAULT_DATABASE_URL: &str = "sqlite://db/blindbox.db?mode=rwc";

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env_defaults(),
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_env_defaults() -> Self {
        Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 7001u16),
            },
            database: DatabaseConfig {
                url: get_env("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET")
                    .unwrap_or_else(|| "change-me-in-production".to_string()),
                access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 172_800i64),
                refresh_token_expires_in: get_env_parse("JWT_REFRESH_EXPIRES_IN", 2_592_000i64),
            },
            cors: CorsConfig {
                allowed_origin: get_env("CORS_ALLOWED_ORIGIN"),
            },
            shop: ShopConfig::default(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("CORS_ALLOWED_ORIGIN") {
            self.cors.allowed_origin = Some(v);
        }
        if let Ok(v) = env::var("SHOP_INITIAL_BALANCE")
            && let Ok(n) = v.parse()
        {
            self.shop.initial_balance = n;
        }
        if let Ok(v) = env::var("SHOP_MAX_TOP_UP")
            && let Ok(n) = v.parse()
        {
            self.shop.max_top_up = n;
        }
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.shop.initial_balance < 0 {
            return Err("shop.initial_balance 不能为负数".into());
        }
        if self.shop.max_top_up <= 0 {
            return Err("shop.max_top_up 必须大于 0".into());
        }
        if self.jwt.access_token_expires_in <= 0 || self.jwt.refresh_token_expires_in <= 0 {
            return Err("jwt 过期时间必须大于 0".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_file_with_optional_sections_missing() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "sqlite::memory:"
            max_connections = 2

            [jwt]
            secret = "s"
            access_token_expires_in = 60
            refresh_token_expires_in = 120
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.shop.initial_balance, 1_000_000);
        assert!(config.cors.allowed_origin.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_top_up_limit() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 7001

            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [jwt]
            secret = "s"
            access_token_expires_in = 60
            refresh_token_expires_in = 120

            [shop]
            initial_balance = 0
            max_top_up = 0
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(config.validate().is_err());
    }
}
