use std::path::PathBuf;
use std::str::FromStr;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Root for data files and generated images |
/// | HTTP_PORT | 8000 | HTTP listen port |
/// | ENVIRONMENT | development | development / staging / production |
/// | PRODUCTS_FILE | {WORK_DIR}/products.json | Catalog backing file |
/// | PROMO_FILE | {WORK_DIR}/promo_codes.json | Promo backing file |
/// | IMAGES_DIR | {WORK_DIR}/images/products | Product derivative output dir |
/// | IMAGES_PUBLIC_PREFIX | /static/images/products | URL prefix of product images |
/// | BANNER_DIR | {WORK_DIR}/images | Directory holding banner.jpg |
/// | BANNER_PUBLIC_PATH | /static/images/banner.jpg | URL of the banner |
/// | PLACEHOLDER_FILE | {WORK_DIR}/images/placeholder.jpg | Generated placeholder asset |
/// | PLACEHOLDER_PATH | /static/images/placeholder.jpg | URL used when a product has no image |
/// | MAX_UPLOAD_BYTES | 3145728 | Per-file upload cap (banner and products) |
/// | MAX_IMAGES_PER_PRODUCT | 10 | Files accepted by one create call |
/// | PRUNE_ORPHAN_IMAGES | false | Delete product-<id>-* files on product delete |
/// | ADMIN_TOKEN | (unset) | Admin API token; unset disables the admin API |
/// | BOT_TOKEN | (unset) | Telegram bot token |
/// | MANAGER_CHAT_ID | (unset) | Chat that receives orders |
/// | BOT_USERNAME | (unset) | Bot handle used in share deep links |
/// | TELEGRAM_API_BASE | https://api.telegram.org | Bot API base URL |
/// | REQUEST_TIMEOUT_MS | 10000 | Outbound HTTP timeout |
/// | LOG_LEVEL | info | Default tracing filter |
/// | LOG_DIR | (unset) | Daily rolling log directory |
///
/// ```ignore
/// WORK_DIR=/srv/shop ADMIN_TOKEN=s3cret cargo run -p storefront-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub http_port: u16,
    pub environment: String,

    pub products_file: PathBuf,
    pub promo_file: PathBuf,
    pub images_dir: PathBuf,
    pub images_public_prefix: String,
    pub banner_dir: PathBuf,
    pub banner_public_path: String,
    pub placeholder_file: PathBuf,
    pub placeholder_path: String,

    pub max_upload_bytes: usize,
    pub max_images_per_product: usize,
    pub prune_orphan_images: bool,

    /// Injected secret, never defaulted
    pub admin_token: Option<String>,

    pub bot_token: Option<String>,
    pub manager_chat_id: Option<String>,
    pub bot_username: Option<String>,
    pub telegram_api_base: String,
    pub request_timeout_ms: u64,

    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults rooted at `WORK_DIR`.
    pub fn from_env() -> Self {
        let work_dir = PathBuf::from(env_or("WORK_DIR", "./data"));
        Self::from_env_with_work_dir(work_dir)
    }

    fn from_env_with_work_dir(work_dir: PathBuf) -> Self {
        let path_or = |key: &str, default: PathBuf| {
            std::env::var(key).map(PathBuf::from).unwrap_or(default)
        };

        Self {
            http_port: env_parse("HTTP_PORT", 8000),
            environment: env_or("ENVIRONMENT", "development"),

            products_file: path_or("PRODUCTS_FILE", work_dir.join("products.json")),
            promo_file: path_or("PROMO_FILE", work_dir.join("promo_codes.json")),
            images_dir: path_or("IMAGES_DIR", work_dir.join("images").join("products")),
            images_public_prefix: env_or("IMAGES_PUBLIC_PREFIX", "/static/images/products"),
            banner_dir: path_or("BANNER_DIR", work_dir.join("images")),
            banner_public_path: env_or("BANNER_PUBLIC_PATH", "/static/images/banner.jpg"),
            placeholder_file: path_or(
                "PLACEHOLDER_FILE",
                work_dir.join("images").join("placeholder.jpg"),
            ),
            placeholder_path: env_or("PLACEHOLDER_PATH", "/static/images/placeholder.jpg"),

            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 3 * 1024 * 1024),
            max_images_per_product: env_parse("MAX_IMAGES_PER_PRODUCT", 10),
            prune_orphan_images: env_parse("PRUNE_ORPHAN_IMAGES", false),

            admin_token: env_opt("ADMIN_TOKEN"),

            bot_token: env_opt("BOT_TOKEN"),
            manager_chat_id: env_opt("MANAGER_CHAT_ID"),
            bot_username: env_opt("BOT_USERNAME"),
            telegram_api_base: env_or("TELEGRAM_API_BASE", "https://api.telegram.org"),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS", 10_000),

            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: env_opt("LOG_DIR"),

            work_dir,
        }
    }

    /// Environment config re-rooted at `work_dir`
    ///
    /// Used by tests: every file path lands under the given directory
    /// regardless of path variables in the environment.
    pub fn with_overrides(work_dir: impl Into<PathBuf>, http_port: u16) -> Self {
        let work_dir = work_dir.into();
        let mut config = Self::from_env_with_work_dir(work_dir.clone());
        config.http_port = http_port;
        config.products_file = work_dir.join("products.json");
        config.promo_file = work_dir.join("promo_codes.json");
        config.images_dir = work_dir.join("images").join("products");
        config.banner_dir = work_dir.join("images");
        config.placeholder_file = work_dir.join("images").join("placeholder.jpg");
        config
    }

    /// Whether running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Total multipart body accepted by the product create endpoint
    pub fn max_request_bytes(&self) -> usize {
        // one slot for the text fields on top of the files
        self.max_upload_bytes
            .saturating_mul(self.max_images_per_product + 1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_root_every_path() {
        let config = Config::with_overrides("/tmp/shop", 9100);
        assert_eq!(config.http_port, 9100);
        assert_eq!(config.products_file, PathBuf::from("/tmp/shop/products.json"));
        assert_eq!(config.promo_file, PathBuf::from("/tmp/shop/promo_codes.json"));
        assert_eq!(
            config.images_dir,
            PathBuf::from("/tmp/shop/images/products")
        );
        assert_eq!(
            config.placeholder_file,
            PathBuf::from("/tmp/shop/images/placeholder.jpg")
        );
    }

    #[test]
    fn test_request_cap_covers_all_files() {
        let mut config = Config::with_overrides("/tmp/shop", 0);
        config.max_upload_bytes = 100;
        config.max_images_per_product = 3;
        assert_eq!(config.max_request_bytes(), 400);
    }
}
