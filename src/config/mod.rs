use std::env;

/// MIME allow-lists per folder category, built once at startup and passed
/// into the classifier and the upload pipeline. Insertion order matters:
/// classification walks image -> video -> audio -> document.
#[derive(Debug, Clone)]
pub struct MimePolicy {
    pub image: Vec<String>,
    pub video: Vec<String>,
    pub audio: Vec<String>,
    pub document: Vec<String>,
}

impl Default for MimePolicy {
    fn default() -> Self {
        Self {
            image: parse_mime_list(DEFAULT_IMAGE_MIMETYPES).unwrap_or_default(),
            video: parse_mime_list(DEFAULT_VIDEO_MIMETYPES).unwrap_or_default(),
            audio: parse_mime_list(DEFAULT_AUDIO_MIMETYPES).unwrap_or_default(),
            document: parse_mime_list(DEFAULT_DOC_MIMETYPES).unwrap_or_default(),
        }
    }
}

impl MimePolicy {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            image: mime_list_from_env("IMAGE_MIMETYPES").unwrap_or(default.image),
            video: mime_list_from_env("VIDEO_MIMETYPES").unwrap_or(default.video),
            audio: mime_list_from_env("AUDIO_MIMETYPES").unwrap_or(default.audio),
            document: mime_list_from_env("DOC_MIMETYPES").unwrap_or(default.document),
        }
    }
}

/// Object storage connection settings (S3-compatible, e.g. Cloudflare R2).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub endpoint: String,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    /// Public access domain the bucket is served from; determines result URLs.
    pub public_domain: String,
}

/// Telegram bot credentials for the contact-form relay.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_url: String,
    pub bot_token: String,
    pub chat_id: String,
}

/// Cloudflare Turnstile settings for the browser upload route.
#[derive(Debug, Clone)]
pub struct TurnstileConfig {
    pub api_url: String,
    pub secret: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,

    /// Database connection string (sqlite or postgres)
    pub database_url: String,

    pub storage: StorageConfig,
    pub telegram: TelegramConfig,
    pub turnstile: TurnstileConfig,
    pub mime_policy: MimePolicy,

    /// Maximum accepted upload size in bytes (default: 100 MB)
    pub max_file_size: usize,

    /// Rate limit window in seconds (default: 5 minutes)
    pub rate_limit_window_secs: i64,

    /// Uploads allowed per IP per window (default: 10)
    pub rate_limit_max: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: "sqlite::memory:".to_string(),
            storage: StorageConfig {
                endpoint: String::new(),
                region: "auto".to_string(),
                access_key_id: String::new(),
                secret_access_key: String::new(),
                bucket: "files".to_string(),
                public_domain: "files.example.com".to_string(),
            },
            telegram: TelegramConfig {
                api_url: "https://api.telegram.org".to_string(),
                bot_token: String::new(),
                chat_id: String::new(),
            },
            turnstile: TurnstileConfig {
                api_url: "https://challenges.cloudflare.com".to_string(),
                secret: String::new(),
            },
            mime_policy: MimePolicy::default(),
            max_file_size: 100 * 1024 * 1024, // 100 MB
            rate_limit_window_secs: 5 * 60,
            rate_limit_max: 10,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            database_url: env::var("DATABASE_URL").unwrap_or(default.database_url),

            storage: StorageConfig {
                endpoint: env::var("STORAGE_ENDPOINT").unwrap_or(default.storage.endpoint),
                region: env::var("STORAGE_REGION").unwrap_or(default.storage.region),
                access_key_id: env::var("STORAGE_ACCESS_KEY_ID")
                    .unwrap_or(default.storage.access_key_id),
                secret_access_key: env::var("STORAGE_SECRET_ACCESS_KEY")
                    .unwrap_or(default.storage.secret_access_key),
                bucket: env::var("STORAGE_BUCKET").unwrap_or(default.storage.bucket),
                public_domain: env::var("STORAGE_PUBLIC_DOMAIN")
                    .unwrap_or(default.storage.public_domain),
            },

            telegram: TelegramConfig {
                api_url: env::var("TELEGRAM_API_URL").unwrap_or(default.telegram.api_url),
                bot_token: env::var("BOT_TOKEN").unwrap_or(default.telegram.bot_token),
                chat_id: env::var("CHAT_ID").unwrap_or(default.telegram.chat_id),
            },

            turnstile: TurnstileConfig {
                api_url: env::var("TURNSTILE_API_URL").unwrap_or(default.turnstile.api_url),
                secret: env::var("TURNSTILE_SECRET_KEY").unwrap_or(default.turnstile.secret),
            },

            mime_policy: MimePolicy::from_env(),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.rate_limit_window_secs),

            rate_limit_max: env::var("RATE_LIMIT_MAX")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.rate_limit_max),
        }
    }
}

fn mime_list_from_env(key: &str) -> Option<Vec<String>> {
    let raw = env::var(key).ok()?;
    match parse_mime_list(&raw) {
        Some(list) => Some(list),
        None => {
            tracing::error!("Could not parse {}: falling back to defaults", key);
            None
        }
    }
}

/// Parses a MIME list in the single-quoted env format, e.g.
/// `"['image/png', 'image/gif']"`.
fn parse_mime_list(raw: &str) -> Option<Vec<String>> {
    serde_json::from_str(&raw.replace('\'', "\"")).ok()
}

const DEFAULT_IMAGE_MIMETYPES: &str = "['image/jpeg', 'image/jpg', 'image/png', 'image/gif', 'image/webp', 'image/svg+xml', 'image/avif', 'image/heif', 'image/heic', 'image/x-icon', 'image/tiff']";

const DEFAULT_AUDIO_MIMETYPES: &str = "['audio/mp3', 'audio/mp4', 'audio/mpeg', 'audio/wav', 'audio/ogg', 'audio/webm', 'audio/x-midi', 'audio/midi', 'audio/x-ms-wma', 'audio/x-m4a', 'audio/flac', 'audio/aac', 'audio/webm', 'audio/wave']";

const DEFAULT_VIDEO_MIMETYPES: &str = "['video/mp4', 'video/webm', 'video/quicktime', 'video/x-msvideo', 'video/avi', 'video/mpeg', 'video/x-ms-wmv', 'video/3gpp2', 'video/3gpp', 'video/x-matroska', 'video/ogg']";

const DEFAULT_DOC_MIMETYPES: &str = "['text/plain', 'text/html', 'text/css', 'text/javascript', 'text/csv', 'text/xml', 'text/markdown', 'text/rtf', 'application/pdf', 'application/msword', 'application/vnd.ms-excel', 'application/vnd.ms-powerpoint', 'application/vnd.openxmlformats-officedocument.wordprocessingml.document', 'application/vnd.openxmlformats-officedocument.spreadsheetml.sheet', 'application/vnd.openxmlformats-officedocument.presentationml.presentation', 'application/vnd.oasis.opendocument.text', 'application/vnd.oasis.opendocument.spreadsheet', 'application/vnd.oasis.opendocument.presentation', 'application/rtf', 'application/x-abiword', 'application/zip', 'application/x-zip-compressed', 'application/x-rar-compressed', 'application/x-7z-compressed', 'application/x-tar', 'application/gzip', 'application/x-bzip', 'application/x-bzip2', 'application/json', 'application/ld+json', 'application/xml', 'application/javascript', 'application/typescript', 'application/x-httpd-php', 'application/x-yaml', 'application/graphql', 'application/sql', 'font/ttf', 'font/otf', 'font/woff', 'font/woff2', 'application/x-font-ttf', 'application/x-font-otf', 'application/font-woff', 'application/font-woff2', 'application/octet-stream', 'application/x-www-form-urlencoded', 'text/calendar', 'application/vnd.android.package-archive', 'application/x-msdownload', 'application/x-apple-diskimage']";
