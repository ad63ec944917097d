use std::time::Duration;

/// Default path of the sound configuration document
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Directory where imported sound clips are stored
pub const SOUNDS_DIR: &str = "./sounds";

/// Total connection attempt budget for joining a voice channel
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 5;

/// Upper bound on the exponential backoff interval, in seconds
pub const MAX_BACKOFF_SECS: u64 = 32;

/// Pause after tearing down a voice connection, so the transport can settle
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Maximum number of search results listed by /importsound
pub const MAX_SEARCH_RESULTS: usize = 25;

/// Tuna login page shown by /tunalogin
pub const TUNA_LOGIN_URL: &str = "https://tuna.voicemod.net/login";

/// Tuna authorization-code exchange endpoint
pub const TUNA_TOKEN_URL: &str = "https://tuna.voicemod.net/oauth/token";

/// Tuna sound search endpoint
pub const TUNA_SEARCH_URL: &str = "https://tuna.voicemod.net/sounds";

/// Host prefix of direct media links in Tuna search responses
pub const TUNA_CDN_PREFIX: &str = "https://cdn.tuna.voicemod.net/sounds/";

/// File suffix of direct media links in Tuna search responses
pub const SOUND_FILE_SUFFIX: &str = ".mp3";

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "greetbot_rs=info";
