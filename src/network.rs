//! Network URL constants and environment variable names.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.metals.dev/v1";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "METALS_DEV_API_KEY";

/// Environment variable overriding [`DEFAULT_API_URL`].
pub const API_URL_ENV: &str = "METALS_DEV_API_URL";
