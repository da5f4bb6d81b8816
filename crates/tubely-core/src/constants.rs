/// Prefix for all API routes.
pub const API_PREFIX: &str = "/api";

/// Default ceiling for thumbnail uploads (10 MiB).
pub const DEFAULT_MAX_THUMBNAIL_BYTES: u64 = 10 << 20;

/// Default ceiling for video uploads (1 GiB).
pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 1 << 30;
