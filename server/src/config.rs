use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
/// Tile archives and downloadable GeoJSON live here.
pub const DEFAULT_DATA_DIR: &str = "public/data";
pub const DEFAULT_CLIENT_DIST_DIR: &str = "client/dist";

pub const STATIC_ASSET_CACHE_CONTROL: &str = "public, max-age=86400";
pub const HASHED_ASSET_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn data_dir() -> PathBuf {
    dir_from_env("DATA_DIR", DEFAULT_DATA_DIR)
}

pub fn client_dist_dir() -> PathBuf {
    dir_from_env("CLIENT_DIST_DIR", DEFAULT_CLIENT_DIST_DIR)
}

pub fn geocoder_api_key() -> Option<String> {
    std::env::var("GEOCODER_API_KEY")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn dir_from_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_port_falls_back_on_invalid_values() {
        temp_env::with_var("SERVER_PORT", Some("8080"), || {
            assert_eq!(server_port(), 8080);
        });
        temp_env::with_var("SERVER_PORT", Some("0"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var("SERVER_PORT", Some("not-a-port"), || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
        temp_env::with_var_unset("SERVER_PORT", || {
            assert_eq!(server_port(), DEFAULT_SERVER_PORT);
        });
    }

    #[test]
    fn data_dir_ignores_blank_override() {
        temp_env::with_var("DATA_DIR", Some("/srv/riesgo/data"), || {
            assert_eq!(data_dir(), PathBuf::from("/srv/riesgo/data"));
        });
        temp_env::with_var("DATA_DIR", Some("   "), || {
            assert_eq!(data_dir(), PathBuf::from(DEFAULT_DATA_DIR));
        });
    }

    #[test]
    fn geocoder_key_is_optional() {
        temp_env::with_var("GEOCODER_API_KEY", Some(" key-123 "), || {
            assert_eq!(geocoder_api_key().as_deref(), Some("key-123"));
        });
        temp_env::with_var("GEOCODER_API_KEY", Some(""), || {
            assert_eq!(geocoder_api_key(), None);
        });
    }
}
