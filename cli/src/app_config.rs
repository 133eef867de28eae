use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    args::ConfigArgs,
    profile::{get_profile_data_dir, Profile},
};

pub const DEFAULT_DB_FILENAME: &str = "sprout.db";
pub const DEFAULT_TOKEN_FILENAME: &str = "token";
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Serialize)]
pub struct AppConfig {
    pub profile_name: String,
    pub profile_path: String,
    pub db_path: String,
    pub api_url: String,
    pub token_path: String,
    pub notifications: bool,
    pub profile_exists: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            profile_name: "default".to_string(),
            profile_path: "./".to_string(),
            db_path: format!("./{}", DEFAULT_DB_FILENAME),
            api_url: DEFAULT_API_URL.to_string(),
            token_path: format!("./{}", DEFAULT_TOKEN_FILENAME),
            notifications: true,
            profile_exists: false,
        }
    }
}

impl AppConfig {
    pub fn from_args(
        args: ConfigArgs,
        profile_name: &str,
        profile_path: &Path,
        profile: Option<&Profile>,
    ) -> Self {
        let defaults = AppConfig::default();
        let data_dir = get_profile_data_dir(profile_name);

        let db_path = profile
            .and_then(|p| p.db_path.as_ref())
            .cloned()
            .unwrap_or_else(|| path_string(data_dir.join(DEFAULT_DB_FILENAME)));

        let token_path = profile
            .and_then(|p| p.token_path.as_ref())
            .cloned()
            .unwrap_or_else(|| path_string(data_dir.join(DEFAULT_TOKEN_FILENAME)));

        let api_url = args
            .api_url
            .or_else(|| profile.and_then(|p| p.api_url.clone()))
            .unwrap_or(defaults.api_url);

        AppConfig {
            profile_name: profile_name.to_string(),
            profile_exists: profile.is_some(),
            profile_path: profile_path
                .to_str()
                .map(|p| p.to_string())
                .unwrap_or(defaults.profile_path),
            db_path,
            api_url: api_url.trim_end_matches('/').to_string(),
            token_path,
            notifications: profile.map(|p| p.notifications).unwrap_or(true),
        }
    }

    /// Stored access token, if the user has logged in
    pub fn token(&self) -> Option<String> {
        std::fs::read_to_string(&self.token_path)
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

fn path_string(path: PathBuf) -> String {
    path.to_string_lossy().into_owned()
}
