use std::{collections::HashMap, fs};

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_url: String,
    pub max_select: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8080".into(),
            // the largest party the original venue form allows
            max_select: 18,
        }
    }
}

/// Layering: `venue.toml`, then `VENUE_*` environment variables, then the
/// CLI flag.
pub fn load_settings(cli_server_url: Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("venue.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("server_url") {
                settings.server_url = v.clone();
            }
            if let Some(v) = file_cfg.get("max_select") {
                if let Ok(parsed) = v.parse::<usize>() {
                    settings.max_select = parsed;
                }
            }
        }
    }

    if let Ok(v) = std::env::var("VENUE_SERVER_URL") {
        settings.server_url = v;
    }
    if let Ok(v) = std::env::var("VENUE_MAX_SELECT") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.max_select = parsed;
        }
    }

    if let Some(v) = cli_server_url {
        settings.server_url = v;
    }

    settings
}
