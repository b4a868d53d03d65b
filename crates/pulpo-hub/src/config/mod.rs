pub mod airtable;
pub mod server_settings;
pub mod session_secret;
pub mod settings;

use anyhow::Result;
use std::path::PathBuf;

pub use airtable::AirtableSettings;

#[derive(Debug, Clone)]
pub struct Configuration {
    pub data_dir: PathBuf,
    pub settings_file: PathBuf,
    pub listen_host: String,
    pub listen_port: u16,
    pub public_url: String,
    pub cors_origins: Vec<String>,
    pub secure_cookies: bool,
    /// Shared staff password. Login always fails while unset.
    pub app_password: Option<String>,
    pub airtable: AirtableSettings,
}

impl Configuration {
    pub fn create() -> Result<Self> {
        // Resolve data directory: PULPO_HOME env or ~/.pulpo
        let data_dir = if let Ok(home) = std::env::var("PULPO_HOME") {
            PathBuf::from(home)
        } else {
            let home = dirs_next::home_dir()
                .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
            home.join(".pulpo")
        };
        std::fs::create_dir_all(&data_dir)?;

        let settings_file = settings::settings_file_path(&data_dir);
        let ss = server_settings::load_server_settings(&data_dir)?.settings;

        Ok(Configuration {
            data_dir,
            settings_file,
            listen_host: ss.listen_host,
            listen_port: ss.listen_port,
            public_url: ss.public_url,
            cors_origins: ss.cors_origins,
            secure_cookies: ss.secure_cookies,
            app_password: std::env::var("APP_PASSWORD").ok().filter(|p| !p.is_empty()),
            airtable: AirtableSettings::from_env(),
        })
    }
}
