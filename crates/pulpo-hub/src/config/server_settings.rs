use super::settings::{read_settings, settings_file_path, write_settings};
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";
pub const DEFAULT_LISTEN_PORT: u16 = 3000;

pub struct ServerSettings {
    pub listen_host: String,
    pub listen_port: u16,
    pub public_url: String,
    pub cors_origins: Vec<String>,
    pub secure_cookies: bool,
}

pub struct ServerSettingsResult {
    pub settings: ServerSettings,
    pub saved_to_file: bool,
}

fn parse_cors_origins(s: &str) -> Vec<String> {
    let entries: Vec<String> = s
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if entries.iter().any(|e| e == "*") {
        return vec!["*".into()];
    }
    entries
}

fn derive_cors_origins(public_url: &str) -> Vec<String> {
    url::Url::parse(public_url)
        .ok()
        .map(|u| vec![u.origin().ascii_serialization()])
        .unwrap_or_default()
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn load_server_settings(data_dir: &Path) -> Result<ServerSettingsResult> {
    load_server_settings_with(data_dir, |key| std::env::var(key).ok())
}

/// Resolve each setting as env > settings file > default. Env values seen
/// for the first time are written back to the settings file.
pub fn load_server_settings_with(
    data_dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ServerSettingsResult> {
    let settings_path = settings_file_path(data_dir);
    let mut settings = read_settings(&settings_path)?;
    let mut needs_save = false;

    let listen_host = if let Some(v) = env("PULPO_LISTEN_HOST") {
        if settings.listen_host.is_none() {
            settings.listen_host = Some(v.clone());
            needs_save = true;
        }
        v
    } else if let Some(ref v) = settings.listen_host {
        v.clone()
    } else {
        DEFAULT_LISTEN_HOST.into()
    };

    let listen_port = if let Some(v) = env("PULPO_LISTEN_PORT") {
        let port: u16 = v
            .parse()
            .map_err(|_| anyhow::anyhow!("PULPO_LISTEN_PORT must be a valid port"))?;
        if settings.listen_port.is_none() {
            settings.listen_port = Some(port);
            needs_save = true;
        }
        port
    } else {
        settings.listen_port.unwrap_or(DEFAULT_LISTEN_PORT)
    };

    let public_url = if let Some(v) = env("PULPO_PUBLIC_URL") {
        if settings.public_url.is_none() {
            settings.public_url = Some(v.clone());
            needs_save = true;
        }
        v
    } else if let Some(ref v) = settings.public_url {
        v.clone()
    } else {
        format!("http://localhost:{listen_port}")
    };

    let cors_origins = if let Some(v) = env("CORS_ORIGINS") {
        let origins = parse_cors_origins(&v);
        if settings.cors_origins.is_none() {
            settings.cors_origins = Some(origins.clone());
            needs_save = true;
        }
        origins
    } else if let Some(ref v) = settings.cors_origins {
        v.clone()
    } else {
        derive_cors_origins(&public_url)
    };

    let secure_cookies = match env("PULPO_SECURE_COOKIES").as_deref().and_then(parse_bool) {
        Some(v) => {
            if settings.secure_cookies.is_none() {
                settings.secure_cookies = Some(v);
                needs_save = true;
            }
            v
        }
        None => settings
            .secure_cookies
            .unwrap_or_else(|| public_url.starts_with("https://")),
    };

    if needs_save {
        write_settings(&settings_path, &settings)?;
    }

    Ok(ServerSettingsResult {
        settings: ServerSettings {
            listen_host,
            listen_port,
            public_url,
            cors_origins,
            secure_cookies,
        },
        saved_to_file: needs_save,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_env_or_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_server_settings_with(dir.path(), env_of(&[])).unwrap();
        let s = result.settings;
        assert_eq!(s.listen_host, DEFAULT_LISTEN_HOST);
        assert_eq!(s.listen_port, DEFAULT_LISTEN_PORT);
        assert_eq!(s.public_url, "http://localhost:3000");
        assert_eq!(s.cors_origins, vec!["http://localhost:3000"]);
        assert!(!s.secure_cookies);
        assert!(!result.saved_to_file);
    }

    #[test]
    fn env_values_are_persisted_once() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_of(&[
            ("PULPO_LISTEN_PORT", "8088"),
            ("PULPO_PUBLIC_URL", "https://pulpo.example"),
        ]);
        let result = load_server_settings_with(dir.path(), env).unwrap();
        assert!(result.saved_to_file);
        assert_eq!(result.settings.listen_port, 8088);
        assert!(result.settings.secure_cookies);
        assert_eq!(result.settings.cors_origins, vec!["https://pulpo.example"]);

        let again = load_server_settings_with(dir.path(), env_of(&[])).unwrap();
        assert!(!again.saved_to_file);
        assert_eq!(again.settings.listen_port, 8088);
        assert_eq!(again.settings.public_url, "https://pulpo.example");
    }

    #[test]
    fn wildcard_cors_wins() {
        assert_eq!(parse_cors_origins("https://a.test, *"), vec!["*"]);
        assert_eq!(
            parse_cors_origins(" https://a.test ,,https://b.test"),
            vec!["https://a.test", "https://b.test"]
        );
    }

    #[test]
    fn invalid_port_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_of(&[("PULPO_LISTEN_PORT", "eighty")]);
        assert!(load_server_settings_with(dir.path(), env).is_err());
    }

    #[test]
    fn secure_cookie_override() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_of(&[
            ("PULPO_PUBLIC_URL", "https://pulpo.example"),
            ("PULPO_SECURE_COOKIES", "false"),
        ]);
        let result = load_server_settings_with(dir.path(), env).unwrap();
        assert!(!result.settings.secure_cookies);
    }
}
