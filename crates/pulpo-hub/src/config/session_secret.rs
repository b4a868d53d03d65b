use anyhow::Result;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SECRET_FILE: &str = "session-secret.json";
const SECRET_LEN: usize = 32;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSecretFile {
    secret_base64: String,
}

/// Key used to sign session cookies. Generated once and kept in the data
/// directory so sessions survive restarts.
pub fn get_or_create_session_secret(data_dir: &Path) -> Result<Vec<u8>> {
    let path = data_dir.join(SECRET_FILE);
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let file: SessionSecretFile = serde_json::from_str(&content)?;
        let bytes = STANDARD.decode(&file.secret_base64)?;
        if bytes.len() != SECRET_LEN {
            anyhow::bail!("invalid session secret length in {}", path.display());
        }
        return Ok(bytes);
    }

    let mut bytes = [0u8; SECRET_LEN];
    getrandom::fill(&mut bytes)
        .map_err(|e| anyhow::anyhow!("failed to generate random bytes: {e}"))?;
    let file = SessionSecretFile {
        secret_base64: STANDARD.encode(bytes),
    };
    let json = serde_json::to_string_pretty(&file)?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, json)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(bytes.to_vec())
}
