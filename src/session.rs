//! Last session token, kept in a plaintext file between runs.
//!
//! Line one holds the token, line two the login it belongs to.

use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSession {
    pub token: String,
    pub login: String,
}

/// `Ok(None)` when there is no file or it holds no token.
pub fn load(path: &Path) -> Result<Option<SavedSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read session file {}", path.display()))?;

    let mut lines = content.lines();
    let token = lines.next().map(str::trim).unwrap_or_default();
    if token.is_empty() {
        return Ok(None);
    }
    let login = lines.next().map(str::trim).unwrap_or_default();
    Ok(Some(SavedSession {
        token: token.to_string(),
        login: login.to_string(),
    }))
}

pub fn save(path: &Path, session: &SavedSession) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format!("{}\n{}\n", session.token, session.login))
        .with_context(|| format!("Failed to write session file {}", path.display()))
}
