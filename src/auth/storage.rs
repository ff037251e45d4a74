use super::session::TokenCallback;
use super::Token;
use crate::client::Result;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize)]
struct StoredToken {
    client_id: String,
    #[serde(flatten)]
    token: Token,
    last_updated: DateTime<Utc>,
}

/// Persists tokens as JSON, one file per client id.
#[derive(Debug, Clone)]
pub struct TokenStorage {
    client_id: String,
    path: PathBuf,
}

impl TokenStorage {
    /// Storage at `~/.redstream/<client_id>.json`.
    pub fn for_client(client_id: &str) -> Self {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".redstream");
        path.push(format!("{}.json", client_id));
        Self::at(client_id, path)
    }

    pub fn at(client_id: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            client_id: client_id.to_string(),
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored token, if there is a readable one for this client.
    pub fn load(&self) -> Option<Token> {
        let contents = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredToken>(&contents) {
            Ok(stored) if stored.client_id == self.client_id => Some(stored.token),
            Ok(_) => {
                debug!("Token file {} belongs to another client", self.path.display());
                None
            }
            Err(e) => {
                debug!("Failed to parse token storage: {}", e);
                None
            }
        }
    }

    pub fn save(&self, token: &Token) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let stored = StoredToken {
            client_id: self.client_id.clone(),
            token: token.clone(),
            last_updated: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        debug!("Saved token storage to {}", self.path.display());
        Ok(())
    }

    /// A refresh callback that writes every new token to this file.
    pub fn callback(self) -> TokenCallback {
        Box::new(move |token| {
            if let Err(e) = self.save(token) {
                warn!("Failed to save token to {}: {}", self.path.display(), e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saves_and_loads_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TokenStorage::at("cid", dir.path().join("nested").join("cid.json"));
        assert!(storage.load().is_none());

        let token = Token::new("abc")
            .expiring_in(3600)
            .with_refresh_token(Some("refresh".into()));
        storage.save(&token).unwrap();
        assert_eq!(storage.load(), Some(token));
    }

    #[test]
    fn ignores_tokens_of_other_clients() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.json");
        TokenStorage::at("one", &path).save(&Token::new("abc")).unwrap();
        assert!(TokenStorage::at("two", &path).load().is_none());
    }

    #[test]
    fn callback_persists_token() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TokenStorage::at("cid", dir.path().join("cid.json"));
        let callback = storage.clone().callback();
        callback(&Token::new("from-callback"));
        assert_eq!(storage.load().unwrap().access_token, "from-callback");
    }
}
