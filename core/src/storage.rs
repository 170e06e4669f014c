use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Result, TrackError};
use crate::models::UserProfile;

/// JSON file of profiles keyed by user id. Stands in for the account
/// database; the pipeline only ever sees the fetched `UserProfile`.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, UserProfile>> {
        if !self.path.exists() {
            warn!("no profile store at {}, starting empty", self.path.display());
            return Ok(BTreeMap::new());
        }
        let contents =
            std::fs::read_to_string(&self.path).map_err(|e| TrackError::io(&self.path, e))?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, all: &BTreeMap<String, UserProfile>) -> Result<()> {
        let json = serde_json::to_string_pretty(all)?;
        std::fs::write(&self.path, json).map_err(|e| TrackError::io(&self.path, e))
    }

    /// `None` if the user has no stored profile.
    pub fn load_profile(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let profile = self.read_all()?.remove(user_id);
        info!(
            "profile for {} {} from {}",
            user_id,
            if profile.is_some() { "loaded" } else { "not found" },
            self.path.display()
        );
        Ok(profile)
    }

    /// Insert or replace the profile for `user_id`.
    pub fn save_profile(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        let mut all = self.read_all()?;
        all.insert(user_id.to_string(), profile.clone());
        self.write_all(&all)?;
        info!("profile for {} saved to {}", user_id, self.path.display());
        Ok(())
    }
}
