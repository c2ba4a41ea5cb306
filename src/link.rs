//! Share-link contract.
//!
//! `<base>/paste/<id>#<key>`: the path carries the id, the fragment carries
//! the exported key. Fragments are never sent to a server, so the store side
//! only ever sees the id.

use crate::error::{PasteError, Result};

const PASTE_PATH: &str = "/paste/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    pub id: String,
    /// Exported key (base64), as produced by `PasteKey::export`.
    pub key: String,
}

impl ShareLink {
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
        }
    }

    /// Render the full URL under `base_url`.
    pub fn to_url(&self, base_url: &str) -> String {
        format!(
            "{}{}{}#{}",
            base_url.trim_end_matches('/'),
            PASTE_PATH,
            self.id,
            self.key
        )
    }

    /// Path-only form, for relative navigation.
    pub fn to_path(&self) -> String {
        format!("{}{}#{}", PASTE_PATH, self.id, self.key)
    }

    /// Extract id and key from a link.
    ///
    /// A missing or empty fragment is [`PasteError::MissingKey`], reported
    /// before anything else so callers can tell it apart from a bad id.
    pub fn parse(url: &str) -> Result<Self> {
        let (location, fragment) = url.split_once('#').unwrap_or((url, ""));
        let key = fragment.trim();
        if key.is_empty() {
            return Err(PasteError::MissingKey);
        }

        let path = location.split('?').next().unwrap_or(location);
        let id = path
            .rfind(PASTE_PATH)
            .map(|at| &path[at + PASTE_PATH.len()..])
            .map(|rest| rest.trim_end_matches('/'))
            .filter(|id| !id.is_empty() && !id.contains('/'))
            .ok_or_else(|| PasteError::Validation("share link has no paste id".into()))?;

        Ok(Self::new(id, key))
    }
}
