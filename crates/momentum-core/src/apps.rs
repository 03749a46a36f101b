//! Cosmetic "locked apps" selection.
//!
//! Nothing is actually blocked. The selection is shown as a reminder badge
//! while focus mode is active and is stored under its own key, outside the
//! session record.

use serde::{Deserialize, Serialize};

/// Apps the user may pick from, in display order.
pub const APP_CATALOG: [&str; 10] = [
    "Instagram",
    "TikTok",
    "YouTube",
    "Twitter",
    "Discord",
    "Reddit",
    "Snapchat",
    "Twitch",
    "Facebook",
    "Pinterest",
];

/// Canonical catalog spelling of `name`, matched case-insensitively.
pub fn catalog_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    APP_CATALOG
        .iter()
        .copied()
        .find(|app| app.eq_ignore_ascii_case(name))
}

/// A set of catalog apps, kept in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockedApps {
    names: Vec<String>,
}

impl LockedApps {
    /// Build a selection, failing on the first name outside the catalog.
    pub fn from_names<I, T>(names: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut picked = Vec::new();
        for name in names {
            let name = name.as_ref();
            match catalog_name(name) {
                Some(app) => picked.push(app),
                None => return Err(name.to_string()),
            }
        }
        Ok(Self::in_catalog_order(&picked))
    }

    /// Keep only catalog entries; used when decoding persisted data.
    pub fn sanitized(names: Vec<String>) -> Self {
        let picked: Vec<&'static str> = names.iter().filter_map(|n| catalog_name(n)).collect();
        Self::in_catalog_order(&picked)
    }

    fn in_catalog_order(picked: &[&'static str]) -> Self {
        let names = APP_CATALOG
            .iter()
            .copied()
            .filter(|app| picked.contains(app))
            .map(|app| app.to_string())
            .collect();
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name.trim()))
    }

    /// Text for the settings summary line.
    pub fn summary(&self) -> String {
        self.badge()
            .unwrap_or_else(|| "No apps selected for lock.".to_string())
    }

    /// Text for the focus-mode badge; `None` hides it.
    pub fn badge(&self) -> Option<String> {
        if self.names.is_empty() {
            None
        } else {
            Some(format!("Locked: {}", self.names.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_follows_catalog_order_without_duplicates() {
        let apps = LockedApps::from_names(["reddit", "Instagram", "REDDIT"]).unwrap();
        assert_eq!(apps.names(), ["Instagram", "Reddit"]);
    }

    #[test]
    fn unknown_app_is_reported() {
        let err = LockedApps::from_names(["YouTube", "Minesweeper"]).unwrap_err();
        assert_eq!(err, "Minesweeper");
    }

    #[test]
    fn sanitized_drops_unknown_names() {
        let apps = LockedApps::sanitized(vec!["Twitch".into(), "Solitaire".into()]);
        assert_eq!(apps.names(), ["Twitch"]);
    }

    #[test]
    fn summary_and_badge_text() {
        let none = LockedApps::default();
        assert_eq!(none.summary(), "No apps selected for lock.");
        assert!(none.badge().is_none());

        let some = LockedApps::from_names(["TikTok", "Discord"]).unwrap();
        assert_eq!(some.summary(), "Locked: TikTok, Discord");
        assert!(some.contains("discord"));
    }

    #[test]
    fn serializes_as_plain_list() {
        let apps = LockedApps::from_names(["Facebook"]).unwrap();
        assert_eq!(serde_json::to_string(&apps).unwrap(), r#"["Facebook"]"#);
    }
}
