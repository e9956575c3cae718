use serde::{Deserialize, Serialize};

/// Asset manifest describing every texture and model the host should fetch.
/// An asset's slot is its index in `assets`; the host reports completion per slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    pub assets: Vec<AssetDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Texture,
    Model,
}

/// Describes a single loadable asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Lookup key used by game data (e.g. "earth_day").
    pub name: String,
    pub kind: AssetKind,
    /// Path relative to the public asset root.
    pub path: String,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Slot of the asset named `name`.
    pub fn slot(&self, name: &str) -> Option<u32> {
        self.assets.iter().position(|a| a.name == name).map(|i| i as u32)
    }

    pub fn get(&self, slot: u32) -> Option<&AssetDescriptor> {
        self.assets.get(slot as usize)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Load state of one manifest slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetStatus {
    #[default]
    Pending,
    Ready,
    Failed,
}

/// Tracks host load reports. Failures are logged and never fatal.
#[derive(Debug, Clone, Default)]
pub struct AssetTracker {
    status: Vec<AssetStatus>,
}

impl AssetTracker {
    pub fn new(manifest: &AssetManifest) -> Self {
        Self {
            status: vec![AssetStatus::Pending; manifest.len()],
        }
    }

    /// Record a host report. Returns the new status, or `None` for an unknown slot.
    pub fn report(&mut self, manifest: &AssetManifest, slot: u32, ok: bool) -> Option<AssetStatus> {
        let entry = self.status.get_mut(slot as usize)?;
        *entry = if ok { AssetStatus::Ready } else { AssetStatus::Failed };
        if !ok {
            let path = manifest.get(slot).map_or("<unknown>", |a| a.path.as_str());
            log::warn!("asset slot {slot} ({path}) failed to load; continuing without it");
        }
        Some(*entry)
    }

    pub fn status(&self, slot: u32) -> AssetStatus {
        self.status.get(slot as usize).copied().unwrap_or_default()
    }

    pub fn is_ready(&self, slot: u32) -> bool {
        self.status(slot) == AssetStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "assets": [
            { "name": "sun", "kind": "texture", "path": "images/sun.jpg" },
            { "name": "phobos", "kind": "model", "path": "models/phobos.glb" }
        ]
    }"#;

    #[test]
    fn slots_follow_declaration_order() {
        let manifest = AssetManifest::from_json(JSON).unwrap();
        assert_eq!(manifest.slot("sun"), Some(0));
        assert_eq!(manifest.slot("phobos"), Some(1));
        assert_eq!(manifest.slot("deimos"), None);
        assert_eq!(manifest.get(1).map(|a| a.kind), Some(AssetKind::Model));
    }

    #[test]
    fn tracker_records_reports() {
        let manifest = AssetManifest::from_json(JSON).unwrap();
        let mut tracker = AssetTracker::new(&manifest);
        assert_eq!(tracker.status(1), AssetStatus::Pending);
        assert_eq!(tracker.report(&manifest, 1, true), Some(AssetStatus::Ready));
        assert_eq!(tracker.report(&manifest, 0, false), Some(AssetStatus::Failed));
        assert_eq!(tracker.report(&manifest, 9, true), None);
        assert!(tracker.is_ready(1));
        assert!(!tracker.is_ready(0));
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        assert!(AssetManifest::from_json(r#"{ "assets": [ { "name": 3 } ] }"#).is_err());
    }
}
