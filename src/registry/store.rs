//! Target registry backed by a whole-document JSON file

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{MonitoredTarget, RegistryError};
use crate::monitor::CheckResult;

/// Registry of monitored targets, persisted as one JSON document mapping
/// target name to its record.
///
/// Targets keep insertion order in memory and on disk (the document map is
/// written in registry order). Every mutating operation persists the whole
/// collection; per-pass updates are applied in a batch and saved once by the
/// caller.
#[derive(Debug)]
pub struct TargetRegistry {
    targets: Vec<MonitoredTarget>,
    path: PathBuf,
}

impl TargetRegistry {
    /// Load the registry from `path`.
    ///
    /// A missing file yields an empty registry. A file that exists but fails
    /// to parse is fatal: starting with an empty set would silently orphan
    /// the monitored targets.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            return Ok(Self {
                targets: Vec::new(),
                path,
            });
        }

        let data = std::fs::read_to_string(&path)?;
        let document: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&data)
            .map_err(|e| RegistryError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?;

        let mut targets = Vec::with_capacity(document.len());
        for (name, value) in document {
            let mut target: MonitoredTarget =
                serde_json::from_value(value).map_err(|e| RegistryError::Corrupt {
                    path: path.clone(),
                    message: format!("target '{}': {}", name, e),
                })?;
            target.name = name;
            target.validate()?;
            targets.push(target);
        }

        Ok(Self { targets, path })
    }

    /// Write the whole registry back to its document
    pub fn save(&self) -> Result<(), RegistryError> {
        let mut document = serde_json::Map::new();
        for target in &self.targets {
            let value = serde_json::to_value(target)
                .map_err(|e| RegistryError::Serialize(e.to_string()))?;
            document.insert(target.name.clone(), value);
        }

        let text = serde_json::to_string_pretty(&serde_json::Value::Object(document))
            .map_err(|e| RegistryError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, text)?;

        Ok(())
    }

    /// Insert or overwrite a target and persist immediately.
    ///
    /// Overwriting keeps the target's position; last-seen fields come from
    /// the replacement (reset for a freshly built target).
    pub fn add(&mut self, target: MonitoredTarget) -> Result<(), RegistryError> {
        target.validate()?;

        match self.targets.iter_mut().find(|t| t.name == target.name) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
        self.save()
    }

    /// Remove a target by name and persist.
    ///
    /// Returns `Ok(false)` when the name is unknown; the document is left
    /// untouched in that case.
    pub fn remove(&mut self, name: &str) -> Result<bool, RegistryError> {
        let Some(index) = self.targets.iter().position(|t| t.name == name) else {
            return Ok(false);
        };

        self.targets.remove(index);
        self.save()?;
        Ok(true)
    }

    /// All targets in insertion order
    pub fn list(&self) -> &[MonitoredTarget] {
        &self.targets
    }

    /// Look up a target by name
    pub fn get(&self, name: &str) -> Option<&MonitoredTarget> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Fold a check result into a target's last-seen fields without saving.
    /// Unknown names are ignored (the target was removed mid-pass).
    pub fn record_result(&mut self, name: &str, result: &CheckResult, at: DateTime<Utc>) {
        if let Some(target) = self.targets.iter_mut().find(|t| t.name == name) {
            target.record_check(result, at);
        }
    }

    /// Number of registered targets
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn registry_in(dir: &tempfile::TempDir) -> TargetRegistry {
        TargetRegistry::load(dir.path().join("apis.json")).unwrap()
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry_in(&dir);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_list_remove() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(&dir);

        let target = MonitoredTarget::new("github", "https://api.github.com/rate_limit")
            .with_threshold(0.9);
        registry.add(target).unwrap();

        let listed = registry.list();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, "github");
        assert_eq!(listed[0].threshold, 0.9);

        assert!(registry.remove("github").unwrap());
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_remove_unknown_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(&dir);
        registry
            .add(MonitoredTarget::new("a", "https://a.example.com"))
            .unwrap();
        let saved = std::fs::read_to_string(registry.path()).unwrap();

        assert!(!registry.remove("missing").unwrap());
        assert_eq!(registry.len(), 1);

        // Not-found removal must not rewrite the document
        assert_eq!(std::fs::read_to_string(registry.path()).unwrap(), saved);
    }

    #[test]
    fn test_add_rejects_invalid_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(&dir);
        let target = MonitoredTarget::new("t", "https://example.com").with_threshold(2.0);
        assert!(registry.add(target).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_add_overwrites_and_resets_last_seen() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(&dir);

        registry
            .add(MonitoredTarget::new("t", "https://example.com"))
            .unwrap();
        registry.record_result("t", &CheckResult::new(5, 100), Utc::now());
        assert!(registry.get("t").unwrap().last_limit.is_some());

        registry
            .add(MonitoredTarget::new("t", "https://other.example.com"))
            .unwrap();
        let target = registry.get("t").unwrap();
        assert_eq!(target.endpoint, "https://other.example.com");
        assert!(target.last_check.is_none());
        assert!(target.last_remaining.is_none());
        assert!(target.last_limit.is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = registry_in(&dir);

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), "token abc".to_string());
        registry
            .add(
                MonitoredTarget::new("github", "https://api.github.com/rate_limit")
                    .with_headers(headers)
                    .with_threshold(0.9),
            )
            .unwrap();
        registry
            .add(MonitoredTarget::new("other", "https://api.example.com"))
            .unwrap();
        registry.record_result("github", &CheckResult::new(10, 100), Utc::now());
        registry.save().unwrap();

        let reloaded = TargetRegistry::load(registry.path()).unwrap();
        assert_eq!(reloaded.list(), registry.list());
        // Insertion order survives the round trip
        assert_eq!(reloaded.list()[0].name, "github");
        assert_eq!(reloaded.list()[1].name, "other");
    }

    #[test]
    fn test_load_corrupt_document_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apis.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            TargetRegistry::load(&path),
            Err(RegistryError::Corrupt { .. })
        ));
    }
}
