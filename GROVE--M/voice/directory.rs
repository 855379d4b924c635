use std::{fs, path::Path};

use async_trait::async_trait;

use crate::{error::DirectoryError, model::ProjectRef};

/// Read-only project lookup used to bind spoken project names.
#[async_trait]
pub trait ProjectDirectory: Send + Sync {
    /// Case-insensitive exact-or-substring match on the project title.
    /// Returns at most one project; ambiguity is reported as `None`.
    async fn find_by_name(&self, name: &str) -> Result<Option<ProjectRef>, DirectoryError>;
}

/// Directory over a fixed list of projects.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectDirectory {
    projects: Vec<ProjectRef>,
}

impl InMemoryProjectDirectory {
    /// Wraps the given projects.
    #[must_use]
    pub fn new(projects: Vec<ProjectRef>) -> Self {
        Self { projects }
    }

    /// Loads a JSON array of `{ "id", "title" }` objects.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|err| DirectoryError::Io(format!("{}: {err}", path.display())))?;
        let projects: Vec<ProjectRef> = serde_json::from_str(&raw)
            .map_err(|err| DirectoryError::Parse(format!("{}: {err}", path.display())))?;
        Ok(Self::new(projects))
    }

    /// Number of known projects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    /// Whether no projects are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<ProjectRef> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        if let Some(exact) = self
            .projects
            .iter()
            .find(|project| project.title.to_lowercase() == needle)
        {
            return Some(exact.clone());
        }
        let mut partial = self
            .projects
            .iter()
            .filter(|project| project.title.to_lowercase().contains(&needle));
        match (partial.next(), partial.next()) {
            (Some(only), None) => Some(only.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl ProjectDirectory for InMemoryProjectDirectory {
    async fn find_by_name(&self, name: &str) -> Result<Option<ProjectRef>, DirectoryError> {
        Ok(self.lookup(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn directory() -> InMemoryProjectDirectory {
        InMemoryProjectDirectory::new(vec![
            ProjectRef::new("p1", "Willow Creek"),
            ProjectRef::new("p2", "Willow Creek Orchard"),
            ProjectRef::new("p3", "Hillside Terraces"),
        ])
    }

    #[tokio::test]
    async fn exact_match_beats_substrings() {
        let found = directory().find_by_name("willow creek").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some("p1".to_string()));
    }

    #[tokio::test]
    async fn unique_substring_matches_and_ambiguity_does_not() {
        let dir = directory();
        let found = dir.find_by_name("HILLSIDE").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some("p3".to_string()));
        assert!(dir.find_by_name("willow").await.unwrap().is_none());
        assert!(dir.find_by_name("  ").await.unwrap().is_none());
    }

    #[test]
    fn loads_from_json_file() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("projects.json");
        std::fs::write(&path, r#"[{"id":"p9","title":"Prairie Strip"}]"#).unwrap();
        let dir = InMemoryProjectDirectory::from_json_file(&path).unwrap();
        assert_eq!(dir.len(), 1);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            InMemoryProjectDirectory::from_json_file(&path),
            Err(DirectoryError::Parse(_))
        ));
        assert!(matches!(
            InMemoryProjectDirectory::from_json_file(tmp.path().join("missing.json")),
            Err(DirectoryError::Io(_))
        ));
    }
}
