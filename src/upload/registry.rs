use super::types::{FileEntry, FileHandle, ProcessingStatus};
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

/// Owns the selected files and their per-file processing status.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
}

/// Per-state counts over the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistrySummary {
    pub total: usize,
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `pending` entry per handle. Duplicate names are kept.
    pub fn add<I>(&mut self, files: I) -> Vec<FileEntry>
    where
        I: IntoIterator<Item = FileHandle>,
    {
        let added: Vec<FileEntry> = files
            .into_iter()
            .map(|file| FileEntry {
                id: Uuid::new_v4().to_string(),
                file,
                status: ProcessingStatus::Pending,
            })
            .collect();

        for entry in &added {
            debug!(id = %entry.id, name = %entry.file.name, "File registered");
        }
        self.entries.extend(added.iter().cloned());
        added
    }

    /// Ids that are not registered are ignored. Returns how many entries changed.
    pub(crate) fn set_status<'a, I>(&mut self, ids: I, status: ProcessingStatus) -> usize
    where
        I: IntoIterator<Item = &'a String>,
    {
        let ids: HashSet<&String> = ids.into_iter().collect();
        let mut updated = 0;
        for entry in self.entries.iter_mut().filter(|e| ids.contains(&e.id)) {
            entry.status = status;
            updated += 1;
        }
        updated
    }

    pub fn get(&self, id: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: &str) -> Option<FileEntry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(index))
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self) -> RegistrySummary {
        let mut summary = RegistrySummary {
            total: self.entries.len(),
            ..RegistrySummary::default()
        };
        for entry in &self.entries {
            match entry.status {
                ProcessingStatus::Pending => summary.pending += 1,
                ProcessingStatus::Completed => summary.completed += 1,
                ProcessingStatus::Error => summary.failed += 1,
                ProcessingStatus::Cancelled => summary.cancelled += 1,
                _ => summary.processing += 1,
            }
        }
        summary
    }
}

impl RegistrySummary {
    pub fn finished(&self) -> usize {
        self.completed + self.failed + self.cancelled
    }

    pub fn progress_fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.finished() as f32 / self.total as f32
        }
    }

    pub fn status_text(&self) -> String {
        if self.total == 0 {
            return String::new();
        }
        format!(
            "Progress: {}/{} files | ⏳ Processing: {} | ✅ Completed: {} | ❌ Failed: {} | ⏹ Cancelled: {}",
            self.finished(),
            self.total,
            self.processing,
            self.completed,
            self.failed,
            self.cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(name: &str) -> FileHandle {
        FileHandle::new(name, format!("/tmp/{}", name), "application/pdf", b"%PDF".to_vec())
    }

    #[test]
    fn test_add_assigns_distinct_pending_ids() {
        let mut registry = FileRegistry::new();
        let added = registry.add(vec![handle("claim.pdf"), handle("claim.pdf"), handle("id.png")]);

        assert_eq!(added.len(), 3);
        let ids: HashSet<&String> = added.iter().map(|e| &e.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(added.iter().all(|e| e.status == ProcessingStatus::Pending));

        let names: Vec<&str> = registry.entries().iter().map(|e| e.file.name.as_str()).collect();
        assert_eq!(names, vec!["claim.pdf", "claim.pdf", "id.png"]);
    }

    #[test]
    fn test_ids_never_reused_after_removal() {
        let mut registry = FileRegistry::new();
        let first = registry.add(vec![handle("a.pdf")]).remove(0);
        registry.remove(&first.id).unwrap();
        let second = registry.add(vec![handle("a.pdf")]).remove(0);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_set_status_ignores_unknown_ids() {
        let mut registry = FileRegistry::new();
        let added = registry.add(vec![handle("a.pdf"), handle("b.pdf")]);
        let targets = vec![added[0].id.clone(), "missing".to_string()];

        let updated = registry.set_status(&targets, ProcessingStatus::Processing);

        assert_eq!(updated, 1);
        assert_eq!(registry.get(&added[0].id).unwrap().status, ProcessingStatus::Processing);
        assert_eq!(registry.get(&added[1].id).unwrap().status, ProcessingStatus::Pending);
    }

    #[test]
    fn test_summary_counts() {
        let mut registry = FileRegistry::new();
        let added = registry.add(vec![handle("a"), handle("b"), handle("c"), handle("d")]);
        registry.set_status([&added[0].id], ProcessingStatus::Completed);
        registry.set_status([&added[1].id], ProcessingStatus::Error);
        registry.set_status([&added[2].id], ProcessingStatus::Validating);

        let summary = registry.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.processing, 1);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.finished(), 2);
        assert!((summary.progress_fraction() - 0.5).abs() < f32::EPSILON);
        assert!(summary.status_text().starts_with("Progress: 2/4 files"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = FileRegistry::new().summary();
        assert_eq!(summary.progress_fraction(), 0.0);
        assert!(summary.status_text().is_empty());
    }
}
