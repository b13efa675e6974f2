use crate::scan::{CollisionEntry, EmptyReason, ScanReport};

/// Holds the result of the most recent scan. Each write replaces the whole
/// previous result.
#[derive(Clone, Debug, Default)]
pub struct CollisionResultStore {
    current: Option<ScanReport>,
}

impl CollisionResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, report: ScanReport) -> &ScanReport {
        self.current.insert(report)
    }

    pub fn report(&self) -> Option<&ScanReport> {
        self.current.as_ref()
    }

    pub fn entries(&self) -> &[CollisionEntry] {
        self.current
            .as_ref()
            .map(|report| report.entries.as_slice())
            .unwrap_or_default()
    }

    pub fn entry(&self, index: usize) -> Option<&CollisionEntry> {
        self.entries().get(index)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// `None` both before the first scan and when the last scan found collisions.
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        self.current.as_ref().and_then(ScanReport::empty_reason)
    }

    pub fn summary(&self) -> String {
        match &self.current {
            Some(report) => report.summary(),
            None => "No collision check has been run yet.".to_string(),
        }
    }

    /// One line per entry for the result list, or the empty-state message.
    pub fn lines(&self) -> Vec<String> {
        if self.is_empty() {
            return self
                .empty_reason()
                .map(|reason| vec![reason.to_string()])
                .unwrap_or_default();
        }
        self.entries()
            .iter()
            .enumerate()
            .map(|(idx, entry)| entry_label(idx, entry))
            .collect()
    }
}

pub fn entry_label(index: usize, entry: &CollisionEntry) -> String {
    let others = entry
        .colliding
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("#{}: object {} collides with {}", index + 1, entry.object, others)
}
