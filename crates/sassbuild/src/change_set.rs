//! The change set handed to a build by the host.
//!
//! Records are split into an out-of-date sequence (added + modified) and a
//! removed sequence at insertion time. The controller always drains the
//! out-of-date sequence before touching the removed one.

use camino::{Utf8Path, Utf8PathBuf};

use crate::source::SourceUnit;

/// What happened to a source since the last build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// One entry in a change set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub path: Utf8PathBuf,
    pub kind: ChangeKind,
}

impl ChangeRecord {
    pub fn added(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Added,
        }
    }

    pub fn modified(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Modified,
        }
    }

    pub fn removed(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            kind: ChangeKind::Removed,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn is_out_of_date(&self) -> bool {
        matches!(self.kind, ChangeKind::Added | ChangeKind::Modified)
    }
}

/// All changes for a single build invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    incremental: bool,
    out_of_date: Vec<ChangeRecord>,
    removed: Vec<ChangeRecord>,
}

impl ChangeSet {
    /// An empty incremental change set.
    pub fn incremental() -> Self {
        Self {
            incremental: true,
            ..Default::default()
        }
    }

    /// An empty non-incremental change set: the build purges every existing
    /// artifact before processing records.
    pub fn rebuild() -> Self {
        Self::default()
    }

    /// A non-incremental change set with every given source marked as added.
    pub fn full_rebuild(sources: impl IntoIterator<Item = SourceUnit>) -> Self {
        let mut changes = Self::rebuild();
        for unit in sources {
            changes.push(ChangeRecord::added(unit.path()));
        }
        changes
    }

    /// Append a record to the sequence matching its kind.
    pub fn push(&mut self, record: ChangeRecord) {
        if record.is_out_of_date() {
            self.out_of_date.push(record);
        } else {
            self.removed.push(record);
        }
    }

    /// Builder-style [`ChangeSet::push`].
    pub fn with(mut self, record: ChangeRecord) -> Self {
        self.push(record);
        self
    }

    pub fn is_incremental(&self) -> bool {
        self.incremental
    }

    /// Added and modified records, in insertion order.
    pub fn out_of_date(&self) -> &[ChangeRecord] {
        &self.out_of_date
    }

    /// Removed records, in insertion order.
    pub fn removed(&self) -> &[ChangeRecord] {
        &self.removed
    }

    pub fn len(&self) -> usize {
        self.out_of_date.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Split into the two ordered sequences.
    pub(crate) fn into_parts(self) -> (Vec<ChangeRecord>, Vec<ChangeRecord>) {
        (self.out_of_date, self.removed)
    }
}

impl Extend<ChangeRecord> for ChangeSet {
    fn extend<T: IntoIterator<Item = ChangeRecord>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}
