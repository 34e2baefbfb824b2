//! TaskTable - the in-memory collection a session accumulates

use crate::task::TaskRecord;

/// Ordered, growable sequence of task records
///
/// The table only grows by [`TaskTable::append`] and only shrinks by
/// [`TaskTable::clear`]. It has no durability; dropping it loses the rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTable {
    records: Vec<TaskRecord>,
}

impl TaskTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append records in the given order, returning how many were added
    ///
    /// # Examples
    ///
    /// ```
    /// use taskdb_domain::{Category, TaskRecord, TaskTable};
    ///
    /// let mut table = TaskTable::new();
    /// let added = table.append(vec![
    ///     TaskRecord::new("Buy milk", Category::Personal),
    ///     TaskRecord::new("Buy milk", Category::Personal),
    /// ]);
    /// assert_eq!(added, 2);
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn append(&mut self, records: impl IntoIterator<Item = TaskRecord>) -> usize {
        let before = self.records.len();
        self.records.extend(records);
        self.records.len() - before
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, TaskRecord> {
        self.records.iter()
    }

    /// Borrow all records
    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a TaskTable {
    type Item = &'a TaskRecord;
    type IntoIter = std::slice::Iter<'a, TaskRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<TaskRecord> for TaskTable {
    fn from_iter<I: IntoIterator<Item = TaskRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
