//! List editor with a trailing "add new" row

/// Label of the sentinel row in the arguments list
pub const ARGUMENTS_SENTINEL: &str = "Add new argument";
/// Label of the sentinel row in the stdin lines list
pub const INPUTS_SENTINEL: &str = "Add new input";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRow {
    Real(String),
    /// Always the last row; editing it appends a value
    Sentinel,
}

/// What an [`EditableList::edit_row`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEdit {
    /// The sentinel was edited; a real row now sits at `index`
    Inserted { index: usize },
    Updated { index: usize },
    /// Another edit was in progress
    Suppressed,
    OutOfRange,
}

#[derive(Debug, Clone)]
pub struct EditableList {
    rows: Vec<ListRow>,
    sentinel_label: &'static str,
    suppress: bool,
}

impl EditableList {
    pub fn new(sentinel_label: &'static str) -> Self {
        Self {
            rows: vec![ListRow::Sentinel],
            sentinel_label,
            suppress: false,
        }
    }

    pub fn arguments() -> Self {
        Self::new(ARGUMENTS_SENTINEL)
    }

    pub fn inputs() -> Self {
        Self::new(INPUTS_SENTINEL)
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of real rows (sentinel excluded)
    pub fn value_count(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn sentinel_label(&self) -> &'static str {
        self.sentinel_label
    }

    pub fn sentinel_index(&self) -> usize {
        self.rows.len() - 1
    }

    /// Text shown for the row at `index`
    pub fn row_text(&self, index: usize) -> Option<&str> {
        match self.rows.get(index)? {
            ListRow::Real(text) => Some(text),
            ListRow::Sentinel => Some(self.sentinel_label),
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppress
    }

    /// Run `f` with edits suppressed. Edits made inside report
    /// [`RowEdit::Suppressed`] and change nothing.
    pub fn suppressed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.suppress, true);
        let result = f(self);
        self.suppress = previous;
        result
    }

    /// Replace all real rows with `values`.
    pub fn load(&mut self, values: &[String]) {
        self.suppressed(|list| {
            list.rows = values
                .iter()
                .cloned()
                .map(ListRow::Real)
                .chain(std::iter::once(ListRow::Sentinel))
                .collect();
        });
    }

    /// Real row values in display order
    pub fn values(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| match row {
                ListRow::Real(text) => Some(text.clone()),
                ListRow::Sentinel => None,
            })
            .collect()
    }

    /// Apply a user edit to the row at `index`.
    pub fn edit_row(&mut self, index: usize, text: impl Into<String>) -> RowEdit {
        if self.suppress {
            return RowEdit::Suppressed;
        }
        if index >= self.rows.len() {
            return RowEdit::OutOfRange;
        }

        let text = text.into();
        self.suppressed(|list| match &mut list.rows[index] {
            ListRow::Real(value) => {
                *value = text;
                RowEdit::Updated { index }
            }
            ListRow::Sentinel => {
                list.rows.insert(index, ListRow::Real(text));
                RowEdit::Inserted { index }
            }
        })
    }

    /// Remove the real row at `index`. The sentinel stays.
    pub fn remove_row(&mut self, index: usize) -> Option<String> {
        match self.rows.get(index)? {
            ListRow::Real(_) => match self.rows.remove(index) {
                ListRow::Real(text) => Some(text),
                ListRow::Sentinel => None,
            },
            ListRow::Sentinel => None,
        }
    }

    pub fn clear(&mut self) {
        self.rows = vec![ListRow::Sentinel];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_list_has_only_sentinel() {
        let list = EditableList::arguments();
        assert_eq!(list.rows(), &[ListRow::Sentinel]);
        assert_eq!(list.row_text(0), Some("Add new argument"));
        assert!(list.values().is_empty());
    }

    #[test]
    fn test_edit_real_row_replaces_text() {
        let mut list = EditableList::inputs();
        list.load(&["a".to_string(), "b".to_string()]);
        assert_eq!(list.edit_row(1, "c"), RowEdit::Updated { index: 1 });
        assert_eq!(list.values(), vec!["a", "c"]);
        assert_eq!(list.edit_row(7, "x"), RowEdit::OutOfRange);
    }

    #[test]
    fn test_edits_inside_suppressed_block_are_ignored() {
        let mut list = EditableList::arguments();
        let edit = list.suppressed(|list| list.edit_row(0, "nope"));
        assert_eq!(edit, RowEdit::Suppressed);
        assert!(list.values().is_empty());
        assert!(!list.is_suppressed());
    }

    #[test]
    fn test_sentinel_cannot_be_removed() {
        let mut list = EditableList::arguments();
        list.load(&["-v".to_string()]);
        assert_eq!(list.remove_row(1), None);
        assert_eq!(list.remove_row(0), Some("-v".to_string()));
        assert_eq!(list.rows(), &[ListRow::Sentinel]);
    }
}
