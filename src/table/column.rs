//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use super::value::Record;

/// Custom cell renderer: receives the original record, returns display text.
pub type Renderer<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Describes how to label, read, render and optionally sort one column.
///
/// `key` is both the default cell accessor and the sort field. A renderer,
/// when set, replaces the default stringification of the cell.
pub struct Column<T> {
    pub key: String,
    pub header: String,
    pub sortable: bool,
    renderer: Option<Renderer<T>>,
}

impl<T> Column<T> {
    /// Create a non-sortable column using default rendering.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            renderer: None,
        }
    }

    /// Mark the column as sortable (its header toggles sort state).
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Render cells of this column with a custom function.
    pub fn render_with<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }
}

impl<T: Record> Column<T> {
    /// Display text of this column's cell for `record`.
    pub fn cell(&self, record: &T) -> String {
        match &self.renderer {
            Some(render) => render(record),
            None => record.field(&self.key).to_string(),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            sortable: self.sortable,
            renderer: self.renderer.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("renderer", &self.renderer.is_some())
            .finish()
    }
}
