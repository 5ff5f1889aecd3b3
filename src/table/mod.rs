//! Generic tabular view engine: search, sort and paginate an in-memory list.
//!
//! A [`TableView`] owns only transient view state (search text, sort key and
//! direction, current page). The records are owned by the caller and handed
//! in fresh on every call to [`TableView::compute_view`], which rebuilds the
//! visible page from scratch:
//!
//! ```text
//! records ──▶ filter (search keys) ──▶ stable sort (sort key) ──▶ page slice
//! ```
//!
//! Recomputation is O(n log n) per call. That is fine for the tens to
//! hundreds of records a sports center holds; nothing is memoized.
//!
//! # Example
//!
//! ```
//! use centre_admin::table::{Column, TableView};
//! use serde_json::json;
//!
//! let records = vec![json!({ "id": 1, "name": "Zoe" }), json!({ "id": 2, "name": "Amy" })];
//! let columns = vec![Column::new("name", "Nom").sortable()];
//!
//! let mut view = TableView::new().with_search_keys(["name"]);
//! view.set_sort("name");
//! let page = view.compute_view(&records, &columns, 10);
//! assert_eq!(page.cells[0][0], "Amy");
//! ```

mod column;
mod value;

pub use column::{Column, Renderer};
pub use value::{CellValue, Record, RecordId};

/// Page size used when the caller does not configure one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Arrow shown next to the sorted column header.
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Transient view state of one table, plus its search configuration.
#[derive(Debug, Clone)]
pub struct TableView {
    search_keys: Vec<String>,
    search_text: String,
    current_page: usize,
    sort_key: Option<String>,
    sort_direction: SortDirection,
}

impl Default for TableView {
    fn default() -> Self {
        Self::new()
    }
}

impl TableView {
    /// Fresh state: no search, page 1, unsorted, ascending.
    pub fn new() -> Self {
        Self {
            search_keys: Vec::new(),
            search_text: String::new(),
            current_page: 1,
            sort_key: None,
            sort_direction: SortDirection::Ascending,
        }
    }

    /// Configure the field keys that search text is matched against.
    ///
    /// With no search keys, search text never filters anything.
    pub fn with_search_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn search_keys(&self) -> &[String] {
        &self.search_keys
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn sort_key(&self) -> Option<&str> {
        self.sort_key.as_deref()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Replace the search text. Always returns to page 1.
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.current_page = 1;
    }

    /// Toggle sorting on `key`.
    ///
    /// The same key flips the direction; a new key becomes the sort key in
    /// ascending order. Whether the column is sortable is checked by the
    /// caller, not here.
    pub fn set_sort(&mut self, key: &str) {
        if self.sort_key.as_deref() == Some(key) {
            self.sort_direction = self.sort_direction.flip();
        } else {
            self.sort_key = Some(key.to_string());
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Jump to page `n`.
    ///
    /// Not clamped: callers only offer pages in `1..=total_pages`. A page
    /// past the end yields an empty view rather than an error.
    pub fn set_page(&mut self, n: usize) {
        self.current_page = n;
    }

    /// Compute the visible page and its pagination metadata.
    ///
    /// Pure with respect to `self` and `records`; calling it twice with the
    /// same inputs yields the same output. A `page_size` of zero is treated
    /// as one.
    pub fn compute_view<'a, T: Record>(
        &self,
        records: &'a [T],
        columns: &[Column<T>],
        page_size: usize,
    ) -> PageView<'a, T> {
        let page_size = page_size.max(1);

        let mut rows = self.filter(records);

        if let Some(ref key) = self.sort_key {
            let direction = self.sort_direction;
            let mut keyed: Vec<(CellValue, &'a T)> =
                rows.into_iter().map(|r| (r.field(key), r)).collect();
            // slice::sort_by is stable, and reversing Equal keeps it Equal
            keyed.sort_by(|a, b| {
                let ord = a.0.compare(&b.0);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
            rows = keyed.into_iter().map(|(_, r)| r).collect();
        }

        let total_count = rows.len();
        let total_pages = total_count.div_ceil(page_size).max(1);
        let offset = self.current_page.saturating_sub(1).saturating_mul(page_size);

        let page_records: Vec<&'a T> = rows.into_iter().skip(offset).take(page_size).collect();

        let (range_start, range_end) = if page_records.is_empty() {
            (0, 0)
        } else {
            (offset + 1, offset + page_records.len())
        };

        let cells = page_records
            .iter()
            .map(|record| columns.iter().map(|c| c.cell(record)).collect())
            .collect();

        PageView {
            page_records,
            cells,
            current_page: self.current_page,
            total_pages,
            total_count,
            range_start,
            range_end,
        }
    }

    fn filter<'a, T: Record>(&self, records: &'a [T]) -> Vec<&'a T> {
        if self.search_text.is_empty() || self.search_keys.is_empty() {
            return records.iter().collect();
        }
        let needle = self.search_text.to_lowercase();
        records.iter().filter(|r| self.matches(*r, &needle)).collect()
    }

    fn matches<T: Record>(&self, record: &T, needle: &str) -> bool {
        self.search_keys.iter().any(|key| match record.field(key) {
            CellValue::Null => false,
            value => value.to_string().to_lowercase().contains(needle),
        })
    }
}

/// One computed page of a [`TableView`].
#[derive(Debug, PartialEq)]
pub struct PageView<'a, T> {
    /// Records on the current page, in display order.
    pub page_records: Vec<&'a T>,
    /// Rendered text per visible record and column.
    pub cells: Vec<Vec<String>>,
    pub current_page: usize,
    /// At least 1, even for an empty collection.
    pub total_pages: usize,
    /// Number of records left after filtering.
    pub total_count: usize,
    /// 1-based inclusive index of the first visible record, 0 when empty.
    pub range_start: usize,
    /// 1-based inclusive index of the last visible record, 0 when empty.
    pub range_end: usize,
}

impl<T> PageView<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.page_records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.page_records.len()
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Pagination summary, e.g. "Affichage de 11 à 20 sur 25 résultats".
    pub fn summary(&self) -> String {
        format!(
            "Affichage de {} à {} sur {} résultats",
            self.range_start, self.range_end, self.total_count
        )
    }
}

/// What the body of a table should show.
///
/// Loading and error come from the caller; empty is derived from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyState<'e> {
    Loading,
    Error(&'e str),
    Empty,
    Rows,
}

impl<'e> BodyState<'e> {
    pub fn resolve<T>(loading: bool, error: Option<&'e str>, page: &PageView<'_, T>) -> Self {
        if loading {
            BodyState::Loading
        } else if let Some(err) = error {
            BodyState::Error(err)
        } else if page.is_empty() {
            BodyState::Empty
        } else {
            BodyState::Rows
        }
    }

    /// Placeholder text for non-row states.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            BodyState::Loading => Some("Chargement...".to_string()),
            BodyState::Error(err) => Some(format!("Erreur : {}", err)),
            BodyState::Empty => Some("Aucune donnée trouvée".to_string()),
            BodyState::Rows => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: i64,
        name: Option<String>,
        age: i64,
    }

    impl Record for Person {
        fn id(&self) -> RecordId {
            RecordId::Num(self.id)
        }

        fn field(&self, key: &str) -> CellValue {
            match key {
                "id" => self.id.into(),
                "name" => self.name.clone().into(),
                "age" => self.age.into(),
                _ => CellValue::Null,
            }
        }
    }

    fn person(id: i64, name: &str, age: i64) -> Person {
        Person {
            id,
            name: Some(name.to_string()),
            age,
        }
    }

    fn numbered(n: i64) -> Vec<Person> {
        (1..=n).map(|i| person(i, &format!("Membre {}", i), 20 + i % 3)).collect()
    }

    fn columns() -> Vec<Column<Person>> {
        vec![
            Column::new("id", "ID").sortable(),
            Column::new("name", "Nom").sortable(),
            Column::new("age", "Âge").render_with(|p: &Person| format!("{} ans", p.age)),
        ]
    }

    fn ids(page: &PageView<'_, Person>) -> Vec<i64> {
        page.page_records.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_defaults() {
        let view = TableView::new();
        assert_eq!(view.search_text(), "");
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.sort_key(), None);
        assert_eq!(view.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_twenty_five_records_paged_by_ten() {
        let records = numbered(25);
        let mut view = TableView::new();

        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(ids(&page), (1..=10).collect::<Vec<_>>());
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 25);
        assert_eq!((page.range_start, page.range_end), (1, 10));

        view.set_page(2);
        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!((page.range_start, page.range_end), (11, 20));

        view.set_page(3);
        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(ids(&page), (21..=25).collect::<Vec<_>>());
        assert_eq!(page.range_end, 25);
        assert_eq!(page.len(), 5);
        assert!(!page.has_next());
        assert!(page.has_prev());
    }

    #[test]
    fn test_empty_collection() {
        let records: Vec<Person> = Vec::new();
        let view = TableView::new();
        let page = view.compute_view(&records, &columns(), 10);

        assert_eq!(page.total_count, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.is_empty());
        assert_eq!(BodyState::resolve(false, None, &page), BodyState::Empty);
    }

    #[test]
    fn test_pages_partition_the_collection() {
        for total in [0_i64, 1, 9, 10, 11, 37] {
            for page_size in [1_usize, 3, 10, 50] {
                let records = numbered(total);
                let mut view = TableView::new();
                let total_pages = view.compute_view(&records, &columns(), page_size).total_pages;
                assert!(total_pages >= 1);

                let mut seen = 0;
                for n in 1..=total_pages {
                    view.set_page(n);
                    let page = view.compute_view(&records, &columns(), page_size);
                    if n < total_pages {
                        assert_eq!(page.len(), page_size);
                    } else {
                        assert!(page.len() <= page_size);
                    }
                    seen += page.len();
                }
                assert_eq!(seen, total as usize);
            }
        }
    }

    #[test]
    fn test_compute_view_is_idempotent() {
        let records = numbered(17);
        let mut view = TableView::new().with_search_keys(["name"]);
        view.set_search_text("membre 1");
        view.set_sort("age");

        let first = view.compute_view(&records, &columns(), 5);
        let second = view.compute_view(&records, &columns(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let records = vec![person(1, "Jean Dupont", 30), person(2, "Marie Curie", 40)];
        let mut view = TableView::new().with_search_keys(["name"]);
        view.set_search_text("dup");

        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(ids(&page), vec![1]);
        assert_eq!(page.total_count, 1);

        view.set_search_text("DUP");
        assert_eq!(ids(&view.compute_view(&records, &columns(), 10)), vec![1]);
    }

    #[test]
    fn test_search_matches_any_key() {
        let records = vec![person(1, "Amy", 31), person(2, "Zoe", 42)];
        let mut view = TableView::new().with_search_keys(["name", "age"]);
        view.set_search_text("42");
        assert_eq!(ids(&view.compute_view(&records, &columns(), 10)), vec![2]);
    }

    #[test]
    fn test_search_without_keys_does_not_filter() {
        let records = numbered(3);
        let mut view = TableView::new();
        view.set_search_text("nothing matches this");
        assert_eq!(view.compute_view(&records, &columns(), 10).total_count, 3);
    }

    #[test]
    fn test_search_skips_missing_fields() {
        let records = vec![
            Person {
                id: 1,
                name: None,
                age: 20,
            },
            person(2, "Bob", 20),
        ];
        let mut view = TableView::new().with_search_keys(["name", "unknown"]);
        view.set_search_text("b");
        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(ids(&page), vec![2]);
    }

    #[test]
    fn test_empty_search_clears_filter() {
        let records = numbered(12);
        let mut view = TableView::new().with_search_keys(["name"]);
        view.set_search_text("Membre 12");
        assert_eq!(view.compute_view(&records, &columns(), 10).total_count, 1);
        view.set_search_text("");
        assert_eq!(view.compute_view(&records, &columns(), 10).total_count, 12);
    }

    #[test]
    fn test_search_resets_page() {
        let records = numbered(30);
        let mut view = TableView::new().with_search_keys(["name"]);
        view.set_page(2);
        // Page 2 would still exist for this filter, but we go back to 1 anyway
        view.set_search_text("membre");
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn test_sort_toggle_scenario() {
        let records = vec![person(1, "Zoe", 30), person(2, "Amy", 25)];
        let mut view = TableView::new();

        view.set_sort("name");
        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(page.cells[0][1], "Amy");
        assert_eq!(page.cells[1][1], "Zoe");

        view.set_sort("name");
        assert_eq!(view.sort_direction(), SortDirection::Descending);
        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(ids(&page), vec![1, 2]);
    }

    #[test]
    fn test_new_sort_key_resets_direction() {
        let mut view = TableView::new();
        view.set_sort("name");
        view.set_sort("name");
        view.set_sort("age");
        assert_eq!(view.sort_key(), Some("age"));
        assert_eq!(view.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let records = vec![
            person(1, "a", 30),
            person(2, "b", 20),
            person(3, "c", 30),
            person(4, "d", 20),
            person(5, "e", 30),
        ];
        let mut view = TableView::new();

        view.set_sort("age");
        assert_eq!(ids(&view.compute_view(&records, &columns(), 10)), vec![2, 4, 1, 3, 5]);

        view.set_sort("age");
        assert_eq!(ids(&view.compute_view(&records, &columns(), 10)), vec![1, 3, 5, 2, 4]);
    }

    #[test]
    fn test_sort_numeric_not_lexicographic() {
        let records = vec![person(10, "x", 1), person(9, "y", 1), person(100, "z", 1)];
        let mut view = TableView::new();
        view.set_sort("id");
        assert_eq!(ids(&view.compute_view(&records, &columns(), 10)), vec![9, 10, 100]);
    }

    #[test]
    fn test_missing_values_sort_last_ascending() {
        let mut records = vec![person(1, "Zoe", 30), person(2, "Amy", 25), person(3, "Luc", 40)];
        records[1].name = None;
        let mut view = TableView::new();

        view.set_sort("name");
        assert_eq!(ids(&view.compute_view(&records, &columns(), 10)), vec![3, 1, 2]);

        view.set_sort("name");
        assert_eq!(ids(&view.compute_view(&records, &columns(), 10)), vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_json_numbers_mixed_with_numeric_text() {
        use serde_json::{json, Value};
        use std::cmp::Ordering;

        let columns: Vec<Column<Value>> = vec![Column::new("v", "V").sortable()];
        // Small LCG so every run sees the same shuffles
        let mut seed: u64 = 42;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as i64
        };

        for _ in 0..50 {
            let records: Vec<Value> = (0..64)
                .map(|i| {
                    let n = next() % 100;
                    match next() % 3 {
                        0 => json!({ "id": i, "v": n }),
                        1 => json!({ "id": i, "v": n.to_string() }),
                        _ => json!({ "id": i, "v": n as f64 + 0.5 }),
                    }
                })
                .collect();

            let mut view = TableView::new();
            view.set_sort("v");
            let asc = view.compute_view(&records, &columns, 100);
            assert_eq!(asc.total_count, 64);
            let values: Vec<CellValue> = asc.page_records.iter().map(|r| r.field("v")).collect();
            assert!(values.windows(2).all(|w| w[0].compare(&w[1]) != Ordering::Greater));

            view.set_sort("v");
            let desc = view.compute_view(&records, &columns, 100);
            let values: Vec<CellValue> = desc.page_records.iter().map(|r| r.field("v")).collect();
            assert!(values.windows(2).all(|w| w[0].compare(&w[1]) != Ordering::Less));
        }
    }

    #[test]
    fn test_source_collection_untouched() {
        let records = vec![person(1, "Zoe", 30), person(2, "Amy", 25)];
        let before = records.clone();
        let mut view = TableView::new();
        view.set_sort("name");
        let _ = view.compute_view(&records, &columns(), 10);
        assert_eq!(records, before);
    }

    #[test]
    fn test_renderer_and_default_cells() {
        let records = vec![person(1, "Zoe", 30)];
        let view = TableView::new();
        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(page.cells, vec![vec!["1".to_string(), "Zoe".to_string(), "30 ans".to_string()]]);
    }

    #[test]
    fn test_out_of_range_page_is_empty_not_panic() {
        let records = numbered(5);
        let mut view = TableView::new();
        view.set_page(9);
        let page = view.compute_view(&records, &columns(), 10);
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!((page.range_start, page.range_end), (0, 0));
    }

    #[test]
    fn test_zero_page_size_treated_as_one() {
        let records = numbered(3);
        let view = TableView::new();
        let page = view.compute_view(&records, &columns(), 0);
        assert_eq!(page.len(), 1);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn test_body_state_precedence() {
        let records = numbered(2);
        let view = TableView::new();
        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(BodyState::resolve(true, Some("boom"), &page), BodyState::Loading);
        assert_eq!(BodyState::resolve(false, Some("boom"), &page), BodyState::Error("boom"));
        assert_eq!(BodyState::resolve(false, None, &page), BodyState::Rows);
        assert_eq!(BodyState::Rows.placeholder(), None);
        assert_eq!(
            BodyState::Empty.placeholder().as_deref(),
            Some("Aucune donnée trouvée")
        );
    }

    #[test]
    fn test_summary_text() {
        let records = numbered(25);
        let mut view = TableView::new();
        view.set_page(2);
        let page = view.compute_view(&records, &columns(), 10);
        assert_eq!(page.summary(), "Affichage de 11 à 20 sur 25 résultats");
    }
}
