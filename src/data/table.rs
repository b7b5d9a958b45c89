// src/data/table.rs

/// Column names used by the dashboard. Every other column is carried along
/// untouched.
pub mod columns {
    pub const TITLE: &str = "Title";
    pub const CATEGORIES: &str = "Categories";
    pub const CITY: &str = "geolocation_city";
    pub const STATE: &str = "geolocation_state_long";

    pub const REQUIRED: [&str; 4] = [TITLE, CATEGORIES, CITY, STATE];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KnownColumns {
    title: Option<usize>,
    categories: Option<usize>,
    city: Option<usize>,
    state: Option<usize>,
}

/// The parsed export: every cell is text, no cell is ever missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingsTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    known: KnownColumns,
}

impl ListingsTable {
    /// Rows shorter than the header are padded with empty cells, longer ones cut.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        let find = |name: &str| headers.iter().position(|h| h == name);
        let known = KnownColumns {
            title: find(columns::TITLE),
            categories: find(columns::CATEGORIES),
            city: find(columns::CITY),
            state: find(columns::STATE),
        };

        Self {
            headers,
            rows,
            known,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Dashboard columns absent from this export; they read as empty strings.
    pub fn missing_columns(&self) -> Vec<&'static str> {
        columns::REQUIRED
            .into_iter()
            .filter(|c| self.column_index(c).is_none())
            .collect()
    }

    /// Rows in file order.
    pub fn listings(&self) -> impl Iterator<Item = Listing<'_>> + '_ {
        self.rows.iter().map(move |row| Listing {
            row,
            known: &self.known,
        })
    }

    pub fn listing(&self, index: usize) -> Option<Listing<'_>> {
        self.rows.get(index).map(|row| Listing {
            row,
            known: &self.known,
        })
    }
}

/// Borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    row: &'a [String],
    known: &'a KnownColumns,
}

impl<'a> Listing<'a> {
    fn cell(&self, index: Option<usize>) -> &'a str {
        index
            .and_then(|i| self.row.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn title(&self) -> &'a str {
        self.cell(self.known.title)
    }

    /// The raw comma joined category list.
    pub fn categories(&self) -> &'a str {
        self.cell(self.known.categories)
    }

    pub fn city(&self) -> &'a str {
        self.cell(self.known.city)
    }

    pub fn state(&self) -> &'a str {
        self.cell(self.known.state)
    }

    /// Trimmed, non-empty entries of the category list.
    pub fn category_tokens(&self) -> impl Iterator<Item = &'a str> {
        self.categories()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn cells(&self) -> &'a [String] {
        self.row
    }
}
