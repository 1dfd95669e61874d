//! Table query builder for the REST dialect the backend speaks
//!
//! Filters are rendered as `column=op.value` query parameters. Columns of an
//! embedded resource are addressed with a dot (`event.category`); the
//! select list must embed that resource with `!inner` for the filter to
//! narrow the parent rows.

/// Characters that must be quoted inside a logical (`or=`) filter value
const RESERVED: &[char] = &[',', '.', ':', '(', ')', '"', '\\'];

/// Sort direction for an `order` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl Direction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A select request against one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    table: String,
    select: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    offset: Option<usize>,
    limit: Option<usize>,
    count_exact: bool,
}

impl TableQuery {
    /// Select every column of `table`
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            offset: None,
            limit: None,
            count_exact: false,
        }
    }

    /// Table name
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Replace the select list (whitespace is stripped)
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.split_whitespace().collect();
        self
    }

    /// `column = value`
    #[must_use]
    pub fn eq(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "eq", &value.to_string())
    }

    /// `column > value`
    #[must_use]
    pub fn gt(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "gt", &value.to_string())
    }

    /// `column >= value`
    #[must_use]
    pub fn gte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "gte", &value.to_string())
    }

    /// `column <= value`
    #[must_use]
    pub fn lte(self, column: &str, value: impl ToString) -> Self {
        self.filter(column, "lte", &value.to_string())
    }

    /// Case-insensitive substring match of `term` against any of `columns`
    ///
    /// When every column belongs to the same embedded resource
    /// (`event.title`, `event.location`) the disjunction is scoped to that
    /// resource, which is the only form the backend accepts for embedded
    /// columns.
    #[must_use]
    pub fn any_ilike(mut self, columns: &[&str], term: &str) -> Self {
        let prefix = shared_prefix(columns);
        let pattern = quote_value(&format!("*{term}*"));

        let clauses: Vec<String> = columns
            .iter()
            .map(|column| {
                let local = prefix.map_or(*column, |p| &column[p.len() + 1..]);
                format!("{local}.ilike.{pattern}")
            })
            .collect();

        let key = prefix.map_or_else(|| "or".to_string(), |p| format!("{p}.or"));
        self.filters.push((key, format!("({})", clauses.join(","))));
        self
    }

    /// Append an order clause; dotted columns order by an embedded column
    #[must_use]
    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        let target = match column.split_once('.') {
            Some((resource, field)) => format!("{resource}({field})"),
            None => column.to_string(),
        };
        self.order.push(format!("{target}.{}", direction.as_str()));
        self
    }

    /// Request rows `[offset, offset + limit)`
    #[must_use]
    pub const fn range(mut self, offset: usize, limit: usize) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    /// Cap the number of rows without an offset
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Ask the backend for the exact number of matching rows
    #[must_use]
    pub const fn count_exact(mut self) -> Self {
        self.count_exact = true;
        self
    }

    /// Whether an exact count was requested
    #[must_use]
    pub const fn wants_count(&self) -> bool {
        self.count_exact
    }

    /// Render as URL query parameters
    #[must_use]
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::with_capacity(self.filters.len() + 4);
        params.push(("select".to_string(), self.select.clone()));
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }

    fn filter(mut self, column: &str, op: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("{op}.{value}")));
        self
    }
}

/// Rows of one page plus the exact total when it was requested
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult<T> {
    /// Returned rows
    pub rows: Vec<T>,
    /// Exact match count (from `Content-Range`)
    pub total: Option<usize>,
}

/// Parse the total out of a `Content-Range` header (`0-9/42`, `*/0`)
#[must_use]
pub fn parse_content_range(header: &str) -> Option<usize> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

fn shared_prefix<'a>(columns: &[&'a str]) -> Option<&'a str> {
    let first = columns.first()?.split_once('.')?.0;
    columns
        .iter()
        .all(|c| c.split_once('.').is_some_and(|(p, _)| p == first))
        .then_some(first)
}

fn quote_value(value: &str) -> String {
    if !value.contains(RESERVED) {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
