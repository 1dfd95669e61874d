//! Listing queries, independent of any backend.
//!
//! The search controller describes what it wants as a [`ListingQuery`];
//! the backend adapter renders it as REST parameters and the in-memory
//! gateway evaluates it directly with [`Predicate::matches`].

use crate::types::{ListingStatus, ListingWithEvent, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Sortable field of a search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Asking price
    Price,
    /// Event date
    Date,
    /// Listing creation time
    #[default]
    CreatedAt,
}

impl SortKey {
    /// Column this key sorts by
    #[must_use]
    pub const fn column(self) -> Column {
        match self {
            Self::Price => Column::Price,
            Self::Date => Column::EventDate,
            Self::CreatedAt => Column::CreatedAt,
        }
    }
}

/// Sort direction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Smallest first
    Asc,
    /// Largest first
    #[default]
    Desc,
}

/// Filter, sort and pagination state of a search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    /// Free text matched against event title and location
    pub search_query: Option<String>,
    /// Exact event category
    pub event_category: Option<String>,
    /// Lowest asking price (inclusive)
    pub min_price: Option<Money>,
    /// Highest asking price (inclusive)
    pub max_price: Option<Money>,
    /// Exact event city
    pub event_city: Option<String>,
    /// Exact event state / region
    pub event_state: Option<String>,
    /// Earliest event date (inclusive)
    pub start_date: Option<DateTime<Utc>>,
    /// Latest event date (inclusive)
    pub end_date: Option<DateTime<Utc>>,
    /// Sort key
    pub sort_by: SortKey,
    /// Sort direction
    pub sort_order: SortOrder,
    /// Page size
    pub limit: usize,
    /// Offset of the last requested page
    pub offset: usize,
}

/// Default page size
pub const DEFAULT_PAGE_SIZE: usize = 10;

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            search_query: None,
            event_category: None,
            min_price: None,
            max_price: None,
            event_city: None,
            event_state: None,
            start_date: None,
            end_date: None,
            sort_by: SortKey::CreatedAt,
            sort_order: SortOrder::Desc,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// A listing or event field a predicate can test
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// `tickets.status`
    Status,
    /// `tickets.available_quantity`
    AvailableQuantity,
    /// `tickets.price`
    Price,
    /// `tickets.created_at`
    CreatedAt,
    /// `tickets.seller_id`
    SellerId,
    /// `events.title`
    EventTitle,
    /// `events.location`
    EventLocation,
    /// `events.category`
    EventCategory,
    /// `events.city`
    EventCity,
    /// `events.state`
    EventState,
    /// `events.date`
    EventDate,
}

impl Column {
    /// Column name as the backend addresses it from the `tickets` table
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::AvailableQuantity => "available_quantity",
            Self::Price => "price",
            Self::CreatedAt => "created_at",
            Self::SellerId => "seller_id",
            Self::EventTitle => "event.title",
            Self::EventLocation => "event.location",
            Self::EventCategory => "event.category",
            Self::EventCity => "event.city",
            Self::EventState => "event.state",
            Self::EventDate => "event.date",
        }
    }

    /// Read this column from a result row
    #[must_use]
    pub fn value_of(self, row: &ListingWithEvent) -> Option<Value> {
        let listing = &row.listing;
        let event = &row.event;
        let text = |s: &str| Some(Value::Text(s.to_string()));
        match self {
            Self::Status => text(listing.status.as_str()),
            Self::AvailableQuantity => Some(Value::Int(i64::from(listing.available_quantity))),
            Self::Price => Some(Value::Money(listing.price)),
            Self::CreatedAt => Some(Value::Time(listing.created_at)),
            Self::SellerId => text(&listing.seller_id.to_string()),
            Self::EventTitle => text(&event.title),
            Self::EventLocation => text(&event.location),
            Self::EventCategory => text(&event.category),
            Self::EventCity => event.city.as_deref().and_then(text),
            Self::EventState => event.state.as_deref().and_then(text),
            Self::EventDate => Some(Value::Time(event.date)),
        }
    }
}

/// A literal compared against a column
#[derive(Clone, Debug, PartialEq, PartialOrd)]
pub enum Value {
    /// Text
    Text(String),
    /// Integer
    Int(i64),
    /// Amount
    Money(Money),
    /// Timestamp
    Time(DateTime<Utc>),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Int(n) => write!(f, "{n}"),
            Self::Money(amount) => write!(f, "{}", amount.as_major_units()),
            Self::Time(time) => f.write_str(&time.to_rfc3339()),
        }
    }
}

/// One narrowing condition of a query
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// `column = value`
    Eq(Column, Value),
    /// `column > value`
    Gt(Column, Value),
    /// `column >= value`
    Gte(Column, Value),
    /// `column <= value`
    Lte(Column, Value),
    /// Case-insensitive substring match against any of the columns
    TextSearch {
        /// Columns searched
        columns: Vec<Column>,
        /// Search term
        term: String,
    },
}

impl Predicate {
    /// Evaluate against a row; missing values never match
    #[must_use]
    pub fn matches(&self, row: &ListingWithEvent) -> bool {
        let compare = |column: &Column, value: &Value| {
            column
                .value_of(row)
                .and_then(|actual| actual.partial_cmp(value))
        };
        match self {
            Self::Eq(column, value) => column.value_of(row).as_ref() == Some(value),
            Self::Gt(column, value) => compare(column, value) == Some(Ordering::Greater),
            Self::Gte(column, value) => {
                matches!(compare(column, value), Some(Ordering::Greater | Ordering::Equal))
            },
            Self::Lte(column, value) => {
                matches!(compare(column, value), Some(Ordering::Less | Ordering::Equal))
            },
            Self::TextSearch { columns, term } => {
                let needle = term.to_lowercase();
                columns.iter().any(|column| {
                    matches!(column.value_of(row), Some(Value::Text(text)) if text.to_lowercase().contains(&needle))
                })
            },
        }
    }
}

/// Requested ordering
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    /// Column sorted by
    pub column: Column,
    /// Direction
    pub order: SortOrder,
}

impl SortSpec {
    /// Order two rows; rows missing the column sort last
    #[must_use]
    pub fn compare(&self, a: &ListingWithEvent, b: &ListingWithEvent) -> Ordering {
        let ordering = match (self.column.value_of(a), self.column.value_of(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Rows `[offset, offset + limit)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRange {
    /// First row
    pub offset: usize,
    /// Maximum number of rows
    pub limit: usize,
}

/// A backend-agnostic listing query
#[derive(Clone, Debug, PartialEq)]
pub struct ListingQuery {
    /// All must hold
    pub predicates: Vec<Predicate>,
    /// Ordering, if any
    pub sort: Option<SortSpec>,
    /// Requested slice
    pub page: PageRange,
}

impl ListingQuery {
    /// Build the query for one page of a search
    ///
    /// Only purchasable listings (active, tickets left) are eligible; each
    /// present filter adds one predicate.
    #[must_use]
    pub fn for_search(filters: &SearchFilters, offset: usize) -> Self {
        let mut predicates = vec![
            Predicate::Eq(Column::Status, Value::Text(ListingStatus::Active.as_str().to_string())),
            Predicate::Gt(Column::AvailableQuantity, Value::Int(0)),
        ];

        if let Some(term) = &filters.search_query {
            predicates.push(Predicate::TextSearch {
                columns: vec![Column::EventTitle, Column::EventLocation],
                term: term.clone(),
            });
        }
        if let Some(category) = &filters.event_category {
            predicates.push(Predicate::Eq(Column::EventCategory, Value::Text(category.clone())));
        }
        if let Some(min) = filters.min_price {
            predicates.push(Predicate::Gte(Column::Price, Value::Money(min)));
        }
        if let Some(max) = filters.max_price {
            predicates.push(Predicate::Lte(Column::Price, Value::Money(max)));
        }
        if let Some(city) = &filters.event_city {
            predicates.push(Predicate::Eq(Column::EventCity, Value::Text(city.clone())));
        }
        if let Some(state) = &filters.event_state {
            predicates.push(Predicate::Eq(Column::EventState, Value::Text(state.clone())));
        }
        if let Some(start) = filters.start_date {
            predicates.push(Predicate::Gte(Column::EventDate, Value::Time(start)));
        }
        if let Some(end) = filters.end_date {
            predicates.push(Predicate::Lte(Column::EventDate, Value::Time(end)));
        }

        Self {
            predicates,
            sort: Some(SortSpec {
                column: filters.sort_by.column(),
                order: filters.sort_order,
            }),
            page: PageRange {
                offset,
                limit: filters.limit,
            },
        }
    }

    /// Whether a row satisfies every predicate
    #[must_use]
    pub fn matches(&self, row: &ListingWithEvent) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }
}

/// One page of results
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T> {
    /// Rows of this page
    pub items: Vec<T>,
    /// Total number of matching rows
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_always_restricts_to_purchasable() {
        let query = ListingQuery::for_search(&SearchFilters::default(), 0);
        assert_eq!(query.predicates.len(), 2);
        assert_eq!(
            query.sort,
            Some(SortSpec {
                column: Column::CreatedAt,
                order: SortOrder::Desc
            })
        );
        assert_eq!(query.page, PageRange { offset: 0, limit: 10 });
    }

    #[test]
    fn each_filter_adds_one_predicate() {
        let filters = SearchFilters {
            search_query: Some("jazz".into()),
            event_category: Some("Music".into()),
            min_price: Some(Money::from_cents(2000)),
            max_price: Some(Money::from_cents(10_000)),
            event_city: Some("Austin".into()),
            event_state: Some("TX".into()),
            start_date: Some(DateTime::<Utc>::UNIX_EPOCH),
            end_date: Some(DateTime::<Utc>::UNIX_EPOCH),
            sort_by: SortKey::Date,
            sort_order: SortOrder::Asc,
            limit: 5,
            offset: 0,
        };
        let query = ListingQuery::for_search(&filters, 15);

        assert_eq!(query.predicates.len(), 10);
        assert!(query.predicates.contains(&Predicate::Gte(
            Column::Price,
            Value::Money(Money::from_cents(2000))
        )));
        assert_eq!(query.sort.map(|s| s.column), Some(Column::EventDate));
        assert_eq!(query.page, PageRange { offset: 15, limit: 5 });
    }

    #[test]
    fn money_values_render_in_major_units() {
        assert_eq!(Value::Money(Money::from_cents(2000)).to_string(), "20");
        assert_eq!(Value::Money(Money::from_cents(2050)).to_string(), "20.5");
    }

    #[test]
    fn sort_wire_names() {
        assert_eq!(serde_json::to_value(SortKey::CreatedAt).ok(), Some("created_at".into()));
        assert_eq!(serde_json::to_value(SortOrder::Asc).ok(), Some("ASC".into()));
    }
}
