//! Filter/sort/pagination state and its translation into a store request.

use crate::domain::shipment::{ShipmentRecord, ShipmentStatus, ValidationError};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// Columns a listing can be ordered by. The serialized name is the store column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Title,
    Status,
    IsFragile,
    WeightKg,
    DistanceKm,
    ShippingCost,
    CreatedAt,
}

impl SortColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            SortColumn::Title => "title",
            SortColumn::Status => "status",
            SortColumn::IsFragile => "is_fragile",
            SortColumn::WeightKg => "weight_kg",
            SortColumn::DistanceKm => "distance_km",
            SortColumn::ShippingCost => "shipping_cost",
            SortColumn::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

/// Partial update for [`QueryState::apply_filter`]. `None` leaves a field untouched.
///
/// `filter_status` distinguishes "absent" (keep) from `null` (clear the filter).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct FilterChange {
    #[serde(default)]
    pub search_term: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<ShipmentStatus>)]
    pub filter_status: Option<Option<ShipmentStatus>>,
    #[serde(default)]
    pub sort_column: Option<SortColumn>,
    #[serde(default)]
    pub sort_direction: Option<SortDirection>,
}

fn present_or_null<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl FilterChange {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn status(status: Option<ShipmentStatus>) -> Self {
        Self {
            filter_status: Some(status),
            ..Self::default()
        }
    }

    pub fn sort(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            sort_column: Some(column),
            sort_direction: Some(direction),
            ..Self::default()
        }
    }
}

/// Process-local listing state. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct QueryState {
    search_term: String,
    filter_status: Option<ShipmentStatus>,
    sort_column: SortColumn,
    sort_direction: SortDirection,
    page_index: u64,
    page_size: u64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            filter_status: None,
            sort_column: SortColumn::CreatedAt,
            sort_direction: SortDirection::Descending,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    pub fn with_page_size(page_size: u64) -> Result<Self, ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::ZeroPageSize);
        }
        Ok(Self {
            page_size,
            ..Self::default()
        })
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn filter_status(&self) -> Option<ShipmentStatus> {
        self.filter_status
    }

    pub fn sort_column(&self) -> SortColumn {
        self.sort_column
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Merges `change` and always returns to the first page.
    pub fn apply_filter(&mut self, change: FilterChange) {
        if let Some(term) = change.search_term {
            self.search_term = term;
        }
        if let Some(status) = change.filter_status {
            self.filter_status = status;
        }
        if let Some(column) = change.sort_column {
            self.sort_column = column;
        }
        if let Some(direction) = change.sort_direction {
            self.sort_direction = direction;
        }
        self.page_index = 0;
    }

    /// Flips direction on the current column, or switches to `column` ascending.
    /// Leaves the page index alone.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_column = column;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Advances one page if another page exists. Returns whether the index moved.
    pub fn advance(&mut self, total_count: u64) -> bool {
        if (self.page_index + 1).saturating_mul(self.page_size) >= total_count {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Steps back one page unless already on the first. Returns whether the index moved.
    pub fn retreat(&mut self) -> bool {
        if self.page_index == 0 {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Pulls the page index back inside `[0, last_page_index]`. Returns whether it moved.
    pub fn clamp_to(&mut self, total_count: u64) -> bool {
        let last = last_page_index(total_count, self.page_size);
        if self.page_index > last {
            self.page_index = last;
            return true;
        }
        false
    }

    pub fn to_request(&self) -> ListRequest {
        let term = self.search_term.trim();
        ListRequest {
            filter: ListFilter {
                status: self.filter_status,
                title_contains: (!term.is_empty()).then(|| term.to_string()),
            },
            sort: SortSpec {
                column: self.sort_column,
                direction: self.sort_direction,
            },
            offset: self.page_index * self.page_size,
            limit: self.page_size,
        }
    }
}

pub fn page_count(total_count: u64, page_size: u64) -> u64 {
    total_count.div_ceil(page_size.max(1))
}

pub fn last_page_index(total_count: u64, page_size: u64) -> u64 {
    page_count(total_count, page_size).saturating_sub(1)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ListFilter {
    /// Equality on `status`.
    pub status: Option<ShipmentStatus>,
    /// Case-insensitive substring on `title`.
    pub title_contains: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

/// One read against the store: a filtered, ordered slice plus an exact count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ListRequest {
    pub filter: ListFilter,
    pub sort: SortSpec,
    pub offset: u64,
    pub limit: u64,
}

impl ListRequest {
    /// Smallest possible read, used to check that a store answers at all.
    pub fn single_row() -> Self {
        ListRequest {
            limit: 1,
            ..QueryState::default().to_request()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ResultPage {
    pub records: Vec<ShipmentRecord>,
    /// Size of the whole filtered set, not of this page.
    pub total_count: u64,
}

/// Pager numbers for display ("Page 2 of 7").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageSummary {
    pub page_number: u64,
    pub page_count: u64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageSummary {
    pub fn of(state: &QueryState, total_count: u64) -> Self {
        Self {
            page_number: state.page_index + 1,
            page_count: page_count(total_count, state.page_size),
            has_prev: state.page_index > 0,
            has_next: (state.page_index + 1).saturating_mul(state.page_size) < total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = QueryState::default();
        assert_eq!(state.sort_column(), SortColumn::CreatedAt);
        assert_eq!(state.sort_direction(), SortDirection::Descending);
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.page_size(), DEFAULT_PAGE_SIZE);
        assert!(QueryState::with_page_size(0).is_err());
    }

    #[test]
    fn filter_resets_page_but_sort_toggle_does_not() {
        let mut state = QueryState::default();
        assert!(state.advance(20));
        assert!(state.advance(20));
        state.toggle_sort(SortColumn::Title);
        assert_eq!(state.page_index(), 2);

        state.apply_filter(FilterChange::search("box"));
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.search_term(), "box");

        state.advance(20);
        state.apply_filter(FilterChange::default());
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn toggle_sort_twice_on_fresh_state() {
        let mut state = QueryState::default();
        state.toggle_sort(SortColumn::Status);
        assert_eq!(state.sort_direction(), SortDirection::Ascending);
        state.toggle_sort(SortColumn::Status);
        assert_eq!(state.sort_column(), SortColumn::Status);
        assert_eq!(state.sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn toggle_default_column_flips_direction() {
        let mut state = QueryState::default();
        state.toggle_sort(SortColumn::CreatedAt);
        assert_eq!(state.sort_direction(), SortDirection::Ascending);
    }

    #[test]
    fn paging_bounds() {
        let mut state = QueryState::default();
        assert!(!state.retreat());
        assert!(state.advance(11));
        assert!(state.advance(11));
        // (2 + 1) * 5 >= 11
        assert!(!state.advance(11));
        assert_eq!(state.page_index(), 2);
        assert!(!state.advance(0));

        let mut exact = QueryState::default();
        assert!(exact.advance(10));
        assert!(!exact.advance(10));
    }

    #[test]
    fn clamp_after_shrink() {
        let mut state = QueryState::default();
        state.advance(11);
        state.advance(11);
        assert!(state.clamp_to(10));
        assert_eq!(state.page_index(), 1);
        assert!(state.clamp_to(0));
        assert_eq!(state.page_index(), 0);
        assert!(!state.clamp_to(0));
    }

    #[test]
    fn request_translation() {
        let mut state = QueryState::with_page_size(10).unwrap();
        state.apply_filter(FilterChange {
            search_term: Some("  Mug ".into()),
            filter_status: Some(Some(ShipmentStatus::InTransit)),
            ..FilterChange::default()
        });
        state.advance(100);
        state.toggle_sort(SortColumn::ShippingCost);

        let req = state.to_request();
        assert_eq!(req.filter.status, Some(ShipmentStatus::InTransit));
        assert_eq!(req.filter.title_contains.as_deref(), Some("Mug"));
        assert_eq!(req.sort.column, SortColumn::ShippingCost);
        assert_eq!(req.sort.direction, SortDirection::Ascending);
        assert_eq!((req.offset, req.limit), (10, 10));

        state.apply_filter(FilterChange::search("   "));
        assert_eq!(state.to_request().filter.title_contains, None);
    }

    #[test]
    fn filter_change_distinguishes_null_from_absent() {
        let absent: FilterChange = serde_json::from_str(r#"{"search_term":"x"}"#).unwrap();
        assert_eq!(absent.filter_status, None);

        let cleared: FilterChange = serde_json::from_str(r#"{"filter_status":null}"#).unwrap();
        assert_eq!(cleared.filter_status, Some(None));

        let set: FilterChange = serde_json::from_str(r#"{"filter_status":"FAILED"}"#).unwrap();
        assert_eq!(set.filter_status, Some(Some(ShipmentStatus::Failed)));

        let mut state = QueryState::default();
        state.apply_filter(set);
        state.apply_filter(absent);
        assert_eq!(state.filter_status(), Some(ShipmentStatus::Failed));
        state.apply_filter(cleared);
        assert_eq!(state.filter_status(), None);
    }

    #[test]
    fn page_summary() {
        let mut state = QueryState::default();
        assert_eq!(
            PageSummary::of(&state, 0),
            PageSummary {
                page_number: 1,
                page_count: 0,
                has_prev: false,
                has_next: false,
            }
        );
        state.advance(12);
        let summary = PageSummary::of(&state, 12);
        assert_eq!(summary.page_number, 2);
        assert_eq!(summary.page_count, 3);
        assert!(summary.has_prev && summary.has_next);
    }
}
