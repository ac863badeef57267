//! Query builder shared by the admin listing endpoints.

use chrono::{DateTime, SecondsFormat, Utc};

/// Sort direction for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Paged listing query: page, size, sort, an optional search term and
/// creation-date window, plus arbitrary extra filters.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: String,
    pub sort_direction: SortDirection,
    pub search: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    extra: Vec<(String, String)>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 20,
            sort_by: "createdAt".to_string(),
            sort_direction: SortDirection::Desc,
            search: None,
            date_from: None,
            date_to: None,
            extra: Vec::new(),
        }
    }
}

impl ListQuery {
    /// Query for a specific zero-based page.
    #[must_use]
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Set the sort column.
    #[must_use]
    pub fn sorted_by(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_by = column.into();
        self.sort_direction = direction;
        self
    }

    /// Set the search term. Blank terms are dropped at render time.
    #[must_use]
    pub fn searching(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Limit to records created inside the given window. Either bound
    /// may be open.
    #[must_use]
    pub fn created_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    /// Add an extra filter pair (e.g. `status=SHIPPED`).
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Render to query parameters. The page size key is `size` for the
    /// Spring services; the catalog calls it `pageSize`, see
    /// [`Self::to_query_with_size_key`].
    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.to_query_with_size_key("size")
    }

    /// Render to query parameters with a custom page size key.
    #[must_use]
    pub fn to_query_with_size_key(&self, size_key: &str) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_string(), self.page.to_string()),
            (size_key.to_string(), self.size.to_string()),
            ("sortBy".to_string(), self.sort_by.clone()),
            (
                "sortDirection".to_string(),
                self.sort_direction.as_str().to_string(),
            ),
        ];
        if let Some(search) = self.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query.push(("search".to_string(), search.to_string()));
        }
        if let Some(from) = self.date_from {
            query.push(("startDate".to_string(), render_date(from)));
        }
        if let Some(to) = self.date_to {
            query.push(("endDate".to_string(), render_date(to)));
        }
        query.extend(self.extra.iter().cloned());
        query
    }
}

// The order service expects millisecond-precision ISO-8601 with a Z
// suffix for its date-range parameters.
fn render_date(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sorts_newest_first() {
        let query = ListQuery::default().to_query();
        assert!(query.contains(&("sortBy".to_string(), "createdAt".to_string())));
        assert!(query.contains(&("sortDirection".to_string(), "desc".to_string())));
    }

    #[test]
    fn blank_search_is_dropped() {
        let query = ListQuery::default().searching("   ").to_query();
        assert!(!query.iter().any(|(k, _)| k == "search"));
    }

    #[test]
    fn date_window_renders_iso_bounds() {
        let from = "2026-08-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let to = "2026-08-29T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let query = ListQuery::default()
            .created_between(Some(from), Some(to))
            .to_query();
        assert!(query.contains(&(
            "startDate".to_string(),
            "2026-08-01T00:00:00.000Z".to_string()
        )));
        assert!(query.contains(&(
            "endDate".to_string(),
            "2026-08-29T00:00:00.000Z".to_string()
        )));

        let open_ended = ListQuery::default()
            .created_between(Some(from), None)
            .to_query();
        assert!(!open_ended.iter().any(|(k, _)| k == "endDate"));
    }

    #[test]
    fn filters_append_after_paging() {
        let query = ListQuery::page(2)
            .searching("watch")
            .filter("status", "SHIPPED")
            .to_query();
        assert!(query.contains(&("page".to_string(), "2".to_string())));
        assert!(query.contains(&("search".to_string(), "watch".to_string())));
        assert_eq!(
            query.last(),
            Some(&("status".to_string(), "SHIPPED".to_string()))
        );
    }
}
