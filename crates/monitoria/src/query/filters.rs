use std::collections::BTreeMap;

/// Ordered `key=value` pairs ready for a URL query string.
pub type QueryParams = Vec<(String, String)>;

pub const DEFAULT_CALL_PAGE_SIZE: u32 = 20;
pub const DEFAULT_EVALUATION_PAGE_SIZE: u32 = 10;

/// Builds list parameters: `page` and `per_page` always, then every filter that
/// has a value. Empty strings mean "no constraint" and are left out entirely.
pub fn build_list_query(
    filters: &BTreeMap<String, String>,
    page: u32,
    page_size: u32,
) -> QueryParams {
    let mut params = vec![
        ("page".to_string(), page.max(1).to_string()),
        ("per_page".to_string(), page_size.to_string()),
    ];
    params.extend(
        filters
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key.clone(), value.clone())),
    );
    params
}

/// Filter keys understood by `GET /calls`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallFilter {
    Status,
    Priority,
    Category,
    OperatorId,
    DateFrom,
    DateTo,
}

impl CallFilter {
    pub const ALL: [CallFilter; 6] = [
        CallFilter::Status,
        CallFilter::Priority,
        CallFilter::Category,
        CallFilter::OperatorId,
        CallFilter::DateFrom,
        CallFilter::DateTo,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Category => "category",
            Self::OperatorId => "operator_id",
            Self::DateFrom => "date_from",
            Self::DateTo => "date_to",
        }
    }
}

/// Filter keys understood by `GET /evaluations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationFilter {
    Search,
    RequiresCoaching,
    IsExemplary,
    CallId,
    OperatorId,
}

impl EvaluationFilter {
    pub const ALL: [EvaluationFilter; 5] = [
        EvaluationFilter::Search,
        EvaluationFilter::RequiresCoaching,
        EvaluationFilter::IsExemplary,
        EvaluationFilter::CallId,
        EvaluationFilter::OperatorId,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::RequiresCoaching => "requires_coaching",
            Self::IsExemplary => "is_exemplary",
            Self::CallId => "call_id",
            Self::OperatorId => "operator_id",
        }
    }
}

/// Transient filter and pagination state for one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    filters: BTreeMap<String, String>,
    page: u32,
    per_page: u32,
}

impl ListQuery {
    pub fn new<'a>(keys: impl IntoIterator<Item = &'a str>, per_page: u32) -> Self {
        Self {
            filters: keys
                .into_iter()
                .map(|key| (key.to_string(), String::new()))
                .collect(),
            page: 1,
            per_page: per_page.max(1),
        }
    }

    pub fn calls() -> Self {
        Self::new(
            CallFilter::ALL.iter().map(|filter| filter.key()),
            DEFAULT_CALL_PAGE_SIZE,
        )
    }

    pub fn evaluations() -> Self {
        Self::new(
            EvaluationFilter::ALL.iter().map(|filter| filter.key()),
            DEFAULT_EVALUATION_PAGE_SIZE,
        )
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn filter(&self, key: &str) -> &str {
        self.filters.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Sets a filter and returns to page 1, since the old page position may
    /// not exist under the new constraint.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.filters.insert(key.into(), value.into());
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        for value in self.filters.values_mut() {
            value.clear();
        }
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Advances unless already on the last known page.
    pub fn next_page(&mut self, total_pages: u32) -> bool {
        if self.page < total_pages {
            self.page += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    pub fn params(&self) -> QueryParams {
        build_list_query(&self.filters, self.page, self.per_page)
    }
}
