use serde::{Deserialize, Serialize};

use crate::calls::Call;
use crate::evaluations::Evaluation;
use crate::wire::{lenient_count, null_as_default};

/// One page of results exactly as the server ordered and counted them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// 1-based bounds of the items on this page ("showing 11 to 20 of 34").
    pub fn window(&self, per_page: u32) -> Option<PageWindow> {
        if self.items.is_empty() || self.total_items == 0 {
            return None;
        }
        let per_page = u64::from(per_page.max(1));
        let first = u64::from(self.current_page.max(1) - 1) * per_page + 1;
        let last = (u64::from(self.current_page.max(1)) * per_page).min(self.total_items);
        Some(PageWindow {
            first,
            last: last.max(first),
            total: self.total_items,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub first: u64,
    pub last: u64,
    pub total: u64,
}

/// Paginated wrapper returned by a list endpoint.
pub trait PaginatedEnvelope {
    type Item;

    fn into_page(self, requested_page: u32) -> Page<Self::Item>;
}

/// Reshapes an envelope without re-sorting, re-filtering, or re-counting.
pub fn paginate_result<E: PaginatedEnvelope>(envelope: E, requested_page: u32) -> Page<E::Item> {
    envelope.into_page(requested_page)
}

#[derive(Debug, Deserialize)]
pub struct CallListEnvelope {
    #[serde(default)]
    pub calls: Vec<Call>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: u32,
}

impl PaginatedEnvelope for CallListEnvelope {
    type Item = Call;

    fn into_page(self, requested_page: u32) -> Page<Call> {
        Page {
            items: self.calls,
            current_page: self.current_page.unwrap_or(requested_page),
            total_items: self.total,
            total_pages: self.pages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluationListEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub evaluations: Vec<Evaluation>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: u32,
}

impl PaginatedEnvelope for EvaluationListEnvelope {
    type Item = Evaluation;

    fn into_page(self, requested_page: u32) -> Page<Evaluation> {
        Page {
            items: self.evaluations,
            current_page: self.current_page.unwrap_or(requested_page),
            total_items: self.total,
            total_pages: self.pages,
        }
    }
}
