//! List query construction and paginated result shaping.

mod filters;
mod pagination;

pub use filters::{
    build_list_query, CallFilter, EvaluationFilter, ListQuery, QueryParams,
    DEFAULT_CALL_PAGE_SIZE, DEFAULT_EVALUATION_PAGE_SIZE,
};
pub use pagination::{
    paginate_result, CallListEnvelope, EvaluationListEnvelope, Page, PageWindow,
    PaginatedEnvelope,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn pairs(params: &QueryParams) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    #[test]
    fn empty_filters_are_omitted_not_sent_blank() {
        let filters: BTreeMap<String, String> = [
            ("status", ""),
            ("priority", "high"),
            ("category", ""),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

        let params = build_list_query(&filters, 2, 20);

        assert_eq!(
            pairs(&params),
            vec![("page", "2"), ("per_page", "20"), ("priority", "high")]
        );
    }

    #[test]
    fn page_and_size_are_sent_without_filters() {
        let params = ListQuery::evaluations().params();
        assert_eq!(pairs(&params), vec![("page", "1"), ("per_page", "10")]);
    }

    #[test]
    fn changing_a_filter_resets_to_first_page() {
        let mut query = ListQuery::calls();
        query.set_page(3);
        assert_eq!(query.page(), 3);

        query.set_filter(CallFilter::Status.key(), "resolved");

        assert_eq!(query.page(), 1);
        assert_eq!(query.filter("status"), "resolved");
        assert!(pairs(&query.params()).contains(&("page", "1")));

        query.set_page(3);
        query.set_filter(CallFilter::Status.key(), "");
        assert_eq!(query.page(), 1, "clearing a filter is a change too");

        query.set_page(2);
        query.clear_filters();
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn page_navigation_is_clamped_to_known_pages() {
        let mut query = ListQuery::calls();
        assert!(!query.previous_page());
        assert!(query.next_page(2));
        assert_eq!(query.page(), 2);
        assert!(!query.next_page(2));
        assert!(query.previous_page());
        query.set_page(0);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn call_envelope_is_reshaped_verbatim() {
        let envelope: CallListEnvelope = serde_json::from_str(
            r#"{"calls": [], "total": 41, "pages": 3, "current_page": 2}"#,
        )
        .expect("envelope decodes");

        let page = paginate_result(envelope, 1);

        assert_eq!(page.current_page, 2, "server page wins over the requested one");
        assert_eq!(page.total_items, 41);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn evaluation_envelope_falls_back_to_requested_page() {
        let envelope: EvaluationListEnvelope =
            serde_json::from_str(r#"{"evaluations": null, "total": null, "pages": 0}"#)
                .expect("envelope decodes");

        let page = paginate_result(envelope, 4);

        assert_eq!(page.current_page, 4);
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn window_reports_visible_range() {
        let page = Page {
            items: vec!["a", "b", "c", "d"],
            current_page: 3,
            total_items: 24,
            total_pages: 3,
        };
        assert_eq!(
            page.window(10),
            Some(PageWindow {
                first: 21,
                last: 24,
                total: 24
            })
        );

        let empty: Page<&str> = Page {
            items: Vec::new(),
            current_page: 1,
            total_items: 0,
            total_pages: 0,
        };
        assert_eq!(empty.window(10), None);
    }
}
