use axum::{extract::Query, http::Uri};
use serde::{Deserialize, Serialize};

use crate::errors::{ServiceError, ServiceResult};

const INVALID_PAGE: &str = "Invalid page.";
const PAGE_QUERY_PARAM: &str = "page";

/// Page requested by a listing.
///
/// Reading it never fails: a repeated `page` keeps its last value and an
/// undecodable query string counts as no page at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(page: impl Into<String>) -> Self {
        Self {
            page: Some(page.into()),
        }
    }

    pub fn from_uri(uri: &Uri) -> Self {
        let page = Query::<Vec<(String, String)>>::try_from_uri(uri)
            .ok()
            .and_then(|Query(pairs)| {
                pairs
                    .into_iter()
                    .rev()
                    .find(|(key, _)| key == PAGE_QUERY_PARAM)
                    .map(|(_, value)| value)
            });
        Self { page }
    }
}


/// One page of results with links to its neighbours
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Page-number pagination over an already ordered result set.
///
/// Pages are 1-based; `last` selects the final page. An empty result set
/// still has one (empty) first page.
#[derive(Debug, Clone)]
pub struct PageNumberPagination {
    pub page_size: usize,
    pub page_query_param: &'static str,
    pub last_page_strings: &'static [&'static str],
}

impl PageNumberPagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page_query_param: PAGE_QUERY_PARAM,
            last_page_strings: &["last"],
        }
    }

    pub fn num_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size).max(1)
    }

    fn page_number(&self, query: &PageQuery, num_pages: usize) -> ServiceResult<usize> {
        let raw = match query.page.as_deref().map(str::trim) {
            None | Some("") => return Ok(1),
            Some(raw) => raw,
        };

        if self.last_page_strings.contains(&raw) {
            return Ok(num_pages);
        }

        let number: usize = raw
            .parse()
            .map_err(|_| ServiceError::InvalidPage(INVALID_PAGE.to_string()))?;

        if number < 1 || number > num_pages {
            return Err(ServiceError::InvalidPage(INVALID_PAGE.to_string()));
        }
        Ok(number)
    }

    /// Cut `items` down to the requested page
    pub fn paginate<T>(&self, items: Vec<T>, query: &PageQuery, uri: &Uri) -> ServiceResult<Page<T>> {
        let count = items.len();
        let num_pages = self.num_pages(count);
        let number = self.page_number(query, num_pages)?;

        let start = (number - 1) * self.page_size;
        let results: Vec<T> = items.into_iter().skip(start).take(self.page_size).collect();

        Ok(Page {
            count,
            next: (number < num_pages).then(|| self.link(uri, Some(number + 1))),
            previous: match number {
                1 => None,
                2 => Some(self.link(uri, None)),
                n => Some(self.link(uri, Some(n - 1))),
            },
            results,
        })
    }

    /// Rebuild the request URI with the page parameter replaced (or dropped)
    fn link(&self, uri: &Uri, page: Option<usize>) -> String {
        let mut params: Vec<String> = uri
            .query()
            .unwrap_or_default()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| pair.split('=').next() != Some(self.page_query_param))
            .map(str::to_string)
            .collect();

        if let Some(page) = page {
            params.push(format!("{}={}", self.page_query_param, page));
        }

        if params.is_empty() {
            uri.path().to_string()
        } else {
            format!("{}?{}", uri.path(), params.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_page_by_default() {
        let pagination = PageNumberPagination::new(2);
        let page = pagination
            .paginate(vec![1, 2, 3, 4, 5], &PageQuery::default(), &uri("/todos"))
            .unwrap();

        assert_eq!(page.count, 5);
        assert_eq!(page.results, vec![1, 2]);
        assert_eq!(page.next.as_deref(), Some("/todos?page=2"));
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_second_page_previous_link_drops_param() {
        let pagination = PageNumberPagination::new(2);
        let page = pagination
            .paginate(vec![1, 2, 3, 4, 5], &PageQuery::page("2"), &uri("/todos?page=2"))
            .unwrap();

        assert_eq!(page.results, vec![3, 4]);
        assert_eq!(page.previous.as_deref(), Some("/todos"));
        assert_eq!(page.next.as_deref(), Some("/todos?page=3"));
    }

    #[test]
    fn test_last_page_keyword() {
        let pagination = PageNumberPagination::new(2);
        let page = pagination
            .paginate(vec![1, 2, 3, 4, 5], &PageQuery::page("last"), &uri("/todos?page=last"))
            .unwrap();

        assert_eq!(page.results, vec![5]);
        assert!(page.next.is_none());
        assert_eq!(page.previous.as_deref(), Some("/todos?page=2"));
    }

    #[test]
    fn test_other_query_params_survive() {
        let pagination = PageNumberPagination::new(1);
        let page = pagination
            .paginate(vec![1, 2], &PageQuery::page("1"), &uri("/todos?format=json&page=1"))
            .unwrap();

        assert_eq!(page.next.as_deref(), Some("/todos?format=json&page=2"));
    }

    #[test]
    fn test_empty_collection_has_one_page() {
        let pagination = PageNumberPagination::new(10);
        let page = pagination
            .paginate(Vec::<i32>::new(), &PageQuery::page("1"), &uri("/todos"))
            .unwrap();

        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_invalid_pages_are_not_found() {
        let pagination = PageNumberPagination::new(2);
        for raw in ["0", "4", "-1", "abc"] {
            let result = pagination.paginate(vec![1, 2, 3], &PageQuery::page(raw), &uri("/todos"));
            assert!(
                matches!(result, Err(ServiceError::InvalidPage(_))),
                "page {} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_page_query_keeps_last_repeated_value() {
        assert_eq!(PageQuery::from_uri(&uri("/todos?page=1&page=2")), PageQuery::page("2"));
        assert_eq!(
            PageQuery::from_uri(&uri("/todos?format=json&page=last")),
            PageQuery::page("last")
        );
        assert_eq!(PageQuery::from_uri(&uri("/todos?format=json")), PageQuery::default());
        assert_eq!(PageQuery::from_uri(&uri("/todos")), PageQuery::default());
    }
}
