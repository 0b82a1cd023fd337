use serde::de::{DeserializeOwned, Error as _};
use serde_json::{Map, Value};
use seedlab_bridge::page::{ActiveFilter, ListQuery, Page};

use crate::error::ApiError;

/// Query string of a paginated listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageQuery {
    params: Vec<(&'static str, String)>,
}

impl PageQuery {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            params: vec![("page", page.to_string()), ("size", size.to_string())],
        }
    }

    /// Builds the common part of every CRUD listing.
    pub fn from_list(query: &ListQuery, size: u32) -> Self {
        Self::new(query.page, size)
            .search(query.search.as_deref())
            .active(query.active)
    }

    pub fn param(mut self, key: &'static str, value: impl ToString) -> Self {
        self.params.push((key, value.to_string()));
        self
    }

    /// Adds `key` only when `value` holds non-blank text.
    pub fn optional(self, key: &'static str, value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn search(self, search: Option<&str>) -> Self {
        self.optional("search", search)
    }

    pub fn sort(self, sort: Option<&str>) -> Self {
        self.optional("sort", sort)
    }

    pub fn active(self, filter: ActiveFilter) -> Self {
        match filter.as_query() {
            Some(active) => self.param("activo", active),
            None => self,
        }
    }

    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.params
    }
}

/// Normalizes a listing response into a [`Page`].
///
/// Accepted shapes:
/// - the classic envelope `{ content, totalElements, totalPages, number,
///   first, last }`;
/// - the nested form `{ content, page: { number, size, totalElements,
///   totalPages } }`;
/// - a bare JSON array, treated as a single page.
pub fn extract_page<T: DeserializeOwned>(value: Value) -> Result<Page<T>, ApiError> {
    match value {
        Value::Array(items) => {
            let content: Vec<T> = serde_json::from_value(Value::Array(items))?;
            let total = content.len() as u64;
            Ok(Page {
                content,
                total_elements: total,
                total_pages: u32::from(total > 0),
                number: 0,
                first: true,
                last: true,
            })
        }
        Value::Object(mut map) => {
            let content: Vec<T> = match map.remove("content") {
                Some(content) => serde_json::from_value(content)?,
                None => Vec::new(),
            };

            let meta = match map.get("page") {
                Some(Value::Object(page)) => page.clone(),
                _ => map.clone(),
            };

            let number = read_u64(&meta, "number").unwrap_or(0) as u32;
            let total_elements = read_u64(&meta, "totalElements").unwrap_or(content.len() as u64);
            let total_pages = match read_u64(&meta, "totalPages") {
                Some(pages) => pages as u32,
                None => match read_u64(&meta, "size").filter(|size| *size > 0) {
                    Some(size) => total_elements.div_ceil(size) as u32,
                    None => u32::from(total_elements > 0),
                },
            };

            let first = map
                .get("first")
                .and_then(Value::as_bool)
                .unwrap_or(number == 0);
            let last = map
                .get("last")
                .and_then(Value::as_bool)
                .unwrap_or(number + 1 >= total_pages);

            Ok(Page {
                content,
                total_elements,
                total_pages,
                number,
                first,
                last,
            })
        }
        other => Err(ApiError::Decode(serde_json::Error::custom(format!(
            "expected a page envelope or an array, got {other}"
        )))),
    }
}

fn read_u64(map: &Map<String, Value>, key: &str) -> Option<u64> {
    map.get(key).and_then(Value::as_u64)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn classic_envelope() {
        let page: Page<i64> = extract_page(json!({
            "content": [1, 2],
            "totalElements": 12,
            "totalPages": 6,
            "number": 5,
            "first": false,
            "last": true
        }))
        .unwrap();

        assert_eq!(page.content, vec![1, 2]);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 6);
        assert_eq!(page.number, 5);
        assert!(!page.first);
        assert!(page.last);
    }

    #[test]
    fn nested_page_metadata() {
        let page: Page<i64> = extract_page(json!({
            "content": [3],
            "page": { "number": 1, "size": 2, "totalElements": 5, "totalPages": 3 }
        }))
        .unwrap();

        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 3);
        assert!(!page.first);
        assert!(!page.last);
    }

    #[test]
    fn bare_array_is_a_single_page() {
        let page: Page<i64> = extract_page(json!([4, 5, 6])).unwrap();
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 1);
        assert!(page.first && page.last);

        let empty: Page<i64> = extract_page(json!([])).unwrap();
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn total_pages_derived_from_size() {
        let page: Page<i64> = extract_page(json!({
            "content": [1, 2],
            "totalElements": 5,
            "size": 2,
            "number": 0
        }))
        .unwrap();
        assert_eq!(page.total_pages, 3);
        assert!(page.first);
        assert!(!page.last);
    }

    #[test]
    fn scalars_are_rejected() {
        assert!(extract_page::<i64>(json!(42)).is_err());
    }

    #[test]
    fn query_skips_blank_filters() {
        let query = PageQuery::from_list(
            &ListQuery {
                page: 2,
                search: Some("  ".to_owned()),
                active: ActiveFilter::All,
            },
            20,
        )
        .sort(Some("ficha,asc"));

        assert_eq!(
            query.as_pairs(),
            &[
                ("page", "2".to_owned()),
                ("size", "20".to_owned()),
                ("sort", "ficha,asc".to_owned()),
            ]
        );
    }
}
