use serde::Deserialize;
use validator::Validate;

use crate::models::page::{PageRequest, DEFAULT_PAGE_SIZE};

/// `?page=&size=` query parameters.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PageParams {
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub size: Option<u32>,
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page.unwrap_or(0), self.size.unwrap_or(DEFAULT_PAGE_SIZE))
    }
}

/// `?q=&page=&size=` for the public event listing.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "must be between 1 and 100"))]
    pub size: Option<u32>,
}

impl SearchParams {
    /// The trimmed search text, if any was given.
    pub fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn to_request(&self) -> PageRequest {
        PageParams {
            page: self.page,
            size: self.size,
        }
        .to_request()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageParams::default().to_request();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_size_out_of_range_is_rejected() {
        let params = PageParams {
            page: None,
            size: Some(0),
        };
        assert!(params.validate().is_err());

        let params = PageParams {
            page: None,
            size: Some(101),
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_blank_search_query_is_ignored() {
        let params = SearchParams {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.query(), None);

        let params = SearchParams {
            q: Some(" rock ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.query(), Some("rock"));
    }
}
