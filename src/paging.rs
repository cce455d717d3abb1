//! Pagination normalization for list operations.
//!
//! The orchestrator hands list RPCs a raw `(limit, starting_token)` pair
//! straight from the client. This module turns that pair into the 1-based
//! `(page, size)` parameters the portal API pages with.

/// Page used when the starting token is absent or not numeric.
pub const DEFAULT_FIRST_PAGE: i32 = 1;

/// Page size used when the caller supplies no positive limit.
pub const DEFAULT_PAGE_SIZE: i32 = 10;

/// Normalize a raw `(limit, starting_token)` pair into `(page, size)`.
///
/// A limit below 1 falls back to [`DEFAULT_PAGE_SIZE`]. A starting token
/// that does not parse as an integer is treated as a request for the first
/// page, not as a malformed-input error.
pub fn normalize_paging(limit: i32, starting_token: &str) -> (i32, i32) {
    let size = if limit < 1 { DEFAULT_PAGE_SIZE } else { limit };
    let page = starting_token
        .parse::<i32>()
        .unwrap_or(DEFAULT_FIRST_PAGE);
    (page, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_zero_limit_and_garbage_token() {
        assert_eq!(
            normalize_paging(0, "abc"),
            (DEFAULT_FIRST_PAGE, DEFAULT_PAGE_SIZE)
        );
    }

    #[test]
    fn test_numeric_token_and_positive_limit_pass_through() {
        assert_eq!(normalize_paging(50, "3"), (3, 50));
    }

    #[test]
    fn test_negative_limit_and_empty_token() {
        assert_eq!(
            normalize_paging(-5, ""),
            (DEFAULT_FIRST_PAGE, DEFAULT_PAGE_SIZE)
        );
    }

    #[test]
    fn test_non_numeric_token_never_errors() {
        // The silent fallback is deliberate: bad tokens mean "first page".
        for token in ["abc", "1.5", "0x10", " 7", "∞"] {
            let (page, _) = normalize_paging(10, token);
            assert_eq!(page, DEFAULT_FIRST_PAGE, "token {token:?}");
        }
    }

    #[test]
    fn test_limit_of_one_is_respected() {
        assert_eq!(normalize_paging(1, "2"), (2, 1));
    }
}
