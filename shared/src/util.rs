/// Timestamp layout used by the relational store and the change stream
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Current UTC time rendered as `YYYY-MM-DD HH:MM:SS`
pub fn now_datetime() -> String {
    chrono::Utc::now().format(DATETIME_FORMAT).to_string()
}

/// Normalize a `(page, size)` request into `(offset, limit)`.
///
/// `page <= 0` becomes 1 and pages past [`MAX_PAGE`] read as `MAX_PAGE`;
/// `size <= 0` or `size > 50` becomes 10.
pub fn page_window(page: i64, size: i64) -> (i64, i64) {
    let page = page.clamp(1, MAX_PAGE);
    let size = if size <= 0 || size > MAX_PAGE_SIZE {
        DEFAULT_PAGE_SIZE
    } else {
        size
    };
    ((page - 1) * size, size)
}

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;
/// Deepest page served; keeps `offset` far from overflow
pub const MAX_PAGE: i64 = 100_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_defaults() {
        assert_eq!(page_window(0, 999), (0, 10));
        assert_eq!(page_window(-3, 0), (0, 10));
        assert_eq!(page_window(1, -1), (0, 10));
    }

    #[test]
    fn test_page_window_offsets() {
        assert_eq!(page_window(1, 20), (0, 20));
        assert_eq!(page_window(3, 20), (40, 20));
        assert_eq!(page_window(2, 50), (50, 50));
        assert_eq!(page_window(2, 51), (10, 10));
    }

    #[test]
    fn test_page_window_bounds_hold_for_all_inputs() {
        for page in -5..=5 {
            for size in [-1, 0, 1, 10, 49, 50, 51, 1000] {
                let (offset, limit) = page_window(page, size);
                assert!((1..=MAX_PAGE_SIZE).contains(&limit));
                let normalized_page = if page <= 0 { 1 } else { page };
                assert_eq!(offset, (normalized_page - 1) * limit);
            }
        }
    }

    #[test]
    fn test_page_window_huge_page_is_clamped() {
        assert_eq!(page_window(i64::MAX / 10, 50), ((MAX_PAGE - 1) * 50, 50));
        assert_eq!(page_window(i64::MAX, 999), ((MAX_PAGE - 1) * 10, 10));
        assert_eq!(page_window(MAX_PAGE, 20), ((MAX_PAGE - 1) * 20, 20));
    }

    #[test]
    fn test_now_datetime_layout() {
        let s = now_datetime();
        assert!(chrono::NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT).is_ok());
    }
}
