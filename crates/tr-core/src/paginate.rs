use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use tr_config::stats::MAX_TOP_EVENTS;

use crate::error::{CoreError, CoreResult, invalid_request};

/// Default and maximum page size. Every ranked event may be enriched with a
/// time series, so pages stay as small as the enrichment cap.
pub const PAGE_SIZE: usize = MAX_TOP_EVENTS;

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Opaque pagination cursor, rendered as `value:offset:is_prev`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Kept for the text form; offset paging does not read it.
    pub value: usize,
    pub offset: usize,
    pub is_prev: bool,
    pub has_results: bool,
}

impl Cursor {
    fn new(offset: usize, is_prev: bool, has_results: bool) -> Self {
        Self {
            value: 0,
            offset,
            is_prev,
            has_results,
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.value, self.offset, u8::from(self.is_prev))
    }
}

impl FromStr for Cursor {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let bad = || invalid_request(format!("invalid cursor {s:?}"));
        let mut parts = s.split(':');
        let (Some(value), Some(offset), Some(is_prev), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(bad());
        };
        let is_prev = match is_prev {
            "0" => false,
            "1" => true,
            _ => return Err(bad()),
        };
        Ok(Self {
            value: value.parse().map_err(|_| bad())?,
            offset: offset.parse().map_err(|_| bad())?,
            is_prev,
            has_results: true,
        })
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut st = serializer.serialize_struct("Cursor", 2)?;
        st.serialize_field("cursor", &self.to_string())?;
        st.serialize_field("results", &self.has_results)?;
        st.end()
    }
}

// ---------------------------------------------------------------------------
// OffsetPaginator
// ---------------------------------------------------------------------------

/// Offset/limit slice to request from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: usize,
    /// One more than the page size, to detect a following page.
    pub limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub results: T,
    pub next: Cursor,
    pub prev: Cursor,
}

/// Offset pagination over a ranked query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetPaginator {
    per_page: usize,
    offset: usize,
}

impl OffsetPaginator {
    /// `per_page` defaults to and is clamped at [`PAGE_SIZE`]; zero is rejected.
    /// Only the cursor's offset is used. Offsets too large to page past are
    /// rejected.
    pub fn new(per_page: Option<usize>, cursor: Option<&str>) -> CoreResult<Self> {
        let per_page = match per_page {
            Some(0) => return Err(invalid_request("per_page must be at least 1")),
            Some(n) => n.min(PAGE_SIZE),
            None => PAGE_SIZE,
        };
        let offset = match cursor {
            Some(raw) => raw.parse::<Cursor>()?.offset,
            None => 0,
        };
        if offset.checked_add(per_page + 1).is_none() {
            return Err(invalid_request(format!("cursor offset {offset} out of range")));
        }
        Ok(Self { per_page, offset })
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: self.offset,
            limit: self.per_page + 1,
        }
    }

    /// Trim the look-ahead row from `rows` and build the surrounding cursors.
    pub fn finish<R>(&self, rows: &mut Vec<R>) -> (Cursor, Cursor) {
        let has_more = rows.len() > self.per_page;
        rows.truncate(self.per_page);
        let next = Cursor::new(self.offset + self.per_page, false, has_more);
        let prev = Cursor::new(self.offset.saturating_sub(self.per_page), true, self.offset > 0);
        (next, prev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreReason;

    #[test]
    fn cursor_round_trip_text() {
        let c: Cursor = "0:10:1".parse().unwrap();
        assert_eq!(c.offset, 10);
        assert!(c.is_prev);
        assert_eq!(c.to_string(), "0:10:1");
    }

    #[test]
    fn cursor_rejects_garbage() {
        for bad in ["", "0:1", "0:1:2", "a:1:0", "0:1:0:0", "0:-1:0"] {
            let err = bad.parse::<Cursor>().unwrap_err();
            assert_eq!(*err.reason(), CoreReason::InvalidRequest, "{bad:?}");
        }
    }

    #[test]
    fn page_size_clamped() {
        assert_eq!(OffsetPaginator::new(None, None).unwrap().per_page(), 5);
        assert_eq!(OffsetPaginator::new(Some(100), None).unwrap().per_page(), 5);
        assert_eq!(OffsetPaginator::new(Some(2), None).unwrap().per_page(), 2);
        assert!(OffsetPaginator::new(Some(0), None).is_err());
    }

    #[test]
    fn first_page_with_more() {
        let p = OffsetPaginator::new(None, None).unwrap();
        assert_eq!(p.window(), PageWindow { offset: 0, limit: 6 });
        let mut rows: Vec<u32> = (0..6).collect();
        let (next, prev) = p.finish(&mut rows);
        assert_eq!(rows, vec![0, 1, 2, 3, 4]);
        assert_eq!(next.to_string(), "0:5:0");
        assert!(next.has_results);
        assert_eq!(prev.to_string(), "0:0:1");
        assert!(!prev.has_results);
    }

    #[test]
    fn last_page() {
        let p = OffsetPaginator::new(None, Some("0:5:0")).unwrap();
        assert_eq!(p.window(), PageWindow { offset: 5, limit: 6 });
        let mut rows = vec!["a", "b"];
        let (next, prev) = p.finish(&mut rows);
        assert_eq!(rows.len(), 2);
        assert!(!next.has_results);
        assert_eq!(next.offset, 10);
        assert!(prev.has_results);
        assert_eq!(prev.offset, 0);
    }

    #[test]
    fn cursor_value_ignored() {
        let p = OffsetPaginator::new(None, Some("5:2:0")).unwrap();
        assert_eq!(p.window().offset, 2);
    }

    #[test]
    fn huge_offset_rejected() {
        let cursor = format!("0:{}:0", usize::MAX);
        let err = OffsetPaginator::new(None, Some(&cursor)).unwrap_err();
        assert_eq!(*err.reason(), CoreReason::InvalidRequest);

        let edge = format!("0:{}:0", usize::MAX - PAGE_SIZE - 1);
        let p = OffsetPaginator::new(None, Some(&edge)).unwrap();
        let (next, _) = p.finish(&mut Vec::<u8>::new());
        assert_eq!(next.offset, usize::MAX - 1);
    }

    #[test]
    fn cursor_serializes_with_results_flag() {
        let c = Cursor::new(5, false, true);
        let v = serde_json::to_value(c).unwrap();
        assert_eq!(v, serde_json::json!({"cursor": "0:5:0", "results": true}));
    }
}
