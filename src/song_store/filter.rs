//! Resolution of raw `GET /songs` query parameters into a [`SongFilter`].
//!
//! Resolution never fails. Malformed or out-of-range pagination values fall
//! back to their defaults instead of producing an error response.

use serde::Deserialize;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Query string of `GET /songs`, kept as raw strings so that malformed
/// numbers can degrade to defaults rather than being rejected by the
/// extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongQueryParams {
    pub group: Option<String>,
    pub title: Option<String>,
    pub release_date: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

impl SongQueryParams {
    /// Folds decoded query pairs into params. A repeated key keeps its first
    /// value and unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = SongQueryParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "group" => &mut params.group,
                "title" => &mut params.title,
                "release_date" => &mut params.release_date,
                "page" => &mut params.page,
                "page_size" => &mut params.page_size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Predicates and page window for one catalog read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongFilter {
    /// Exact match on the group.
    pub group: Option<String>,
    /// Case-sensitive substring match on the title.
    pub title: Option<String>,
    /// Exact match on the release date.
    pub release_date: Option<String>,
    pub page: u64,
    pub page_size: u64,
}

impl Default for SongFilter {
    fn default() -> Self {
        SongFilter {
            group: None,
            title: None,
            release_date: None,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SongFilter {
    pub fn resolve(params: &SongQueryParams) -> Self {
        SongFilter {
            group: non_empty(&params.group),
            title: non_empty(&params.title),
            release_date: non_empty(&params.release_date),
            page: parse_positive(params.page.as_deref()).unwrap_or(DEFAULT_PAGE),
            page_size: parse_positive(params.page_size.as_deref()).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn parse_positive(value: Option<&str>) -> Option<u64> {
    value
        .and_then(|v| v.parse::<i64>().ok())
        .filter(|v| *v >= 1)
        .map(|v| v as u64)
}
