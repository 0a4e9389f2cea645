use serde::{Deserialize, Serialize};

/// One entry of a list response: `{ "object": "...", "attributes": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiItem<T> {
    #[serde(default)]
    pub object: Option<String>,
    pub attributes: T,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// A single page of a list endpoint. `T` is the item type, either a typed
/// `ApiItem<_>` or a raw `serde_json::Value` when records are checked one by one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl<T> PageEnvelope<T> {
    /// Whether this page is the last one, given the page number that was requested.
    ///
    /// No pagination block means a single-page response. Missing counters fall
    /// back to `requested`, which always ends the walk. The reported page never
    /// counts as lower than the requested one, so a backend that ignores `page`
    /// still stops after `total_pages` requests.
    pub fn is_last_page(&self, requested: u32) -> bool {
        let Some(p) = self.meta.as_ref().and_then(|m| m.pagination.as_ref()) else {
            return true;
        };
        let current = p.current_page.unwrap_or(requested).max(requested);
        let total = p.total_pages.unwrap_or(requested);
        current >= total
    }

    pub fn into_items(self) -> impl Iterator<Item = T> {
        self.data.into_iter()
    }
}

impl<T> PageEnvelope<ApiItem<T>> {
    pub fn into_attributes(self) -> impl Iterator<Item = T> {
        self.data.into_iter().map(|item| item.attributes)
    }
}
