use orgportal_domain::PaginatedList;
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Paging state shared by list responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/page-meta-response.ts"
)]
pub struct PageMetaResponse {
    pub page_index: u32,
    pub total_pages: u32,
    #[ts(type = "number")]
    pub total_count: u64,
    /// Page numbers to render as links, at most ten.
    pub pages: Vec<u32>,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> From<&PaginatedList<T>> for PageMetaResponse {
    fn from(value: &PaginatedList<T>) -> Self {
        Self {
            page_index: value.page_index(),
            total_pages: value.total_pages(),
            total_count: value.total_count(),
            pages: value.pages().to_vec(),
            has_previous_page: value.has_previous_page(),
            has_next_page: value.has_next_page(),
        }
    }
}
