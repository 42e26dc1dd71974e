//! Public catalog endpoints

use aitools_core::demo::DEFAULT_REVIEW_PAGE_SIZE;
use aitools_core::types::{PaginatedResponse, Review, ReviewCreate, Tool, ToolFilters};
use reqwest::Method;

use super::{segment, ApiClient};
use crate::error::Error;

impl ApiClient {
    /// `GET /tools` with the filter snapshot encoded as query parameters
    pub async fn get_tools(&self, filters: &ToolFilters) -> Result<PaginatedResponse<Tool>, Error> {
        let builder = self
            .request(Method::GET, "/tools")
            .query(&filters.query_pairs());

        let page: PaginatedResponse<Tool> = self.fetch(builder).await?;
        Ok(page.normalized())
    }

    pub async fn get_tool(&self, id: &str) -> Result<Tool, Error> {
        let path = format!("/tools/{}", segment(id));
        self.fetch(self.request(Method::GET, &path)).await
    }

    /// Approved reviews for a tool; page defaults to 1, page size to 10
    pub async fn get_tool_reviews(
        &self,
        tool_id: &str,
        page: Option<usize>,
        page_size: Option<usize>,
    ) -> Result<PaginatedResponse<Review>, Error> {
        let path = format!("/tools/{}/reviews", segment(tool_id));
        let builder = self.request(Method::GET, &path).query(&[
            ("page", page.unwrap_or(1)),
            ("pageSize", page_size.unwrap_or(DEFAULT_REVIEW_PAGE_SIZE)),
        ]);

        let page: PaginatedResponse<Review> = self.fetch(builder).await?;
        Ok(page.normalized())
    }

    /// Submit a review. The server stores it as `pending` until moderated.
    pub async fn create_review(&self, review: &ReviewCreate) -> Result<Review, Error> {
        review.validate()?;

        let builder = self.request(Method::POST, "/reviews").json(review);
        self.fetch(builder).await
    }
}
