//! Admin endpoints. All of them require a token for an admin account.

use aitools_core::types::{
    AdminReview, ModerationDecision, PaginatedResponse, Review, ReviewStatus, Tool, ToolCreate,
    ToolUpdate,
};
use reqwest::Method;
use serde::Serialize;

use super::{segment, ApiClient};
use crate::error::Error;

/// Default page size for the admin listings
pub const DEFAULT_ADMIN_PAGE_SIZE: usize = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ModerationRequest<'a> {
    status: ModerationDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    moderation_note: Option<&'a str>,
}

impl ApiClient {
    pub async fn get_admin_tools(
        &self,
        page: Option<usize>,
        page_size: Option<usize>,
    ) -> Result<PaginatedResponse<Tool>, Error> {
        let builder = self.request(Method::GET, "/admin/tools").query(&[
            ("page", page.unwrap_or(1)),
            ("pageSize", page_size.unwrap_or(DEFAULT_ADMIN_PAGE_SIZE)),
        ]);

        let page: PaginatedResponse<Tool> = self.fetch(builder).await?;
        Ok(page.normalized())
    }

    pub async fn create_tool(&self, tool: &ToolCreate) -> Result<Tool, Error> {
        let builder = self.request(Method::POST, "/admin/tools").json(tool);
        self.fetch(builder).await
    }

    pub async fn update_tool(&self, id: &str, update: &ToolUpdate) -> Result<Tool, Error> {
        let path = format!("/admin/tools/{}", segment(id));
        let builder = self.request(Method::PUT, &path).json(update);
        self.fetch(builder).await
    }

    /// The response body, if any, is ignored
    pub async fn delete_tool(&self, id: &str) -> Result<(), Error> {
        let path = format!("/admin/tools/{}", segment(id));
        self.send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }

    /// Moderation queue; `None` lists every status
    pub async fn get_admin_reviews(
        &self,
        status: Option<ReviewStatus>,
        page: usize,
        page_size: usize,
    ) -> Result<PaginatedResponse<AdminReview>, Error> {
        let mut query = vec![
            ("page", page.to_string()),
            ("pageSize", page_size.to_string()),
        ];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }

        let builder = self.request(Method::GET, "/admin/reviews").query(&query);
        let page: PaginatedResponse<AdminReview> = self.fetch(builder).await?;
        Ok(page.normalized())
    }

    pub async fn moderate_review(
        &self,
        id: &str,
        decision: ModerationDecision,
        note: Option<&str>,
    ) -> Result<Review, Error> {
        let path = format!("/admin/reviews/{}", segment(id));
        let builder = self.request(Method::PATCH, &path).json(&ModerationRequest {
            status: decision,
            moderation_note: note.filter(|n| !n.is_empty()),
        });

        self.fetch(builder).await
    }
}
