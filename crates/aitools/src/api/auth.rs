//! Login and signup

use aitools_core::types::{AuthResponse, TokenResponse};
use reqwest::Method;
use serde_json::json;

use super::ApiClient;
use crate::error::Error;

impl ApiClient {
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, Error> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .json(&json!({ "email": email, "password": password }));

        let response: TokenResponse = self.fetch(builder).await?;
        Ok(response.into())
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, Error> {
        let builder = self
            .request(Method::POST, "/auth/signup")
            .json(&json!({ "name": name, "email": email, "password": password }));

        let response: TokenResponse = self.fetch(builder).await?;
        Ok(response.into())
    }
}
