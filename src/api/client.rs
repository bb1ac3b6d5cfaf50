//! HTTP client for the campus feed REST API

use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{Endpoint, FeedApi};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{CreatedPost, LoginRequest, LoginResponse, NewPost, Post, SignupRequest, User};

/// REST client bound to one base URL
pub struct ApiClient {
    client: Client,
    base_url: String,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl ApiClient {
    /// Create a client from configuration.
    ///
    /// The base URL is resolved here, once.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.resolve_base_url(),
            retry_attempts: config.retry_attempts.max(1),
            retry_backoff: config.retry_backoff(1),
        })
    }

    /// Resolved base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every user
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json(&Endpoint::ListUsers).await
    }

    /// Look a user up by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<User> {
        self.get_json(&Endpoint::GetUserByUsername(username.to_string()))
            .await
    }

    /// GET with retries on network failures and 5xx responses
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let mut attempt = 1;
        loop {
            let result = self.send::<()>(endpoint, None, None).await;
            match result.and_then(|text| decode(&text)) {
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    tracing::debug!(
                        endpoint = endpoint.name(),
                        attempt,
                        "Request failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// POST once; never retried so a submission cannot be duplicated
    async fn post_json<B, T>(&self, endpoint: &Endpoint, body: &B, token: Option<&str>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        decode(&self.send(endpoint, Some(body), token).await?)
    }

    /// POST once and accept any 2xx body. The request has already taken
    /// effect, so an empty or non-JSON body reads as `Value::Null`.
    async fn post_value<B>(
        &self,
        endpoint: &Endpoint,
        body: &B,
        token: Option<&str>,
    ) -> Result<serde_json::Value>
    where
        B: Serialize + ?Sized,
    {
        let text = self.send(endpoint, Some(body), token).await?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::debug!(endpoint = endpoint.name(), "Response body is not JSON: {}", e);
            serde_json::Value::Null
        }))
    }

    /// Send the request and return the body of a 2xx response
    async fn send<B>(&self, endpoint: &Endpoint, body: Option<&B>, token: Option<&str>) -> Result<String>
    where
        B: Serialize + ?Sized,
    {
        if endpoint.requires_auth() && token.is_none() {
            return Err(Error::AuthRequired);
        }

        let url = endpoint.url(&self.base_url);
        tracing::debug!(endpoint = endpoint.name(), %url, "Sending request");

        let mut request = self.client.request(endpoint.method(), &url);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(endpoint = endpoint.name(), status = status.as_u16(), "Request rejected");
            return Err(Error::Http {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        Ok(text)
    }
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(Error::from)
}

/// Pull `message` out of an error body, if there is one
fn error_message(body: &str) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

impl FeedApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        self.post_json(&Endpoint::Login, request, None).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Option<User>> {
        let value = self.post_value(&Endpoint::Signup, request, None).await?;

        let user = value
            .get("user")
            .cloned()
            .and_then(|u| serde_json::from_value(u).ok())
            .or_else(|| serde_json::from_value(value).ok());
        Ok(user)
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        self.get_json(&Endpoint::ListPosts).await
    }

    async fn create_post(&self, token: &str, post: &NewPost) -> Result<CreatedPost> {
        let value = self
            .post_value(&Endpoint::CreatePost, post, Some(token))
            .await?;
        Ok(CreatedPost::from_value(value))
    }

    async fn get_post(&self, id: i64) -> Result<Post> {
        match self.get_json::<Post>(&Endpoint::GetPost(id)).await {
            Err(Error::Http { status: 404, .. }) => Err(Error::NotFound),
            other => other,
        }
    }

    async fn get_user(&self, id: &str) -> Result<User> {
        self.get_json(&Endpoint::GetUser(id.to_string())).await
    }
}
