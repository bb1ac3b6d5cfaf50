//! Endpoint table for the campus feed REST API

use reqwest::Method;

/// Every call the client makes against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// POST /api/user/login
    Login,
    /// POST /api/user/signup
    Signup,
    /// GET /api/user
    ListUsers,
    /// GET /api/user/{id}
    GetUser(String),
    /// GET /api/user/username/{username}
    GetUserByUsername(String),
    /// GET /api/post
    ListPosts,
    /// POST /api/post
    CreatePost,
    /// GET /api/post/{id}
    GetPost(i64),
}

impl Endpoint {
    /// HTTP method
    pub fn method(&self) -> Method {
        match self {
            Self::Login | Self::Signup | Self::CreatePost => Method::POST,
            _ => Method::GET,
        }
    }

    /// Whether a bearer token must accompany the request
    pub const fn requires_auth(&self) -> bool {
        matches!(self, Self::CreatePost)
    }

    /// Path relative to the base URL
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/api/user/login".to_string(),
            Self::Signup => "/api/user/signup".to_string(),
            Self::ListUsers => "/api/user".to_string(),
            Self::GetUser(id) => format!("/api/user/{}", urlencoding::encode(id)),
            Self::GetUserByUsername(name) => {
                format!("/api/user/username/{}", urlencoding::encode(name))
            }
            Self::ListPosts | Self::CreatePost => "/api/post".to_string(),
            Self::GetPost(id) => format!("/api/post/{id}"),
        }
    }

    /// Full URL against `base_url`
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }

    /// Short name used in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::ListUsers => "list_users",
            Self::GetUser(_) => "get_user",
            Self::GetUserByUsername(_) => "get_user_by_username",
            Self::ListPosts => "list_posts",
            Self::CreatePost => "create_post",
            Self::GetPost(_) => "get_post",
        }
    }
}
