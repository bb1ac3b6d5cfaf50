//! Test utilities: a scripted in-memory [`FeedApi`]
//!
//! Responses are queued per operation. A queued response can be gated on a
//! oneshot channel so tests control the order in which concurrent calls
//! complete.

#![allow(missing_docs)]

use chrono::{Duration, TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tokio::sync::oneshot;

use crate::api::FeedApi;
use crate::error::{Error, Result};
use crate::models::{CreatedPost, LoginRequest, LoginResponse, NewPost, Post, SignupRequest, User};

/// A queued response, optionally held back until its gate opens
pub struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    response: Result<T>,
}

impl<T> Scripted<T> {
    /// Respond immediately
    pub const fn ready(response: Result<T>) -> Self {
        Self {
            gate: None,
            response,
        }
    }

    /// Respond once the returned sender fires
    pub fn gated(response: Result<T>) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                gate: Some(rx),
                response,
            },
            tx,
        )
    }

    async fn resolve(self) -> Result<T> {
        if let Some(gate) = self.gate {
            let _ = gate.await;
        }
        self.response
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scripted backend that records every call it receives
#[derive(Default)]
pub struct FakeApi {
    pub logins: Mutex<VecDeque<Scripted<LoginResponse>>>,
    pub signups: Mutex<VecDeque<Scripted<Option<User>>>>,
    pub lists: Mutex<VecDeque<Scripted<Vec<Post>>>>,
    pub creates: Mutex<VecDeque<Scripted<CreatedPost>>>,
    pub gets: Mutex<VecDeque<Scripted<Post>>>,
    pub users: Mutex<VecDeque<Scripted<User>>>,
    pub calls: Mutex<Vec<String>>,
    pub login_requests: Mutex<Vec<LoginRequest>>,
    pub created: Mutex<Vec<(String, NewPost)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_list(&self, scripted: Scripted<Vec<Post>>) {
        lock(&self.lists).push_back(scripted);
    }

    pub fn push_create(&self, scripted: Scripted<CreatedPost>) {
        lock(&self.creates).push_back(scripted);
    }

    pub fn push_get(&self, scripted: Scripted<Post>) {
        lock(&self.gets).push_back(scripted);
    }

    pub fn push_login(&self, scripted: Scripted<LoginResponse>) {
        lock(&self.logins).push_back(scripted);
    }

    pub fn push_signup(&self, scripted: Scripted<Option<User>>) {
        lock(&self.signups).push_back(scripted);
    }

    pub fn push_user(&self, scripted: Scripted<User>) {
        lock(&self.users).push_back(scripted);
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn next<T>(&self, name: &str, queue: &Mutex<VecDeque<Scripted<T>>>) -> Scripted<T> {
        lock(&self.calls).push(name.to_string());
        lock(queue).pop_front().unwrap_or_else(|| {
            Scripted::ready(Err(Error::Network(format!("no scripted response for {name}"))))
        })
    }
}

impl FeedApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        lock(&self.login_requests).push(request.clone());
        self.next("login", &self.logins).resolve().await
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<Option<User>> {
        self.next("signup", &self.signups).resolve().await
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        self.next("list_posts", &self.lists).resolve().await
    }

    async fn create_post(&self, token: &str, post: &NewPost) -> Result<CreatedPost> {
        lock(&self.created).push((token.to_string(), post.clone()));
        self.next("create_post", &self.creates).resolve().await
    }

    async fn get_post(&self, _id: i64) -> Result<Post> {
        self.next("get_post", &self.gets).resolve().await
    }

    async fn get_user(&self, _id: &str) -> Result<User> {
        self.next("get_user", &self.users).resolve().await
    }
}

/// A post with predictable fields; newer IDs are newer posts
pub fn post(id: i64, user_id: i64, content: &str) -> Post {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    Post {
        id,
        title: None,
        content: content.to_string(),
        user_id,
        created_at: base + Duration::minutes(id),
        user: None,
        likes: 0,
    }
}

/// A user with predictable fields
pub fn user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{name}@teknokrat.ac.id"),
        created_at: None,
    }
}

pub fn server_error() -> Error {
    Error::Http {
        status: 500,
        message: None,
    }
}
