//! Scripted in-memory transport
//!
//! Replies are queued per `(method, path)`. The last reply of a queue is
//! sticky so polling loops keep receiving it. Every call is logged,
//! including ones without a scripted reply, so tests can assert that a
//! request was (or was not) issued.

use async_trait::async_trait;
use http::{Method, StatusCode};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::{ClientError, ClientResult, HttpClient, Session};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(StatusCode, String),
}

/// A recorded request
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// Scripted [`HttpClient`]
#[derive(Debug, Default)]
pub struct MockHttpClient {
    replies: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    delays: Mutex<HashMap<(Method, String), Duration>>,
    calls: Mutex<Vec<Call>>,
    session: Session,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    fn key(method: Method, path: &str) -> (Method, String) {
        (method, path.trim_start_matches('/').to_string())
    }

    /// Queue a JSON reply
    pub fn on(&self, method: Method, path: &str, reply: Value) -> &Self {
        self.replies
            .lock()
            .entry(Self::key(method, path))
            .or_default()
            .push_back(Reply::Json(reply));
        self
    }

    /// Queue a non-success status
    pub fn fail(&self, method: Method, path: &str, status: StatusCode, message: &str) -> &Self {
        self.replies
            .lock()
            .entry(Self::key(method, path))
            .or_default()
            .push_back(Reply::Status(status, message.to_string()));
        self
    }

    /// Hold every reply on this route for `delay`
    pub fn delay(&self, method: Method, path: &str, delay: Duration) -> &Self {
        self.delays.lock().insert(Self::key(method, path), delay);
        self
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    /// Recorded calls to one route
    pub fn calls_to(&self, method: Method, path: &str) -> Vec<Call> {
        let (method, path) = Self::key(method, path);
        self.calls
            .lock()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .cloned()
            .collect()
    }

    /// Number of calls with a given method
    pub fn count(&self, method: Method) -> usize {
        self.calls.lock().iter().filter(|c| c.method == method).count()
    }

    /// Forget the call log
    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let key = Self::key(method, path);
        self.calls.lock().push(Call {
            method: key.0.clone(),
            path: key.1.clone(),
            body,
        });

        let delay = self.delays.lock().get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = {
            let mut replies = self.replies.lock();
            match replies.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Json(value)) => Ok(serde_json::from_value(value)?),
            Some(Reply::Status(status, message)) => Err(ClientError::from_status(status, message)),
            None => Err(ClientError::NotFound(format!(
                "no scripted reply for {} /{}",
                key.0, key.1
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.dispatch(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.dispatch(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.dispatch(Method::PUT, path, Some(body)).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        self.dispatch(Method::PATCH, path, Some(body)).await
    }

    fn session(&self) -> &Session {
        &self.session
    }
}
