//! Shared test utilities for the search clients.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use gclusters_types::error::{GcError, Result};

use crate::transport::JsonTransport;

/// A request seen by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

enum Reply {
    Json(Value),
    Fail(String),
}

struct Route {
    needle: String,
    delay: Duration,
    replies: VecDeque<Reply>,
}

/// Transport answering from canned replies.
///
/// A route matches when its needle is a substring of the request URL. Each
/// route hands out its replies in order and repeats the last one. Requests
/// with no matching route fail.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<Recorded>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, needle: &str, body: Value) -> Self {
        self.push(needle, Duration::ZERO, Reply::Json(body))
    }

    pub fn reply_after(self, needle: &str, delay: Duration, body: Value) -> Self {
        self.push(needle, delay, Reply::Json(body))
    }

    pub fn fail(self, needle: &str, message: &str) -> Self {
        self.push(needle, Duration::ZERO, Reply::Fail(message.to_string()))
    }

    fn push(self, needle: &str, delay: Duration, reply: Reply) -> Self {
        {
            let mut routes = self.routes.lock().unwrap();
            if let Some(route) = routes.iter_mut().find(|r| r.needle == needle) {
                route.replies.push_back(reply);
            } else {
                routes.push(Route {
                    needle: needle.to_string(),
                    delay,
                    replies: VecDeque::from([reply]),
                });
            }
        }
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    async fn answer(&self, method: &'static str, url: &str, body: Option<&Value>) -> Result<Value> {
        self.requests.lock().unwrap().push(Recorded {
            method,
            url: url.to_string(),
            body: body.cloned(),
        });

        let (delay, reply) = {
            let mut routes = self.routes.lock().unwrap();
            let Some(route) = routes.iter_mut().find(|r| url.contains(&r.needle)) else {
                return Err(GcError::Http(format!("no route for {url}")));
            };
            let reply = if route.replies.len() > 1 {
                route.replies.pop_front()
            } else {
                route.replies.front().map(|r| match r {
                    Reply::Json(v) => Reply::Json(v.clone()),
                    Reply::Fail(m) => Reply::Fail(m.clone()),
                })
            };
            (route.delay, reply)
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(Reply::Json(v)) => Ok(v),
            Some(Reply::Fail(m)) => Err(GcError::Http(m)),
            None => Err(GcError::Http(format!("no reply for {url}"))),
        }
    }
}

#[async_trait]
impl JsonTransport for MockTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        self.answer("GET", url, None).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        self.answer("POST", url, Some(body)).await
    }
}
