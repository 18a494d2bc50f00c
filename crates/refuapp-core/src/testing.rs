// Scripted transport shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use refuapp_api::{Endpoints, Reply, Request, Transport, Unreachable};
use serde_json::{Value, json};
use url::Url;

use crate::service::Session;
use crate::store::{KeyValueStore, MemoryStore};

/// Replays a fixed script of outcomes, repeating the last one, and
/// records every request it sees.
pub(crate) struct Script {
    outcomes: Mutex<VecDeque<Result<Reply, Unreachable>>>,
    requests: Mutex<Vec<Request>>,
    calls: AtomicUsize,
}

impl Script {
    pub(crate) fn new(outcomes: Vec<Result<Reply, Unreachable>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for Script {
    async fn send(&self, request: Request) -> Result<Reply, Unreachable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.len() > 1 {
            outcomes.pop_front().unwrap()
        } else {
            outcomes.front().cloned().unwrap()
        }
    }
}

pub(crate) fn session(transport: Arc<Script>) -> Session {
    session_with_store(transport, Arc::new(MemoryStore::new()))
}

pub(crate) fn session_with_store(
    transport: Arc<Script>,
    store: Arc<dyn KeyValueStore>,
) -> Session {
    let endpoints = Endpoints::new(&Url::parse("http://registry.test").unwrap()).unwrap();
    Session::new(transport, endpoints, store)
}

pub(crate) fn refuge_json(id: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "region": "Pirineu",
        "image": "no-photo.png",
        "altitude": 2100,
        "coordinates": { "latitude": 42.5, "longitude": 1.5 },
        "capacity": { "winter": 8, "summer": 24 }
    })
}

pub(crate) fn ok(body: Value) -> Result<Reply, Unreachable> {
    Ok(Reply::Success(body))
}

pub(crate) fn fail(status: u16) -> Result<Reply, Unreachable> {
    Ok(Reply::Failure {
        status,
        body: Value::Null,
    })
}
