use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::common::callback::CallbackTransport;
use crate::common::config::BucketConfig;
use crate::common::errors::Error;
use crate::common::storage::ObjectStore;

pub const STACK_ID: &str =
    "arn:aws:cloudformation:us-east-1:123456789012:stack/MyStack/5b9c2a30-0b1d-11ea-8d71-362b9e155667";

pub fn buckets() -> BucketConfig {
    BucketConfig {
        public_research: "research-bucket".into(),
        subscriptions: "subs-bucket".into(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Put { bucket: String, key: String },
    Delete { bucket: String, key: String },
}

/// In-memory object store; `fail_on` makes the n-th call (1-based) return an access error.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<(String, String), String>>,
    calls: Mutex<Vec<StoreCall>>,
    fail_on: Option<usize>,
}

impl MemoryStore {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Default::default()
        }
    }

    pub fn insert(&self, bucket: &str, key: &str, body: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.into(), key.into()), body.into());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> bool {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        self.fail_on == Some(calls.len())
    }
}

impl ObjectStore for MemoryStore {
    async fn put_object(&self, bucket: &str, key: &str, body: String) -> Result<(), Error> {
        let call = StoreCall::Put {
            bucket: bucket.into(),
            key: key.into(),
        };
        if self.record(call) {
            return Err(Error::PutObject {
                bucket: bucket.into(),
                key: key.into(),
                message: "AccessDenied: Access Denied".into(),
            });
        }

        self.objects
            .lock()
            .unwrap()
            .insert((bucket.into(), key.into()), body);
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        let call = StoreCall::Delete {
            bucket: bucket.into(),
            key: key.into(),
        };
        if self.record(call) {
            return Err(Error::DeleteObject {
                bucket: bucket.into(),
                key: key.into(),
                message: "NoSuchBucket: The specified bucket does not exist".into(),
            });
        }

        self.objects
            .lock()
            .unwrap()
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

/// Callback transport that fails the first `failures` PUTs, then answers 200.
pub struct ScriptedTransport {
    failures: usize,
    sent: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn failing_first(failures: usize) -> Self {
        Self {
            failures,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn attempts(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn bodies(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Last body sent, parsed as JSON.
    pub fn last_body(&self) -> serde_json::Value {
        let sent = self.sent.lock().unwrap();
        let (_, body) = sent.last().expect("at least one callback attempt");
        serde_json::from_str(body).expect("callback body is json")
    }
}

impl CallbackTransport for ScriptedTransport {
    async fn put(&self, url: &str, body: &str) -> Result<u16, Error> {
        let attempt = {
            let mut sent = self.sent.lock().unwrap();
            sent.push((url.into(), body.into()));
            sent.len()
        };

        if attempt <= self.failures {
            return Err(Error::Callback(format!(
                "error sending request for url ({url}): connection refused"
            )));
        }
        Ok(200)
    }
}
