use std::collections::BTreeMap;
use std::future::Future;

use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::common::config::RetryPolicy;
use crate::common::errors::Error;
use crate::common::Status;

/// Body PUT to the CloudFormation response URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusResponse {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logical_resource_id: Option<String>,
    pub reason: String,
    pub data: BTreeMap<String, Value>,
}

pub trait CallbackTransport {
    /// Sends one PUT and yields the HTTP status code of whatever came back.
    fn put(&self, url: &str, body: &str) -> impl Future<Output = Result<u16, Error>> + Send;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl CallbackTransport for HttpTransport {
    async fn put(&self, url: &str, body: &str) -> Result<u16, Error> {
        let response = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "")
            .header(CONTENT_LENGTH, body.len().to_string())
            .body(body.to_string())
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}

/// Serializes `body`, falling back to a bare FAILED record when that is impossible.
pub fn encode_body<T: Serialize>(body: &T) -> String {
    match serde_json::to_string(body) {
        Ok(val) => val,
        Err(err) => {
            let msg = format!("Failed to convert response to json: {err}");
            error!("{msg}");
            json!({
                "Status": Status::Failed,
                "Data": {},
                "Reason": msg,
            })
            .to_string()
        }
    }
}

/// PUTs `body` to `response_url` until some response arrives, returning the attempt count.
pub async fn send_response<T: CallbackTransport, B: Serialize>(
    transport: &T,
    retry: &RetryPolicy,
    response_url: &str,
    body: &B,
) -> Result<u32, Error> {
    let body = encode_body(body);
    debug!("CFN response URL: {}", response_url);
    debug!("{}", body);

    let mut attempts = 0;
    loop {
        attempts += 1;
        match transport.put(response_url, &body).await {
            Ok(status) => {
                info!("CloudFormation returned status code: {status}");
                return Ok(attempts);
            }
            Err(err) => {
                error!("Unexpected failure sending response to CloudFormation: {err}");
                if retry.max_attempts.is_some_and(|max| attempts >= max) {
                    return Err(Error::CallbackRetriesExhausted { attempts });
                }
                tokio::time::sleep(retry.delay).await;
            }
        }
    }
}
