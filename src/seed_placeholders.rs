use std::collections::BTreeMap;

use aws_config::BehaviorVersion;
use lambda_runtime::{run, service_fn, Error as LambdaError, LambdaEvent};
use serde_json::Value;
use tracing::field::{display, Empty};
use tracing::{debug, error, info, Span};

mod common;
use crate::common::callback::{send_response, CallbackTransport, HttpTransport, StatusResponse};
use crate::common::config::{BucketConfig, RetryPolicy};
use crate::common::errors::Error;
use crate::common::event::RawEvent;
use crate::common::manifest;
use crate::common::storage::{ObjectStore, S3ObjectStore};
use crate::common::utils::resolve_physical_resource_id;
use crate::common::Status;

const FAILURE_REASON_PREFIX: &str = "Failed to process custom resource event";

async fn process<S: ObjectStore>(
    raw: &RawEvent,
    buckets: Result<BucketConfig, Error>,
    store: &S,
) -> Result<StatusResponse, Error> {
    let event = raw.validate()?;
    Span::current().record("request_type", display(event.request_type));

    let buckets = buckets?;
    manifest::apply(store, &buckets, event.request_type, &event.stack_id).await?;

    let physical_resource_id = resolve_physical_resource_id(
        event.physical_resource_id.as_deref(),
        &event.stack_id,
        &event.logical_resource_id,
    )?;

    info!("Sending SUCCESS response back to CloudFormation");
    Ok(StatusResponse {
        status: Status::Success,
        physical_resource_id: Some(physical_resource_id),
        stack_id: Some(event.stack_id),
        request_id: Some(event.request_id),
        logical_resource_id: Some(event.logical_resource_id),
        reason: String::new(),
        data: BTreeMap::new(),
    })
}

fn failed_response(raw: &RawEvent, reason: String) -> StatusResponse {
    let physical_resource_id = match (
        &raw.physical_resource_id,
        &raw.stack_id,
        &raw.logical_resource_id,
    ) {
        (Some(id), _, _) => Some(id.clone()),
        (None, Some(stack_id), Some(logical_resource_id)) => {
            resolve_physical_resource_id(None, stack_id, logical_resource_id).ok()
        }
        _ => None,
    };

    StatusResponse {
        status: Status::Failed,
        physical_resource_id,
        stack_id: raw.stack_id.clone(),
        request_id: raw.request_id.clone(),
        logical_resource_id: raw.logical_resource_id.clone(),
        reason,
        data: BTreeMap::new(),
    }
}

/// Handles one lifecycle event and reports exactly one status to CloudFormation.
#[tracing::instrument(skip_all, fields(lambda_request_id = %lambda_request_id, request_type = Empty))]
async fn handle_event<S: ObjectStore, T: CallbackTransport>(
    payload: Value,
    lambda_request_id: &str,
    buckets: Result<BucketConfig, Error>,
    store: &S,
    transport: &T,
    retry: Result<RetryPolicy, Error>,
) -> Result<Status, Error> {
    debug!("{}", payload);
    let raw = RawEvent::from_value(payload)?;
    let Some(response_url) = raw.response_url.clone() else {
        error!("Event has no ResponseURL, nothing to report to");
        return Err(Error::MissingField("ResponseURL"));
    };

    // An unusable retry setting is reported like any other config error,
    // sent with the default policy.
    let (retry, outcome) = match retry {
        Ok(retry) => (retry, process(&raw, buckets, store).await),
        Err(err) => (RetryPolicy::default(), Err(err)),
    };

    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            let msg = format!("{FAILURE_REASON_PREFIX}: {err}");
            error!("{msg}");
            failed_response(&raw, msg)
        }
    };

    let status = response.status;
    let attempts = send_response(transport, &retry, &response_url, &response).await?;
    info!("Reported {:?} after {} attempt(s)", status, attempts);

    Ok(status)
}

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .without_time() // CloudWatch will add the ingestion time
        .with_target(false)
        .init();

    let aws_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let store = S3ObjectStore::new(aws_sdk_s3::Client::new(&aws_config));
    let transport = HttpTransport::new(reqwest::Client::new());

    let (store, transport) = (&store, &transport);
    run(service_fn(move |event: LambdaEvent<Value>| async move {
        let (payload, context) = event.into_parts();
        handle_event(
            payload,
            &context.request_id,
            BucketConfig::from_env(),
            store,
            transport,
            RetryPolicy::from_env(),
        )
        .await?;

        Ok::<(), LambdaError>(())
    }))
    .await
}
