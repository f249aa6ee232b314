use tracing::info;

use crate::common::config::BucketConfig;
use crate::common::errors::Error;
use crate::common::storage::ObjectStore;
use crate::common::RequestType;

const PUBLIC_RESEARCH_KEYS: &[&str] = &[
    "global/document1.txt",
    "global/northamer/document1-northamer.txt",
    "global/northamer/document2-northamer.txt",
    "global/southamer/document1-southamer.txt",
];

const SUBSCRIPTIONS_KEYS: &[&str] = &[
    "historical/2018/indices/index1-2018.txt",
    "historical/2018/indices/index2-2018.txt",
    "historical/2018/equities/equity1-2018.txt",
    "historical/2019/credit/credit1-2019.txt",
    "historical/2019/equities/equity1-2019.txt",
    "historical/2019/equities/equity2-2019.txt",
    "historical/2019/indices/index1-2019.txt",
    "historical/2019/indices/index2-2019.txt",
    "historical/2019/indices/index3-2019.txt",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub bucket: String,
    pub key: &'static str,
}

/// The placeholder objects, in the order they are written and deleted.
pub fn manifest(buckets: &BucketConfig) -> Vec<ManifestEntry> {
    let public_research = PUBLIC_RESEARCH_KEYS.iter().map(|&key| ManifestEntry {
        bucket: buckets.public_research.clone(),
        key,
    });
    let subscriptions = SUBSCRIPTIONS_KEYS.iter().map(|&key| ManifestEntry {
        bucket: buckets.subscriptions.clone(),
        key,
    });

    public_research.chain(subscriptions).collect()
}

pub fn placeholder_text(stack_id: &str) -> String {
    format!(
        "Test data generated by CloudFormation stack {stack_id}. \
         These objects will be automatically deleted on stack cleanup."
    )
}

/// Writes or removes every manifest entry, stopping at the first storage error.
pub async fn apply<S: ObjectStore>(
    store: &S,
    buckets: &BucketConfig,
    request_type: RequestType,
    stack_id: &str,
) -> Result<(), Error> {
    match request_type {
        RequestType::Create => {
            let text = placeholder_text(stack_id);
            for entry in manifest(buckets) {
                info!("Putting data to s3://{}/{}", entry.bucket, entry.key);
                store
                    .put_object(&entry.bucket, entry.key, text.clone())
                    .await?;
            }
        }
        RequestType::Delete => {
            for entry in manifest(buckets) {
                info!("Deleting s3://{}/{}", entry.bucket, entry.key);
                store.delete_object(&entry.bucket, entry.key).await?;
            }
        }
        RequestType::Update => info!("Update leaves the placeholder objects untouched"),
    }

    Ok(())
}
