use std::future::Future;

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use crate::common::errors::Error;

pub trait ObjectStore {
    /// Writes `body` to `bucket/key`, replacing whatever is there.
    fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: String,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Removes `bucket/key`. Removing an absent key succeeds.
    fn delete_object(&self, bucket: &str, key: &str)
        -> impl Future<Output = Result<(), Error>> + Send;
}

pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: String) -> Result<(), Error> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body.into_bytes()))
            .send()
            .await
            .map(|_| ())
            .map_err(|err| Error::PutObject {
                bucket: bucket.into(),
                key: key.into(),
                message: DisplayErrorContext(&err).to_string(),
            })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> Result<(), Error> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| Error::DeleteObject {
                bucket: bucket.into(),
                key: key.into(),
                message: DisplayErrorContext(&err).to_string(),
            })
    }
}
