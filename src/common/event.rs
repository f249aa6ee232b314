use serde::Deserialize;
use serde_json::Value;

use crate::common::errors::Error;
use crate::common::RequestType;

/// CloudFormation custom resource request exactly as delivered, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawEvent {
    pub request_type: Option<String>,
    pub stack_id: Option<String>,
    pub logical_resource_id: Option<String>,
    pub request_id: Option<String>,
    #[serde(rename = "ResponseURL")]
    pub response_url: Option<String>,
    pub physical_resource_id: Option<String>,
}

/// A request that carries everything needed to process it. `ResponseURL` is
/// checked separately since a request without one cannot be answered at all.
#[derive(Debug, Clone)]
pub struct CustomResourceEvent {
    pub request_type: RequestType,
    pub stack_id: String,
    pub logical_resource_id: String,
    pub request_id: String,
    pub physical_resource_id: Option<String>,
}

impl RawEvent {
    pub fn from_value(value: Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn validate(&self) -> Result<CustomResourceEvent, Error> {
        let request_type = required(&self.request_type, "RequestType")?;
        let request_type = request_type.parse()?;

        Ok(CustomResourceEvent {
            request_type,
            stack_id: required(&self.stack_id, "StackId")?,
            logical_resource_id: required(&self.logical_resource_id, "LogicalResourceId")?,
            request_id: required(&self.request_id, "RequestId")?,
            physical_resource_id: self.physical_resource_id.clone(),
        })
    }
}

fn required(field: &Option<String>, name: &'static str) -> Result<String, Error> {
    field.clone().ok_or(Error::MissingField(name))
}
