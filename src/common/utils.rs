use tracing::info;

use crate::common::errors::Error;

const SUFFIX_LEN: usize = 8;
const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Reuses the event's physical id, or builds `<stack name>_<logical id>_<suffix>`.
pub fn resolve_physical_resource_id(
    physical_resource_id: Option<&str>,
    stack_id: &str,
    logical_resource_id: &str,
) -> Result<String, Error> {
    if let Some(id) = physical_resource_id {
        info!("PhysicalResourceId present in event, using it for the response");
        return Ok(id.to_string());
    }

    info!("No PhysicalResourceId in event, generating one");
    let stack_name = stack_id
        .split('/')
        .nth(1)
        .ok_or_else(|| Error::MalformedStackId(stack_id.to_string()))?;

    Ok(format!(
        "{}_{}_{}",
        stack_name,
        logical_resource_id,
        rand_string(SUFFIX_LEN)
    ))
}

pub fn rand_string(len: usize) -> String {
    (0..len)
        .map(|_| SUFFIX_ALPHABET[fastrand::usize(..SUFFIX_ALPHABET.len())] as char)
        .collect()
}
