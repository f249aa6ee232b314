use std::time::Duration;

use crate::common::errors::Error;

pub const PUBLIC_RESEARCH_BUCKET_VAR: &str = "public_research";
pub const SUBSCRIPTIONS_BUCKET_VAR: &str = "subscriptions";
pub const RETRY_DELAY_VAR: &str = "CALLBACK_RETRY_DELAY_SECS";
pub const MAX_ATTEMPTS_VAR: &str = "CALLBACK_MAX_ATTEMPTS";

const RETRY_DELAY_DEFAULT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketConfig {
    pub public_research: String,
    pub subscriptions: String,
}

impl BucketConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        Ok(Self {
            public_research: required(&lookup, PUBLIC_RESEARCH_BUCKET_VAR)?,
            subscriptions: required(&lookup, SUBSCRIPTIONS_BUCKET_VAR)?,
        })
    }
}

/// How the callback reporter retries a PUT that failed at the transport level.
///
/// `max_attempts: None` keeps retrying until the host kills the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delay: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay: RETRY_DELAY_DEFAULT,
            max_attempts: None,
        }
    }
}

impl RetryPolicy {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let delay = match optional(&lookup, RETRY_DELAY_VAR) {
            Some(raw) => Duration::from_secs(parse_u64(RETRY_DELAY_VAR, &raw)?),
            None => RETRY_DELAY_DEFAULT,
        };

        let max_attempts = match optional(&lookup, MAX_ATTEMPTS_VAR) {
            Some(raw) => match parse_u64(MAX_ATTEMPTS_VAR, &raw)? {
                0 => None,
                n => Some(u32::try_from(n).map_err(|_| Error::InvalidConfig {
                    name: MAX_ATTEMPTS_VAR,
                    reason: format!("{n} is too large"),
                })?),
            },
            None => None,
        };

        Ok(Self {
            delay,
            max_attempts,
        })
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, Error> {
    optional(lookup, name).ok_or(Error::MissingConfig { name })
}

fn parse_u64(name: &'static str, raw: &str) -> Result<u64, Error> {
    raw.parse().map_err(|_| Error::InvalidConfig {
        name,
        reason: format!("expected an unsigned integer, got {raw:?}"),
    })
}
