//! Explicit per-invocation context
//!
//! A [`Session`] bundles the API client, the acting user and the targeted
//! org/space. Command handlers receive it as an argument instead of reading
//! shared configuration.

use crate::client::PlatformClient;
use crate::config::{Profile, Target};
use crate::error::{CoreError, Result};

/// Name and guid of a targeted org or space
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRef {
    pub name: String,
    pub guid: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    client: PlatformClient,
    username: String,
    target: Target,
}

impl Session {
    pub fn new(client: PlatformClient, username: &str, target: Target) -> Self {
        Self {
            client,
            username: username.to_string(),
            target,
        }
    }

    /// Build a session from a profile, optionally overriding its token
    ///
    /// `${VAR}` references in the profile are resolved here.
    pub fn from_profile(profile: &Profile, token: Option<&str>) -> Result<Self> {
        let profile = profile.expanded();
        let client = PlatformClient::new(
            &profile.api_url,
            token.unwrap_or(&profile.token),
            profile.skip_ssl_validation,
        )?;
        Ok(Self::new(client, &profile.username, profile.target.clone()))
    }

    pub fn client(&self) -> &PlatformClient {
        &self.client
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Targeted org, or an error telling the user how to target one
    pub fn require_org(&self) -> Result<TargetRef> {
        match (&self.target.org_name, &self.target.org_guid) {
            (Some(name), Some(guid)) => Ok(TargetRef {
                name: name.clone(),
                guid: guid.clone(),
            }),
            _ => Err(CoreError::NoTarget {
                kind: "org",
                article: "an",
                hint: "cf target -o ORG",
            }),
        }
    }

    /// Targeted org and space
    pub fn require_space(&self) -> Result<(TargetRef, TargetRef)> {
        let org = self.require_org()?;
        match (&self.target.space_name, &self.target.space_guid) {
            (Some(name), Some(guid)) => Ok((
                org,
                TargetRef {
                    name: name.clone(),
                    guid: guid.clone(),
                },
            )),
            _ => Err(CoreError::NoTarget {
                kind: "space",
                article: "a",
                hint: "cf target -s SPACE",
            }),
        }
    }
}
