//! Platform resource types
//!
//! Only the fields the CLI reads are modelled; everything else in the
//! platform's JSON is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// One page of a list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub next: Option<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub href: String,
}

/// `{"data": {"guid": "..."}}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relationship {
    pub data: Option<GuidRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuidRef {
    pub guid: String,
}

impl Relationship {
    pub fn guid(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.guid.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organization {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Space {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrganizationQuota {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct App {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Domain {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub relationships: DomainRelationships,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DomainRelationships {
    #[serde(default)]
    pub organization: Option<Relationship>,
}

impl Domain {
    /// Private domains are owned by an organization; shared domains are not
    pub fn is_private(&self) -> bool {
        self.relationships
            .organization
            .as_ref()
            .and_then(Relationship::guid)
            .is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub guid: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// State reported for the most recent broker operation on a resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LastOperation {
    #[serde(rename = "type")]
    pub kind: String,
    pub state: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl LastOperation {
    /// Rendered as "delete in progress", "create succeeded", ...
    pub fn summary(&self) -> String {
        format!("{} {}", self.kind, self.state)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceInfo {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceInstance {
    pub guid: String,
    pub name: String,
    #[serde(rename = "type", default = "default_instance_type")]
    pub instance_type: String,
    #[serde(default)]
    pub last_operation: Option<LastOperation>,
    #[serde(default)]
    pub upgrade_available: bool,
    #[serde(default)]
    pub maintenance_info: Option<MaintenanceInfo>,
}

fn default_instance_type() -> String {
    "managed".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceOffering {
    pub guid: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServicePlan {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub maintenance_info: Option<MaintenanceInfo>,
}

/// Service key (`type = "key"`) or app binding (`type = "app"`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceCredentialBinding {
    pub guid: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub binding_type: String,
    #[serde(default)]
    pub last_operation: Option<LastOperation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceRouteBinding {
    pub guid: String,
    #[serde(default)]
    pub last_operation: Option<LastOperation>,
}

/// Platform job tracking an asynchronous mutation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub guid: String,
    #[serde(default)]
    pub operation: String,
    pub state: JobState,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(default)]
    pub warnings: Vec<JobWarning>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    /// The platform itself is still working
    Processing,
    /// Handed to an asynchronous broker; the platform is polling it
    Polling,
    Complete,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Complete | JobState::Failed)
    }
}

impl Job {
    /// First error detail, or a generic message naming the job
    pub fn failure_message(&self) -> String {
        self.errors
            .first()
            .map(|e| e.detail.clone())
            .unwrap_or_else(|| format!("Job ({}) failed", self.guid))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobWarning {
    pub detail: String,
}

/// Entry of the platform error envelope `{"errors": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}
