//! Typed platform endpoints
//!
//! Lookups return `Ok(None)` when the platform has no matching resource so
//! callers can apply their own not-found policy.

use serde_json::{Value, json};

use crate::client::{MutationResponse, PlatformClient};
use crate::error::{CoreError, Result};
use crate::resources::{
    App, Domain, Organization, OrganizationQuota, Relationship, Route, ServiceCredentialBinding,
    ServiceInstance, ServiceOffering, ServicePlan, ServiceRouteBinding, Space,
};

impl PlatformClient {
    // ------------------------------------------------------------------
    // Orgs, spaces, quotas, domains, routes, apps
    // ------------------------------------------------------------------

    pub async fn find_organization(&self, name: &str) -> Result<Option<Organization>> {
        self.find_one("/v3/organizations", &[("names", name)]).await
    }

    pub async fn find_space(&self, org_guid: &str, name: &str) -> Result<Option<Space>> {
        self.find_one(
            "/v3/spaces",
            &[("names", name), ("organization_guids", org_guid)],
        )
        .await
    }

    pub async fn delete_space(&self, guid: &str) -> Result<MutationResponse> {
        self.delete(&format!("/v3/spaces/{}", guid), &[]).await
    }

    pub async fn find_organization_quota(&self, name: &str) -> Result<Option<OrganizationQuota>> {
        self.find_one("/v3/organization_quotas", &[("names", name)])
            .await
    }

    pub async fn delete_organization_quota(&self, guid: &str) -> Result<MutationResponse> {
        self.delete(&format!("/v3/organization_quotas/{}", guid), &[])
            .await
    }

    pub async fn find_domain(&self, name: &str) -> Result<Option<Domain>> {
        self.find_one("/v3/domains", &[("names", name)]).await
    }

    pub async fn delete_domain(&self, guid: &str) -> Result<MutationResponse> {
        self.delete(&format!("/v3/domains/{}", guid), &[]).await
    }

    /// Route on `domain_guid` with exactly this host and path
    pub async fn find_route(
        &self,
        domain_guid: &str,
        host: &str,
        path: &str,
    ) -> Result<Option<Route>> {
        self.find_one(
            "/v3/routes",
            &[("domain_guids", domain_guid), ("hosts", host), ("paths", path)],
        )
        .await
    }

    /// Delete every route in the space that is not mapped to an app
    pub async fn delete_unmapped_routes(&self, space_guid: &str) -> Result<MutationResponse> {
        self.delete(
            &format!("/v3/spaces/{}/routes", space_guid),
            &[("unmapped", "true")],
        )
        .await
    }

    pub async fn find_app(&self, space_guid: &str, name: &str) -> Result<Option<App>> {
        self.find_one("/v3/apps", &[("names", name), ("space_guids", space_guid)])
            .await
    }

    // ------------------------------------------------------------------
    // Service instances
    // ------------------------------------------------------------------

    pub async fn find_service_instance(
        &self,
        space_guid: &str,
        name: &str,
    ) -> Result<Option<ServiceInstance>> {
        self.find_one(
            "/v3/service_instances",
            &[("names", name), ("space_guids", space_guid)],
        )
        .await
    }

    pub async fn list_service_instances(&self, space_guid: &str) -> Result<Vec<ServiceInstance>> {
        self.list(
            "/v3/service_instances",
            &[("space_guids", space_guid), ("order_by", "name")],
        )
        .await
    }

    pub async fn find_service_offering(&self, name: &str) -> Result<Option<ServiceOffering>> {
        self.find_one("/v3/service_offerings", &[("names", name)])
            .await
    }

    pub async fn find_service_plan(
        &self,
        offering_guid: &str,
        name: &str,
    ) -> Result<Option<ServicePlan>> {
        self.find_one(
            "/v3/service_plans",
            &[("names", name), ("service_offering_guids", offering_guid)],
        )
        .await
    }

    pub async fn create_service_instance(
        &self,
        name: &str,
        space_guid: &str,
        plan_guid: &str,
        parameters: Option<&Value>,
    ) -> Result<MutationResponse> {
        let mut body = json!({
            "type": "managed",
            "name": name,
            "relationships": {
                "space": {"data": {"guid": space_guid}},
                "service_plan": {"data": {"guid": plan_guid}},
            },
        });
        if let Some(params) = parameters {
            body["parameters"] = params.clone();
        }
        self.post("/v3/service_instances", &body).await
    }

    pub async fn delete_service_instance(&self, guid: &str) -> Result<MutationResponse> {
        self.delete(&format!("/v3/service_instances/{}", guid), &[])
            .await
    }

    /// Remove the instance and its bindings without contacting the broker
    pub async fn purge_service_instance(&self, guid: &str) -> Result<MutationResponse> {
        self.delete(
            &format!("/v3/service_instances/{}", guid),
            &[("purge", "true")],
        )
        .await
    }

    /// Move the instance to the plan's current maintenance version
    pub async fn upgrade_service_instance(
        &self,
        guid: &str,
        maintenance_version: &str,
    ) -> Result<MutationResponse> {
        let body = json!({"maintenance_info": {"version": maintenance_version}});
        self.patch(&format!("/v3/service_instances/{}", guid), &body)
            .await
    }

    /// Plan backing an instance; carries the maintenance version to upgrade to
    pub async fn service_instance_plan(&self, instance_guid: &str) -> Result<ServicePlan> {
        let relationship: Relationship = self
            .get(
                &format!(
                    "/v3/service_instances/{}/relationships/service_plan",
                    instance_guid
                ),
                &[],
            )
            .await?;

        let plan_guid = relationship.guid().ok_or_else(|| CoreError::NotFound {
            message: format!("Service instance {} has no service plan", instance_guid),
        })?;

        self.get(&format!("/v3/service_plans/{}", plan_guid), &[])
            .await
    }

    // ------------------------------------------------------------------
    // Credential bindings: service keys and app bindings
    // ------------------------------------------------------------------

    pub async fn find_service_key(
        &self,
        instance_guid: &str,
        name: &str,
    ) -> Result<Option<ServiceCredentialBinding>> {
        self.find_one(
            "/v3/service_credential_bindings",
            &[
                ("type", "key"),
                ("names", name),
                ("service_instance_guids", instance_guid),
            ],
        )
        .await
    }

    pub async fn list_service_keys(
        &self,
        instance_guid: &str,
    ) -> Result<Vec<ServiceCredentialBinding>> {
        self.list(
            "/v3/service_credential_bindings",
            &[("type", "key"), ("service_instance_guids", instance_guid)],
        )
        .await
    }

    pub async fn create_service_key(
        &self,
        instance_guid: &str,
        name: &str,
        parameters: Option<&Value>,
    ) -> Result<MutationResponse> {
        let mut body = json!({
            "type": "key",
            "name": name,
            "relationships": {
                "service_instance": {"data": {"guid": instance_guid}},
            },
        });
        if let Some(params) = parameters {
            body["parameters"] = params.clone();
        }
        self.post("/v3/service_credential_bindings", &body).await
    }

    /// Credentials and binding-specific details of a service key
    pub async fn service_key_details(&self, guid: &str) -> Result<Value> {
        self.get(
            &format!("/v3/service_credential_bindings/{}/details", guid),
            &[],
        )
        .await
    }

    pub async fn find_app_binding(
        &self,
        app_guid: &str,
        instance_guid: &str,
    ) -> Result<Option<ServiceCredentialBinding>> {
        self.find_one(
            "/v3/service_credential_bindings",
            &[
                ("type", "app"),
                ("app_guids", app_guid),
                ("service_instance_guids", instance_guid),
            ],
        )
        .await
    }

    pub async fn create_app_binding(
        &self,
        app_guid: &str,
        instance_guid: &str,
        binding_name: Option<&str>,
        parameters: Option<&Value>,
    ) -> Result<MutationResponse> {
        let mut body = json!({
            "type": "app",
            "relationships": {
                "app": {"data": {"guid": app_guid}},
                "service_instance": {"data": {"guid": instance_guid}},
            },
        });
        if let Some(name) = binding_name {
            body["name"] = json!(name);
        }
        if let Some(params) = parameters {
            body["parameters"] = params.clone();
        }
        self.post("/v3/service_credential_bindings", &body).await
    }

    pub async fn delete_credential_binding(&self, guid: &str) -> Result<MutationResponse> {
        self.delete(&format!("/v3/service_credential_bindings/{}", guid), &[])
            .await
    }

    // ------------------------------------------------------------------
    // Route bindings
    // ------------------------------------------------------------------

    pub async fn find_route_binding(
        &self,
        route_guid: &str,
        instance_guid: &str,
    ) -> Result<Option<ServiceRouteBinding>> {
        self.find_one(
            "/v3/service_route_bindings",
            &[
                ("route_guids", route_guid),
                ("service_instance_guids", instance_guid),
            ],
        )
        .await
    }

    pub async fn delete_route_binding(&self, guid: &str) -> Result<MutationResponse> {
        self.delete(&format!("/v3/service_route_bindings/{}", guid), &[])
            .await
    }
}
