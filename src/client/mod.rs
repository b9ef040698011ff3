// This file is part of the terraform-provider-remscontent project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typed client for the REMS REST API.
//!
//! Only the endpoints managed by the provider are covered. All commands are
//! JSON; REMS answers commands with `{"success": ..., "errors": [...]}`.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, trace};

use crate::utils::DisplayJoinable;

mod error;
pub mod model;

pub use error::RemsError;
use model::*;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("terraform-provider-remscontent/", env!("CARGO_PKG_VERSION"));

/// REMS content kinds sharing the `enabled`/`archived` endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Forms,
    Licenses,
    Workflows,
    Resources,
    CatalogueItems,
}

impl Kind {
    fn path(self) -> &'static str {
        match self {
            Kind::Forms => "forms",
            Kind::Licenses => "licenses",
            Kind::Workflows => "workflows",
            Kind::Resources => "resources",
            Kind::CatalogueItems => "catalogue-items",
        }
    }
}

/// Connection settings of a REMS instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Host name (`rems.example.org`) or base URL (`http://localhost:3000`).
    pub endpoint: String,
    pub user_id: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct RemsClient {
    http: Client,
    base_url: String,
    user_id: String,
    api_key: String,
}

/// Turn the configured endpoint into the base URL requests are built on.
///
/// A bare host name is reached over https. A trailing `/api` is dropped as
/// every path already starts with it.
pub fn base_url(endpoint: &str) -> Result<String, RemsError> {
    let invalid = |reason: &str| RemsError::InvalidEndpoint {
        endpoint: endpoint.to_owned(),
        reason: reason.to_owned(),
    };

    let trimmed = endpoint.trim();
    if trimmed.is_empty() {
        return Err(invalid("endpoint is empty"));
    }

    let (scheme, rest) = trimmed.split_once("://").unwrap_or(("https", trimmed));
    if !matches!(scheme, "http" | "https") {
        return Err(invalid(&format!(
            "unsupported scheme `{scheme}`, expected http or https"
        )));
    }

    let rest = rest.trim_end_matches('/');
    let rest = rest.strip_suffix("/api").unwrap_or(rest);
    if rest.is_empty() || rest.starts_with('/') {
        return Err(invalid("missing host"));
    }

    Ok(format!("{scheme}://{rest}"))
}

impl RemsClient {
    pub fn new(config: &ClientConfig) -> Result<Self, RemsError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url(&config.endpoint)?,
            user_id: config.user_id.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemsError> {
        self.execute(self.http.get(self.url(path)), path).await
    }

    /// `GET` an object whose id is free text, escaped as a single path segment.
    async fn get_by_name<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, RemsError> {
        let invalid = |reason: String| RemsError::InvalidEndpoint {
            endpoint: self.base_url.clone(),
            reason,
        };
        let mut url =
            Url::parse(&self.url(collection)).map_err(|err| invalid(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| invalid("cannot hold a path".to_owned()))?
            .push(id);

        self.execute(self.http.get(url), &format!("{collection}/{id}"))
            .await
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, RemsError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(
                body = %serde_json::to_string(body).unwrap_or_default(),
                "Request body"
            );
        }
        self.execute(self.http.request(method, self.url(path)).json(body), path)
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T, RemsError> {
        debug!(base_url = %self.base_url, path, "Sending request to REMS");

        let response = request
            .header("x-rems-user-id", &self.user_id)
            .header("x-rems-api-key", &self.api_key)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, path, "Received response from REMS");

        let body = response.text().await?;

        if !status.is_success() {
            return Err(match status.as_u16() {
                status @ (401 | 403) => RemsError::Unauthorized { status },
                404 => RemsError::NotFound(path.to_owned()),
                status => RemsError::Api {
                    status,
                    message: body,
                },
            });
        }

        trace!(body = %body, "Response body");

        serde_json::from_str(&body)
            .map_err(|err| RemsError::InvalidResponse(format!("{path}: {err}")))
    }

    async fn create<B: Serialize>(&self, path: &str, command: &B) -> Result<i64, RemsError> {
        let response: CreateResponse = self.send(Method::POST, path, command).await?;
        if !response.success {
            return Err(rejected(response.errors));
        }
        response
            .id
            .ok_or_else(|| RemsError::InvalidResponse(format!("{path}: no id in reply")))
    }

    async fn command<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        command: &B,
    ) -> Result<(), RemsError> {
        let response: SuccessResponse = self.send(method, path, command).await?;
        if response.success {
            Ok(())
        } else {
            Err(rejected(response.errors))
        }
    }

    #[instrument(skip(self))]
    pub async fn get_organization(&self, id: &str) -> Result<Organization, RemsError> {
        self.get_by_name("organizations", id).await
    }

    #[instrument(skip_all)]
    pub async fn create_form(&self, command: &FormCommand) -> Result<i64, RemsError> {
        self.create("forms/create", command).await
    }

    #[instrument(skip(self))]
    pub async fn get_form(&self, id: i64) -> Result<Form, RemsError> {
        self.get(&format!("forms/{id}")).await
    }

    #[instrument(skip_all, fields(id = command.id))]
    pub async fn edit_form(&self, command: &FormCommand) -> Result<(), RemsError> {
        self.command(Method::PUT, "forms/edit", command).await
    }

    #[instrument(skip_all)]
    pub async fn create_category(&self, command: &CategoryCommand) -> Result<i64, RemsError> {
        self.create("categories/create", command).await
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: i64) -> Result<Category, RemsError> {
        self.get(&format!("categories/{id}")).await
    }

    #[instrument(skip_all, fields(id = command.id))]
    pub async fn edit_category(&self, command: &CategoryCommand) -> Result<(), RemsError> {
        self.command(Method::PUT, "categories/edit", command).await
    }

    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: i64) -> Result<(), RemsError> {
        self.command(Method::POST, "categories/delete", &CategoryRef { id })
            .await
    }

    #[instrument(skip_all)]
    pub async fn create_license(&self, command: &CreateLicenseCommand) -> Result<i64, RemsError> {
        self.create("licenses/create", command).await
    }

    #[instrument(skip(self))]
    pub async fn get_license(&self, id: i64) -> Result<License, RemsError> {
        self.get(&format!("licenses/{id}")).await
    }

    #[instrument(skip_all)]
    pub async fn create_workflow(
        &self,
        command: &CreateWorkflowCommand,
    ) -> Result<i64, RemsError> {
        self.create("workflows/create", command).await
    }

    #[instrument(skip(self))]
    pub async fn get_workflow(&self, id: i64) -> Result<Workflow, RemsError> {
        self.get(&format!("workflows/{id}")).await
    }

    #[instrument(skip_all, fields(id = command.id))]
    pub async fn edit_workflow(&self, command: &EditWorkflowCommand) -> Result<(), RemsError> {
        self.command(Method::PUT, "workflows/edit", command).await
    }

    #[instrument(skip_all)]
    pub async fn create_resource(
        &self,
        command: &CreateResourceCommand,
    ) -> Result<i64, RemsError> {
        self.create("resources/create", command).await
    }

    #[instrument(skip(self))]
    pub async fn get_resource(&self, id: i64) -> Result<Resource, RemsError> {
        self.get(&format!("resources/{id}")).await
    }

    #[instrument(skip_all)]
    pub async fn create_catalogue_item(
        &self,
        command: &CreateCatalogueItemCommand,
    ) -> Result<i64, RemsError> {
        self.create("catalogue-items/create", command).await
    }

    #[instrument(skip(self))]
    pub async fn get_catalogue_item(&self, id: i64) -> Result<CatalogueItem, RemsError> {
        self.get(&format!("catalogue-items/{id}")).await
    }

    #[instrument(skip_all, fields(id = command.id))]
    pub async fn edit_catalogue_item(
        &self,
        command: &EditCatalogueItemCommand,
    ) -> Result<(), RemsError> {
        self.command(Method::PUT, "catalogue-items/edit", command)
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_enabled(&self, kind: Kind, id: i64, enabled: bool) -> Result<(), RemsError> {
        self.command(
            Method::PUT,
            &format!("{}/enabled", kind.path()),
            &EnabledCommand { id, enabled },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn set_archived(&self, kind: Kind, id: i64, archived: bool) -> Result<(), RemsError> {
        self.command(
            Method::PUT,
            &format!("{}/archived", kind.path()),
            &ArchivedCommand { id, archived },
        )
        .await
    }
}

fn rejected(errors: Option<Vec<serde_json::Value>>) -> RemsError {
    let errors = errors.unwrap_or_default();
    RemsError::Rejected {
        errors: if errors.is_empty() {
            "no details given".to_owned()
        } else {
            errors.iter().join_with(", ").to_string()
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> RemsClient {
        RemsClient::new(&ClientConfig {
            endpoint: server.uri(),
            user_id: "owner".into(),
            api_key: "secret".into(),
        })
        .unwrap()
    }

    #[test]
    fn base_url_defaults_to_https() {
        assert_eq!(
            base_url("rems.example.org").unwrap(),
            "https://rems.example.org"
        );
        assert_eq!(
            base_url("http://localhost:3000/").unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(
            base_url("https://rems.example.org/api/").unwrap(),
            "https://rems.example.org"
        );
    }

    #[test]
    fn base_url_rejects_other_schemes() {
        assert!(matches!(
            base_url("ftp://rems.example.org"),
            Err(RemsError::InvalidEndpoint { .. })
        ));
        assert!(base_url("  ").is_err());
    }

    #[test]
    fn base_url_requires_host() {
        for endpoint in ["https://", "http://", "https:///", "https:///api", "/api"] {
            assert!(
                matches!(base_url(endpoint), Err(RemsError::InvalidEndpoint { .. })),
                "{endpoint} was accepted"
            );
        }
        assert_eq!(
            base_url("http://localhost:3000/api").unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn sends_credentials_with_every_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/organizations/umccr"))
            .and(header("x-rems-user-id", "owner"))
            .and(header("x-rems-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organization/id": "umccr",
                "organization/short-name": {"en": "UMCCR"},
                "organization/name": {"en": "University of Melbourne Centre for Cancer Research"},
                "organization/owners": [{"userid": "alice"}],
                "enabled": true,
                "archived": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let organization = client_for(&server).get_organization("umccr").await.unwrap();

        assert_eq!(organization.id, "umccr");
        assert_eq!(organization.short_name["en"], "UMCCR");
        assert_eq!(organization.owners[0].userid, "alice");
        assert_eq!(organization.enabled, Some(true));
    }

    #[tokio::test]
    async fn organization_id_is_escaped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/organizations/Garvan%20Institute%2FResearch%3F%23"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "organization/id": "Garvan Institute/Research?#",
                "organization/short-name": {"en": "Garvan"},
                "organization/name": {"en": "Garvan Institute of Medical Research"},
                "organization/owners": [],
                "enabled": true,
                "archived": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let organization = client_for(&server)
            .get_organization("Garvan Institute/Research?#")
            .await
            .unwrap();

        assert_eq!(organization.id, "Garvan Institute/Research?#");
    }

    #[tokio::test]
    async fn create_returns_new_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/categories/create"))
            .and(body_json(json!({
                "category/title": {"en": "Genomics"},
                "category/display-order": 2
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": 12})),
            )
            .mount(&server)
            .await;

        let id = client_for(&server)
            .create_category(&CategoryCommand {
                title: Localized::from([("en".into(), "Genomics".into())]),
                display_order: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(id, 12);
    }

    #[tokio::test]
    async fn unsuccessful_command_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/forms/archived"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "errors": [{"type": "t.administration.errors/in-use-by"}]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .set_archived(Kind::Forms, 4, true)
            .await
            .unwrap_err();

        match err {
            RemsError::Rejected { errors } => assert!(errors.contains("in-use-by")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn maps_error_statuses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/forms/404"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/forms/403"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/forms/500"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);

        assert!(client.get_form(404).await.unwrap_err().is_not_found());
        assert!(matches!(
            client.get_form(403).await.unwrap_err(),
            RemsError::Unauthorized { status: 403 }
        ));
        assert!(matches!(
            client.get_form(500).await.unwrap_err(),
            RemsError::Api { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn undecodable_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/licenses/1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        assert!(matches!(
            client_for(&server).get_license(1).await.unwrap_err(),
            RemsError::InvalidResponse(_)
        ));
    }
}
