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

//! `remscontent_resource`: external resources catalogue items point to.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueList, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::client::model::{self, CreateResourceCommand, OrganizationId};
use crate::client::{Kind, RemsClient, RemsError};
use crate::content::{read_enabled, Content, ContentState};
use crate::utils::{
    attribute, known_string, numbers, numbers_value_like, replace_if_changed, string_value,
    Reported,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState<'a> {
    pub id: ValueNumber,
    #[serde(borrow = "'a")]
    pub resource_ext_id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub organization_id: ValueString<'a>,
    pub licenses: ValueList<ValueNumber>,
    pub enabled: ValueBool,
}

impl<'a> ContentState<'a> for ResourceState<'a> {
    fn id(&self) -> &ValueNumber {
        &self.id
    }
    fn id_mut(&mut self) -> &mut ValueNumber {
        &mut self.id
    }
    fn enabled(&self) -> Option<&ValueBool> {
        Some(&self.enabled)
    }
    fn enabled_mut(&mut self) -> Option<&mut ValueBool> {
        Some(&mut self.enabled)
    }
}

#[derive(Debug, Default)]
pub struct RemsResource;

#[async_trait]
impl Content for RemsResource {
    const NAME: &'static str = "resource";
    const KIND: Option<Kind> = Some(Kind::Resources);

    type State<'a> = ResourceState<'a>;
    type Remote = model::Resource;

    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::Number, AttributeConstraint::Computed, "Resource identifier"),
                    "resource_ext_id" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Required,
                        "External identifier of the resource, usually a URN or a dataset id",
                    ),
                    "organization_id" => attribute(AttributeType::String, AttributeConstraint::Required, "Organization owning the resource"),
                    "licenses" => attribute(
                        AttributeType::List(Box::new(AttributeType::Number)),
                        AttributeConstraint::Optional,
                        "Ids of the licenses attached to the resource",
                    ),
                    "enabled" => attribute(AttributeType::Bool, AttributeConstraint::OptionalComputed, "Whether the resource can be used (default: true)"),
                },
                description: Description::plain("REMS resource"),
                ..Default::default()
            },
        }
    }

    fn validate(diags: &mut Diagnostics, config: &Self::State<'_>) {
        if matches!(&config.resource_ext_id, Value::Value(resid) if resid.trim().is_empty()) {
            diags.error(
                "Empty resource identifier",
                "`resource_ext_id` must not be empty.",
                AttributePath::new("resource_ext_id"),
            );
        }
    }

    fn requires_replace(
        prior: &Self::State<'_>,
        proposed: &Self::State<'_>,
    ) -> Vec<AttributePath> {
        let mut paths = Vec::new();
        replace_if_changed(
            &mut paths,
            "resource_ext_id",
            &prior.resource_ext_id,
            &proposed.resource_ext_id,
        );
        replace_if_changed(
            &mut paths,
            "organization_id",
            &prior.organization_id,
            &proposed.organization_id,
        );
        replace_if_changed(&mut paths, "licenses", &prior.licenses, &proposed.licenses);
        paths
    }

    async fn create<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        planned: &Self::State<'a>,
    ) -> Option<i64> {
        let command = CreateResourceCommand {
            resid: known_string(&planned.resource_ext_id).unwrap_or_default(),
            organization: OrganizationId::new(
                known_string(&planned.organization_id).unwrap_or_default(),
            ),
            licenses: numbers(&planned.licenses).unwrap_or_default(),
        };

        client
            .create_resource(&command)
            .await
            .reported(diags, "Failure to create resource")
    }

    async fn fetch(client: &RemsClient, id: i64) -> Result<Self::Remote, RemsError> {
        client.get_resource(id).await
    }

    fn apply(remote: Self::Remote, state: &mut Self::State<'_>) {
        state.id = Value::Value(remote.id);
        state.resource_ext_id = string_value(remote.resid);
        state.organization_id = string_value(remote.organization.id);
        state.licenses = numbers_value_like(
            &state.licenses,
            remote.licenses.iter().map(|license| license.id).collect(),
        );
        read_enabled(&mut state.enabled, remote.enabled);
    }

    async fn update<'a>(
        _client: &RemsClient,
        _diags: &mut Diagnostics,
        _id: i64,
        _prior: &Self::State<'a>,
        _planned: &Self::State<'a>,
    ) -> Option<()> {
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tf_provider::Resource;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::content::ContentResource;
    use crate::testing::{shared_client, success, text};

    fn planned<'a>() -> ResourceState<'a> {
        ResourceState {
            id: Value::Unknown,
            resource_ext_id: text("urn:nbn:fi:lb-201403262"),
            organization_id: text("umccr"),
            licenses: Value::Value(vec![Value::Value(2)]),
            enabled: Value::Value(true),
        }
    }

    #[tokio::test]
    async fn create_posts_resid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/resources/create"))
            .and(body_json(json!({
                "resid": "urn:nbn:fi:lb-201403262",
                "organization": {"organization/id": "umccr"},
                "licenses": [2]
            })))
            .respond_with(success(Some(5)))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ContentResource::<RemsResource>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .create(&mut diags, planned(), planned(), Value::Null, Value::Null)
            .await
            .unwrap();

        assert_eq!(state.id, Value::Value(5));
    }

    #[tokio::test]
    async fn read_detects_remote_disable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/resources/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5,
                "resid": "urn:nbn:fi:lb-201403262",
                "organization": {"organization/id": "umccr"},
                "licenses": [{"id": 2, "licensetype": "link"}],
                "enabled": false,
                "archived": false
            })))
            .mount(&server)
            .await;

        let mut state = planned();
        state.id = Value::Value(5);

        let resource = ContentResource::<RemsResource>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (read, _) = resource
            .read(&mut diags, state.clone(), Value::Null, Value::Null)
            .await
            .unwrap();

        state.enabled = Value::Value(false);
        assert_eq!(read, state);
    }

    #[tokio::test]
    async fn read_without_enabled_keeps_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/resources/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5,
                "resid": "urn:nbn:fi:lb-201403262",
                "organization": {"organization/id": "umccr"},
                "licenses": [{"id": 2, "licensetype": "link"}]
            })))
            .mount(&server)
            .await;

        let mut state = planned();
        state.id = Value::Value(5);

        let resource = ContentResource::<RemsResource>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (read, _) = resource
            .read(&mut diags, state.clone(), Value::Null, Value::Null)
            .await
            .unwrap();

        assert_eq!(read.enabled, Value::Value(true));
        assert_eq!(read, state);
    }

    #[tokio::test]
    async fn update_only_toggles_enabled() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/resources/enabled"))
            .and(body_json(json!({"id": 5, "enabled": true})))
            .respond_with(success(None))
            .expect(1)
            .mount(&server)
            .await;

        let mut prior = planned();
        prior.id = Value::Value(5);
        prior.enabled = Value::Value(false);
        let mut next = prior.clone();
        next.enabled = Value::Value(true);

        let resource = ContentResource::<RemsResource>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        resource
            .update(&mut diags, prior, next.clone(), next, Value::Null, Value::Null)
            .await
            .unwrap();

        assert!(diags.errors.is_empty());
    }

    #[test]
    fn everything_but_enabled_forces_replacement() {
        let prior = planned();
        let mut proposed = planned();
        proposed.resource_ext_id = text("urn:other");
        proposed.licenses = Value::Null;
        proposed.enabled = Value::Value(false);

        assert_eq!(RemsResource::requires_replace(&prior, &proposed).len(), 2);
    }
}
