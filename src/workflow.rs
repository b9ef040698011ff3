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

//! `remscontent_workflow`: application workflows and their handlers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueList, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::client::model::{
    self, CreateWorkflowCommand, EditWorkflowCommand, FormRef, LicenseRef, OrganizationId,
};
use crate::client::{Kind, RemsClient, RemsError};
use crate::content::{read_enabled, Content, ContentState};
use crate::utils::{
    attribute, known_str, known_string, numbers, numbers_value_like, replace_if_changed,
    string_value, strings, strings_value_like, Reported,
};

const WORKFLOW_TYPES: &[&str] = &["default", "decider", "master"];
const WORKFLOW_TYPE_PREFIX: &str = "workflow/";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState<'a> {
    pub id: ValueNumber,
    #[serde(borrow = "'a")]
    pub organization_id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub title: ValueString<'a>,
    #[serde(borrow = "'a", rename = "type")]
    pub workflow_type: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub handlers: ValueList<ValueString<'a>>,
    pub forms: ValueList<ValueNumber>,
    pub licenses: ValueList<ValueNumber>,
    pub enabled: ValueBool,
}

impl<'a> ContentState<'a> for WorkflowState<'a> {
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
pub struct Workflow;

#[async_trait]
impl Content for Workflow {
    const NAME: &'static str = "workflow";
    const KIND: Option<Kind> = Some(Kind::Workflows);

    type State<'a> = WorkflowState<'a>;
    type Remote = model::Workflow;

    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::Number, AttributeConstraint::Computed, "Workflow identifier"),
                    "organization_id" => attribute(AttributeType::String, AttributeConstraint::Required, "Organization owning the workflow"),
                    "title" => attribute(AttributeType::String, AttributeConstraint::Required, "Title of the workflow"),
                    "type" => attribute(
                        AttributeType::String,
                        AttributeConstraint::OptionalComputed,
                        "default, decider or master (default: default)",
                    ),
                    "handlers" => attribute(
                        AttributeType::List(Box::new(AttributeType::String)),
                        AttributeConstraint::Optional,
                        "User ids of the handlers",
                    ),
                    "forms" => attribute(
                        AttributeType::List(Box::new(AttributeType::Number)),
                        AttributeConstraint::Optional,
                        "Ids of the forms every application of the workflow fills",
                    ),
                    "licenses" => attribute(
                        AttributeType::List(Box::new(AttributeType::Number)),
                        AttributeConstraint::Optional,
                        "Ids of the licenses every application of the workflow accepts",
                    ),
                    "enabled" => attribute(AttributeType::Bool, AttributeConstraint::OptionalComputed, "Whether the workflow can be used (default: true)"),
                },
                description: Description::plain("REMS workflow"),
                ..Default::default()
            },
        }
    }

    fn validate(diags: &mut Diagnostics, config: &Self::State<'_>) {
        if let Some(workflow_type) = known_str(&config.workflow_type) {
            if !WORKFLOW_TYPES.contains(&workflow_type) {
                diags.error(
                    "Unknown workflow type",
                    format!("`{workflow_type}` must be `default`, `decider` or `master`."),
                    AttributePath::new("type"),
                );
            }
        }
    }

    fn normalize(state: &mut Self::State<'_>) {
        if state.workflow_type.is_null() {
            state.workflow_type = string_value("default");
        }
    }

    fn requires_replace(
        prior: &Self::State<'_>,
        proposed: &Self::State<'_>,
    ) -> Vec<AttributePath> {
        let mut paths = Vec::new();
        // Null means the default type
        if !proposed.workflow_type.is_null() {
            replace_if_changed(&mut paths, "type", &prior.workflow_type, &proposed.workflow_type);
        }
        replace_if_changed(&mut paths, "forms", &prior.forms, &proposed.forms);
        replace_if_changed(&mut paths, "licenses", &prior.licenses, &proposed.licenses);
        paths
    }

    async fn create<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        planned: &Self::State<'a>,
    ) -> Option<i64> {
        let command = CreateWorkflowCommand {
            organization: OrganizationId::new(
                known_string(&planned.organization_id).unwrap_or_default(),
            ),
            title: known_string(&planned.title).unwrap_or_default(),
            workflow_type: format!(
                "{WORKFLOW_TYPE_PREFIX}{}",
                known_str(&planned.workflow_type).unwrap_or("default")
            ),
            handlers: strings(&planned.handlers).unwrap_or_default(),
            forms: numbers(&planned.forms)
                .unwrap_or_default()
                .into_iter()
                .map(|id| FormRef { id })
                .collect(),
            licenses: numbers(&planned.licenses)
                .unwrap_or_default()
                .into_iter()
                .map(|id| LicenseRef { id })
                .collect(),
        };

        client
            .create_workflow(&command)
            .await
            .reported(diags, "Failure to create workflow")
    }

    async fn fetch(client: &RemsClient, id: i64) -> Result<Self::Remote, RemsError> {
        client.get_workflow(id).await
    }

    fn apply(remote: Self::Remote, state: &mut Self::State<'_>) {
        let workflow_type = remote.workflow.workflow_type;
        state.id = Value::Value(remote.id);
        state.organization_id = string_value(remote.organization.id);
        state.title = string_value(remote.title);
        state.workflow_type = string_value(
            workflow_type
                .strip_prefix(WORKFLOW_TYPE_PREFIX)
                .unwrap_or(&workflow_type),
        );
        state.handlers = strings_value_like(
            &state.handlers,
            remote
                .workflow
                .handlers
                .into_iter()
                .map(|handler| handler.userid)
                .collect(),
        );
        state.forms = numbers_value_like(
            &state.forms,
            remote.workflow.forms.iter().map(|form| form.id).collect(),
        );
        state.licenses = numbers_value_like(
            &state.licenses,
            remote.workflow.licenses.iter().map(|license| license.id).collect(),
        );
        read_enabled(&mut state.enabled, remote.enabled);
    }

    async fn update<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        id: i64,
        prior: &Self::State<'a>,
        planned: &Self::State<'a>,
    ) -> Option<()> {
        if prior.organization_id == planned.organization_id
            && prior.title == planned.title
            && strings(&prior.handlers).unwrap_or_default()
                == strings(&planned.handlers).unwrap_or_default()
        {
            return Some(());
        }

        let command = EditWorkflowCommand {
            id,
            organization: OrganizationId::new(
                known_string(&planned.organization_id).unwrap_or_default(),
            ),
            title: known_string(&planned.title).unwrap_or_default(),
            handlers: strings(&planned.handlers).unwrap_or_default(),
        };

        client
            .edit_workflow(&command)
            .await
            .reported(diags, "Failure to update workflow")
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

    fn planned<'a>() -> WorkflowState<'a> {
        WorkflowState {
            id: Value::Unknown,
            organization_id: text("umccr"),
            title: text("Data access"),
            workflow_type: text("default"),
            handlers: Value::Value(vec![text("alice")]),
            forms: Value::Value(vec![Value::Value(7)]),
            licenses: Value::Null,
            enabled: Value::Value(true),
        }
    }

    #[tokio::test]
    async fn create_prefixes_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/workflows/create"))
            .and(body_json(json!({
                "organization": {"organization/id": "umccr"},
                "title": "Data access",
                "type": "workflow/default",
                "handlers": ["alice"],
                "forms": [{"form/id": 7}],
                "licenses": []
            })))
            .respond_with(success(Some(3)))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ContentResource::<Workflow>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .create(&mut diags, planned(), planned(), Value::Null, Value::Null)
            .await
            .unwrap();

        assert_eq!(state.id, Value::Value(3));
    }

    #[tokio::test]
    async fn read_strips_type_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/workflows/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 3,
                "organization": {"organization/id": "umccr"},
                "title": "Data access",
                "workflow": {
                    "type": "workflow/default",
                    "handlers": [{"userid": "alice", "name": "Alice"}],
                    "forms": [{"form/id": 7}],
                    "licenses": []
                },
                "enabled": true,
                "archived": false
            })))
            .mount(&server)
            .await;

        let mut state = planned();
        state.id = Value::Value(3);

        let resource = ContentResource::<Workflow>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (read, _) = resource
            .read(&mut diags, state.clone(), Value::Null, Value::Null)
            .await
            .unwrap();

        assert_eq!(read, state);
    }

    #[tokio::test]
    async fn handler_change_edits_workflow() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/workflows/edit"))
            .and(body_json(json!({
                "id": 3,
                "organization": {"organization/id": "umccr"},
                "title": "Data access",
                "handlers": ["alice", "bob"]
            })))
            .respond_with(success(None))
            .expect(1)
            .mount(&server)
            .await;

        let mut prior = planned();
        prior.id = Value::Value(3);
        let mut next = prior.clone();
        next.handlers = Value::Value(vec![text("alice"), text("bob")]);

        let resource = ContentResource::<Workflow>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        resource
            .update(&mut diags, prior, next.clone(), next, Value::Null, Value::Null)
            .await
            .unwrap();

        assert!(diags.errors.is_empty());
    }

    #[test]
    fn form_change_forces_replacement() {
        let prior = planned();
        let mut proposed = planned();
        proposed.forms = Value::Value(vec![Value::Value(8)]);
        proposed.title = text("Renamed");

        assert_eq!(Workflow::requires_replace(&prior, &proposed).len(), 1);
    }

    #[test]
    fn type_defaults_to_default() {
        let mut state = planned();
        state.workflow_type = Value::Null;
        Workflow::normalize(&mut state);
        assert_eq!(state.workflow_type, text("default"));
    }
}
