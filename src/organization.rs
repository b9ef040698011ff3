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

//! `remscontent_organization` data source.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueEmpty, ValueList, ValueMap, ValueString};
use tf_provider::{map, AttributePath, DataSource, Diagnostics};
use tracing::debug;

use crate::provider::SharedClient;
use crate::utils::{attribute, known_str, localized_type, localized_value, string_value};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub short_name: ValueMap<'a, ValueString<'a>>,
    #[serde(borrow = "'a")]
    pub name: ValueMap<'a, ValueString<'a>>,
    #[serde(borrow = "'a")]
    pub owners: ValueList<ValueString<'a>>,
    pub enabled: ValueBool,
    pub archived: ValueBool,
}

#[derive(Debug, Default, Clone)]
pub struct OrganizationDataSource {
    client: SharedClient,
}

impl OrganizationDataSource {
    pub fn new(client: SharedClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for OrganizationDataSource {
    type State<'a> = OrganizationState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::String, AttributeConstraint::Required, "Organization identifier"),
                    "short_name" => attribute(localized_type(), AttributeConstraint::Computed, "Short name, by language"),
                    "name" => attribute(localized_type(), AttributeConstraint::Computed, "Full name, by language"),
                    "owners" => attribute(
                        AttributeType::List(Box::new(AttributeType::String)),
                        AttributeConstraint::Computed,
                        "User ids of the organization owners",
                    ),
                    "enabled" => attribute(AttributeType::Bool, AttributeConstraint::Computed, "Whether the organization is enabled"),
                    "archived" => attribute(AttributeType::Bool, AttributeConstraint::Computed, "Whether the organization is archived"),
                },
                description: Description::plain("Look up a REMS organization"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if matches!(known_str(&config.id), Some(id) if id.is_empty()) {
            diags.error(
                "Empty organization id",
                "`id` must not be empty.",
                AttributePath::new("id"),
            );
            return None;
        }
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let Some(id) = known_str(&config.id) else {
            diags.error(
                "Unknown organization id",
                "The organization id must be known before it can be read.",
                AttributePath::new("id"),
            );
            return None;
        };
        let client = self.client.get(diags)?;

        debug!(id, "reading organization");
        let organization = match client.get_organization(id).await {
            Ok(organization) => organization,
            Err(err) if err.is_not_found() => {
                diags.error(
                    "Organization not found",
                    format!("REMS has no organization `{id}`."),
                    AttributePath::new("id"),
                );
                return None;
            }
            Err(err) => {
                diags.root_error("Failure to read organization", err.to_string());
                return None;
            }
        };

        Some(OrganizationState {
            id: config.id.clone(),
            short_name: localized_value(organization.short_name),
            name: localized_value(organization.name),
            owners: Value::Value(
                organization
                    .owners
                    .into_iter()
                    .map(|owner| string_value(owner.userid))
                    .collect(),
            ),
            enabled: organization.enabled.map_or(Value::Null, Value::Value),
            archived: Value::Value(organization.archived),
        })
    }
}
