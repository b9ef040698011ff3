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

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{ValueEmpty, ValueString};
use tf_provider::{
    map, AttributePath, Diagnostics, DynamicDataSource, DynamicFunction, DynamicResource, Provider,
};
use tracing::{debug, info};

use crate::{
    catalogue_item::CatalogueItem,
    category::Category,
    client::{base_url, ClientConfig, RemsClient},
    content::ContentResource,
    form::Form,
    functions::{FormFieldHeaderFunction, FormFieldLabelFunction},
    license::License,
    organization::OrganizationDataSource,
    rems_resource::RemsResource,
    utils::{attribute, known_str, known_string, Reported},
    workflow::Workflow,
};

pub const ENDPOINT_ENV: &str = "REMS_ENDPOINT";
pub const API_USER_ENV: &str = "REMS_API_USER";
pub const API_KEY_ENV: &str = "REMS_API_KEY";

/// Client handle shared by the provider and everything it serves.
///
/// Resources are instantiated before the provider block is configured, so
/// they hold this handle and pick the client up on use.
#[derive(Debug, Default, Clone)]
pub struct SharedClient(Arc<RwLock<Option<RemsClient>>>);

impl SharedClient {
    pub fn set(&self, client: RemsClient) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(client);
    }

    pub fn get(&self, diags: &mut Diagnostics) -> Option<RemsClient> {
        let client = self.0.read().unwrap_or_else(PoisonError::into_inner).clone();
        if client.is_none() {
            diags.root_error(
                "Provider not configured",
                "The remscontent provider must be configured before its resources are used.",
            );
        }
        client
    }
}

impl From<RemsClient> for SharedClient {
    fn from(client: RemsClient) -> Self {
        Self(Arc::new(RwLock::new(Some(client))))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    #[serde(borrow = "'a")]
    pub endpoint: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub api_user: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub api_key: ValueString<'a>,
}

impl ProviderConfig<'_> {
    /// Resolve the client settings, falling back to `env` for unset attributes.
    fn client_config(
        &self,
        diags: &mut Diagnostics,
        env: impl Fn(&str) -> Option<String>,
    ) -> Option<ClientConfig> {
        let mut resolve = |value: &ValueString<'_>, name: &'static str, var: &str| {
            let resolved = known_string(value)
                .filter(|value| !value.is_empty())
                .or_else(|| env(var).filter(|value| !value.is_empty()));
            if resolved.is_none() {
                diags.error(
                    format!("Missing `{name}`"),
                    format!(
                        "Set `{name}` in the provider block or the `{var}` environment variable."
                    ),
                    AttributePath::new(name),
                );
            }
            resolved.unwrap_or_default()
        };

        let config = ClientConfig {
            endpoint: resolve(&self.endpoint, "endpoint", ENDPOINT_ENV),
            user_id: resolve(&self.api_user, "api_user", API_USER_ENV),
            api_key: resolve(&self.api_key, "api_key", API_KEY_ENV),
        };

        if diags.errors.is_empty() {
            Some(config)
        } else {
            None
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RemsContentProvider {
    client: SharedClient,
}

#[async_trait]
impl Provider for RemsContentProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                description: Description::plain("Manage REMS content"),
                attributes: map! {
                    "endpoint" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Optional,
                        "REMS instance host name, or base URL. Defaults to $REMS_ENDPOINT",
                    ),
                    "api_user" => attribute(
                        AttributeType::String,
                        AttributeConstraint::Optional,
                        "REMS API user. Defaults to $REMS_API_USER",
                    ),
                    "api_key" => tf_provider::schema::Attribute {
                        sensitive: true,
                        ..attribute(
                            AttributeType::String,
                            AttributeConstraint::Optional,
                            "REMS API key. Defaults to $REMS_API_KEY",
                        )
                    },
                },
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        if let Some(endpoint) = known_str(&config.endpoint) {
            if let Err(err) = base_url(endpoint) {
                diags.error("Invalid endpoint", err.to_string(), AttributePath::new("endpoint"));
            }
        }

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        debug!(terraform_version, "configuring provider");

        let client_config = config.client_config(diags, |var| std::env::var(var).ok())?;
        let client =
            RemsClient::new(&client_config).reported(diags, "Failure to create REMS client")?;

        info!(base_url = client.base_url(), "REMS client configured");
        self.client.set(client);
        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicResource>>> {
        Some(map! {
            "form"           => ContentResource::<Form>::new(self.client.clone()),
            "category"       => ContentResource::<Category>::new(self.client.clone()),
            "license"        => ContentResource::<License>::new(self.client.clone()),
            "workflow"       => ContentResource::<Workflow>::new(self.client.clone()),
            "resource"       => ContentResource::<RemsResource>::new(self.client.clone()),
            "catalogue_item" => ContentResource::<CatalogueItem>::new(self.client.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicDataSource>>> {
        Some(map! {
            "organization" => OrganizationDataSource::new(self.client.clone()),
        })
    }

    fn get_functions(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn DynamicFunction>>> {
        Some(map! {
            "form_field_header" => FormFieldHeaderFunction,
            "form_field_label"  => FormFieldLabelFunction,
        })
    }
}
