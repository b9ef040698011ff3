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

//! `remscontent_catalogue_item`: what applicants see and apply for.
//!
//! A catalogue item ties a resource to the workflow (and optionally the form)
//! that handles its applications. Only the localizations and the categories
//! can be edited.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueList, ValueMap, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::client::model::{
    self, CatalogueItemLocalization, CategoryRef, CreateCatalogueItemCommand,
    EditCatalogueItemCommand, OrganizationId,
};
use crate::client::{Kind, RemsClient, RemsError};
use crate::content::{read_enabled, Content, ContentState};
use crate::utils::{
    attribute, known_string, numbers, numbers_value_like, optional_string_value,
    replace_if_changed, string_value, Reported,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItemState<'a> {
    pub id: ValueNumber,
    #[serde(borrow = "'a")]
    pub organization_id: ValueString<'a>,
    pub resource_id: ValueNumber,
    pub workflow_id: ValueNumber,
    pub form_id: ValueNumber,
    #[serde(borrow = "'a")]
    pub localizations: ValueMap<'a, Value<CatalogueItemLocalizationState<'a>>>,
    pub categories: ValueList<ValueNumber>,
    pub enabled: ValueBool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItemLocalizationState<'a> {
    #[serde(borrow = "'a")]
    pub title: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub info_url: ValueString<'a>,
}

impl<'a> ContentState<'a> for CatalogueItemState<'a> {
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

impl CatalogueItemState<'_> {
    fn localizations(&self) -> BTreeMap<String, CatalogueItemLocalization> {
        self.localizations
            .iter()
            .flatten()
            .filter_map(|(lang, localization)| {
                let localization = localization.as_ref_option()?;
                Some((
                    lang.to_string(),
                    CatalogueItemLocalization {
                        title: known_string(&localization.title).unwrap_or_default(),
                        infourl: known_string(&localization.info_url),
                    },
                ))
            })
            .collect()
    }

    fn categories(&self) -> Option<Vec<CategoryRef>> {
        numbers(&self.categories).map(|ids| ids.into_iter().map(|id| CategoryRef { id }).collect())
    }
}

#[derive(Debug, Default)]
pub struct CatalogueItem;

#[async_trait]
impl Content for CatalogueItem {
    const NAME: &'static str = "catalogue item";
    const KIND: Option<Kind> = Some(Kind::CatalogueItems);

    type State<'a> = CatalogueItemState<'a>;
    type Remote = model::CatalogueItem;

    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::Number, AttributeConstraint::Computed, "Catalogue item identifier"),
                    "organization_id" => attribute(AttributeType::String, AttributeConstraint::Required, "Organization owning the catalogue item"),
                    "resource_id" => attribute(AttributeType::Number, AttributeConstraint::Required, "Id of the resource applied for"),
                    "workflow_id" => attribute(AttributeType::Number, AttributeConstraint::Required, "Id of the workflow handling applications"),
                    "form_id" => attribute(AttributeType::Number, AttributeConstraint::Optional, "Id of the form applicants fill"),
                    "localizations" => attribute(
                        AttributeType::AttributeMap(map! {
                            "title" => attribute(AttributeType::String, AttributeConstraint::Required, "Title shown in the catalogue"),
                            "info_url" => attribute(AttributeType::String, AttributeConstraint::Optional, "Link to more information"),
                        }),
                        AttributeConstraint::Required,
                        "Catalogue entry, by language",
                    ),
                    "categories" => attribute(
                        AttributeType::List(Box::new(AttributeType::Number)),
                        AttributeConstraint::Optional,
                        "Ids of the categories listing the item",
                    ),
                    "enabled" => attribute(AttributeType::Bool, AttributeConstraint::OptionalComputed, "Whether applicants can apply (default: true)"),
                },
                description: Description::plain("REMS catalogue item"),
                ..Default::default()
            },
        }
    }

    fn validate(diags: &mut Diagnostics, config: &Self::State<'_>) {
        if let Value::Value(localizations) = &config.localizations {
            if localizations.is_empty() {
                diags.error(
                    "Missing localization",
                    "At least one language must be given.",
                    AttributePath::new("localizations"),
                );
            }
        }
    }

    fn requires_replace(
        prior: &Self::State<'_>,
        proposed: &Self::State<'_>,
    ) -> Vec<AttributePath> {
        let mut paths = Vec::new();
        replace_if_changed(
            &mut paths,
            "organization_id",
            &prior.organization_id,
            &proposed.organization_id,
        );
        replace_if_changed(&mut paths, "resource_id", &prior.resource_id, &proposed.resource_id);
        replace_if_changed(&mut paths, "workflow_id", &prior.workflow_id, &proposed.workflow_id);
        replace_if_changed(&mut paths, "form_id", &prior.form_id, &proposed.form_id);
        paths
    }

    async fn create<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        planned: &Self::State<'a>,
    ) -> Option<i64> {
        let command = CreateCatalogueItemCommand {
            form: planned.form_id.as_ref_option().copied(),
            resid: planned.resource_id.as_ref_option().copied().unwrap_or_default(),
            wfid: planned.workflow_id.as_ref_option().copied().unwrap_or_default(),
            organization: OrganizationId::new(
                known_string(&planned.organization_id).unwrap_or_default(),
            ),
            localizations: planned.localizations(),
            // `enabled: false` is applied afterwards like for other content
            enabled: Some(true),
            categories: planned.categories(),
        };

        client
            .create_catalogue_item(&command)
            .await
            .reported(diags, "Failure to create catalogue item")
    }

    async fn fetch(client: &RemsClient, id: i64) -> Result<Self::Remote, RemsError> {
        client.get_catalogue_item(id).await
    }

    fn apply(remote: Self::Remote, state: &mut Self::State<'_>) {
        state.id = Value::Value(remote.id);
        state.organization_id = string_value(remote.organization.id);
        state.resource_id = Value::Value(remote.resource_id);
        state.workflow_id = Value::Value(remote.wfid);
        state.form_id = remote.formid.map_or(Value::Null, Value::Value);
        state.localizations = Value::Value(
            remote
                .localizations
                .into_iter()
                .map(|(lang, localization)| {
                    (
                        lang.into(),
                        Value::Value(CatalogueItemLocalizationState {
                            title: string_value(localization.title),
                            info_url: optional_string_value(
                                localization.infourl.filter(|url| !url.is_empty()),
                            ),
                        }),
                    )
                })
                .collect(),
        );
        state.categories = numbers_value_like(
            &state.categories,
            remote
                .categories
                .unwrap_or_default()
                .into_iter()
                .map(|category| category.id)
                .collect(),
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
        if prior.localizations == planned.localizations && prior.categories == planned.categories {
            return Some(());
        }

        let command = EditCatalogueItemCommand {
            id,
            localizations: planned.localizations(),
            // Clearing the categories needs an explicit empty list
            categories: Some(planned.categories().unwrap_or_default()),
        };

        client
            .edit_catalogue_item(&command)
            .await
            .reported(diags, "Failure to update catalogue item")
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use serde_json::json;
    use tf_provider::Resource;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::content::ContentResource;
    use crate::testing::{shared_client, success, text};

    fn planned<'a>() -> CatalogueItemState<'a> {
        CatalogueItemState {
            id: Value::Unknown,
            organization_id: text("umccr"),
            resource_id: Value::Value(5),
            workflow_id: Value::Value(3),
            form_id: Value::Value(7),
            localizations: Value::Value(
                [(
                    Cow::Borrowed("en"),
                    Value::Value(CatalogueItemLocalizationState {
                        title: text("Cohort data"),
                        info_url: Value::Null,
                    }),
                )]
                .into_iter()
                .collect(),
            ),
            categories: Value::Value(vec![Value::Value(12)]),
            enabled: Value::Value(true),
        }
    }

    #[tokio::test]
    async fn create_links_resource_workflow_and_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/catalogue-items/create"))
            .and(body_json(json!({
                "form": 7,
                "resid": 5,
                "wfid": 3,
                "organization": {"organization/id": "umccr"},
                "localizations": {"en": {"title": "Cohort data"}},
                "enabled": true,
                "categories": [{"category/id": 12}]
            })))
            .respond_with(success(Some(21)))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ContentResource::<CatalogueItem>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .create(&mut diags, planned(), planned(), Value::Null, Value::Null)
            .await
            .unwrap();

        assert_eq!(state.id, Value::Value(21));
    }

    #[tokio::test]
    async fn read_copies_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/catalogue-items/21"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 21,
                "resource-id": 5,
                "resid": "urn:nbn:fi:lb-201403262",
                "wfid": 3,
                "formid": 7,
                "organization": {"organization/id": "umccr"},
                "localizations": {
                    "en": {"id": 21, "langcode": "en", "title": "Cohort data", "infourl": null}
                },
                "categories": [{"category/id": 12, "category/title": {"en": "Genomics"}}],
                "enabled": true,
                "archived": false,
                "expired": false
            })))
            .mount(&server)
            .await;

        let mut state = planned();
        state.id = Value::Value(21);

        let resource = ContentResource::<CatalogueItem>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (read, _) = resource
            .read(&mut diags, state.clone(), Value::Null, Value::Null)
            .await
            .unwrap();

        assert_eq!(read, state);
    }

    #[tokio::test]
    async fn localization_change_edits_item() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/catalogue-items/edit"))
            .and(body_json(json!({
                "id": 21,
                "localizations": {"en": {"title": "Cohort data v2", "infourl": "https://example.org"}},
                "categories": []
            })))
            .respond_with(success(None))
            .expect(1)
            .mount(&server)
            .await;

        let mut prior = planned();
        prior.id = Value::Value(21);
        let mut next = prior.clone();
        next.categories = Value::Null;
        next.localizations = Value::Value(
            [(
                Cow::Borrowed("en"),
                Value::Value(CatalogueItemLocalizationState {
                    title: text("Cohort data v2"),
                    info_url: text("https://example.org"),
                }),
            )]
            .into_iter()
            .collect(),
        );

        let resource = ContentResource::<CatalogueItem>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        resource
            .update(&mut diags, prior, next.clone(), next, Value::Null, Value::Null)
            .await
            .unwrap();

        assert!(diags.errors.is_empty());
    }

    #[test]
    fn links_force_replacement() {
        let prior = planned();
        let mut proposed = planned();
        proposed.workflow_id = Value::Value(4);
        proposed.form_id = Value::Null;
        proposed.categories = Value::Null;

        assert_eq!(CatalogueItem::requires_replace(&prior, &proposed).len(), 2);
    }
}
