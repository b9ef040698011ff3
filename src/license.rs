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

//! `remscontent_license`: licenses applicants must accept.
//!
//! REMS has no edit command for licenses: every change but `enabled` creates
//! a new license.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueBool, ValueMap, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::client::model::{self, CreateLicenseCommand, LicenseLocalization, OrganizationId};
use crate::client::{Kind, RemsClient, RemsError};
use crate::content::{read_enabled, Content, ContentState};
use crate::utils::{
    attribute, known_str, known_string, optional_string_value, replace_if_changed, string_value,
    DisplayJoinable, Reported,
};

const LICENSE_TYPES: &[&str] = &["link", "text", "attachment"];

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseState<'a> {
    pub id: ValueNumber,
    #[serde(borrow = "'a")]
    pub organization_id: ValueString<'a>,
    #[serde(borrow = "'a", rename = "type")]
    pub license_type: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub localizations: ValueMap<'a, Value<LicenseLocalizationState<'a>>>,
    pub enabled: ValueBool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseLocalizationState<'a> {
    #[serde(borrow = "'a")]
    pub title: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub text_content: ValueString<'a>,
    pub attachment_id: ValueNumber,
}

impl<'a> ContentState<'a> for LicenseState<'a> {
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

impl LicenseState<'_> {
    fn command(&self) -> CreateLicenseCommand {
        CreateLicenseCommand {
            licensetype: known_string(&self.license_type).unwrap_or_default(),
            organization: OrganizationId::new(
                known_string(&self.organization_id).unwrap_or_default(),
            ),
            localizations: self
                .localizations
                .iter()
                .flatten()
                .filter_map(|(lang, localization)| {
                    let localization = localization.as_ref_option()?;
                    Some((
                        lang.to_string(),
                        LicenseLocalization {
                            title: known_string(&localization.title).unwrap_or_default(),
                            textcontent: known_string(&localization.text_content)
                                .unwrap_or_default(),
                            attachment_id: localization.attachment_id.as_ref_option().copied(),
                        },
                    ))
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct License;

#[async_trait]
impl Content for License {
    const NAME: &'static str = "license";
    const KIND: Option<Kind> = Some(Kind::Licenses);

    type State<'a> = LicenseState<'a>;
    type Remote = model::License;

    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::Number, AttributeConstraint::Computed, "License identifier"),
                    "organization_id" => attribute(AttributeType::String, AttributeConstraint::Required, "Organization owning the license"),
                    "type" => attribute(AttributeType::String, AttributeConstraint::Required, "link, text or attachment"),
                    "localizations" => attribute(
                        AttributeType::AttributeMap(map! {
                            "title" => attribute(AttributeType::String, AttributeConstraint::Required, "Title of the license"),
                            "text_content" => attribute(
                                AttributeType::String,
                                AttributeConstraint::Optional,
                                "URL of link licenses, text of text licenses",
                            ),
                            "attachment_id" => attribute(
                                AttributeType::Number,
                                AttributeConstraint::Optional,
                                "Id of the uploaded attachment of attachment licenses",
                            ),
                        }),
                        AttributeConstraint::Required,
                        "License content, by language",
                    ),
                    "enabled" => attribute(AttributeType::Bool, AttributeConstraint::OptionalComputed, "Whether the license can be used (default: true)"),
                },
                description: Description::plain("REMS license"),
                ..Default::default()
            },
        }
    }

    fn validate(diags: &mut Diagnostics, config: &Self::State<'_>) {
        let Some(license_type) = known_str(&config.license_type) else {
            return;
        };
        if !LICENSE_TYPES.contains(&license_type) {
            diags.error(
                "Unknown license type",
                format!(
                    "`{license_type}` is not one of: {}.",
                    LICENSE_TYPES.iter().join_with(", ")
                ),
                AttributePath::new("type"),
            );
            return;
        }

        for (lang, localization) in config.localizations.iter().flatten() {
            let Value::Value(localization) = localization else {
                continue;
            };
            let attr_path = AttributePath::new("localizations").key(lang.to_string());
            if license_type == "attachment" {
                if localization.attachment_id.is_null() {
                    diags.error(
                        "Missing attachment",
                        "Attachment licenses need an `attachment_id`.",
                        attr_path.attribute("attachment_id"),
                    );
                }
            } else if localization.text_content.is_null() {
                diags.error(
                    "Missing license content",
                    format!("`{license_type}` licenses need `text_content`."),
                    attr_path.attribute("text_content"),
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
        replace_if_changed(&mut paths, "type", &prior.license_type, &proposed.license_type);
        replace_if_changed(
            &mut paths,
            "localizations",
            &prior.localizations,
            &proposed.localizations,
        );
        paths
    }

    async fn create<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        planned: &Self::State<'a>,
    ) -> Option<i64> {
        client
            .create_license(&planned.command())
            .await
            .reported(diags, "Failure to create license")
    }

    async fn fetch(client: &RemsClient, id: i64) -> Result<Self::Remote, RemsError> {
        client.get_license(id).await
    }

    fn apply(remote: Self::Remote, state: &mut Self::State<'_>) {
        state.id = Value::Value(remote.id);
        state.organization_id = string_value(remote.organization.id);
        state.license_type = string_value(remote.licensetype);
        read_enabled(&mut state.enabled, remote.enabled);
        state.localizations = Value::Value(
            remote
                .localizations
                .into_iter()
                .map(|(lang, localization)| {
                    (
                        lang.into(),
                        Value::Value(LicenseLocalizationState {
                            title: string_value(localization.title),
                            text_content: optional_string_value(
                                Some(localization.textcontent).filter(|text| !text.is_empty()),
                            ),
                            attachment_id: localization
                                .attachment_id
                                .map_or(Value::Null, Value::Value),
                        }),
                    )
                })
                .collect::<BTreeMap<_, _>>(),
        );
    }

    /// Only `enabled` changes in place; it is applied by the caller.
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
    use std::borrow::Cow;

    use serde_json::json;
    use tf_provider::Resource;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::content::ContentResource;
    use crate::testing::{shared_client, success, text};

    fn planned<'a>() -> LicenseState<'a> {
        LicenseState {
            id: Value::Unknown,
            organization_id: text("umccr"),
            license_type: text("link"),
            localizations: Value::Value(
                [(
                    Cow::Borrowed("en"),
                    Value::Value(LicenseLocalizationState {
                        title: text("Terms of use"),
                        text_content: text("https://example.org/terms"),
                        attachment_id: Value::Null,
                    }),
                )]
                .into_iter()
                .collect(),
            ),
            enabled: Value::Value(true),
        }
    }

    #[tokio::test]
    async fn create_sends_localizations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/licenses/create"))
            .and(body_json(json!({
                "licensetype": "link",
                "organization": {"organization/id": "umccr"},
                "localizations": {
                    "en": {"title": "Terms of use", "textcontent": "https://example.org/terms"}
                }
            })))
            .respond_with(success(Some(2)))
            .expect(1)
            .mount(&server)
            .await;

        let resource = ContentResource::<License>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .create(&mut diags, planned(), planned(), Value::Null, Value::Null)
            .await
            .unwrap();

        assert_eq!(state.id, Value::Value(2));
    }

    #[tokio::test]
    async fn disabled_license_is_disabled_after_create() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/licenses/create"))
            .respond_with(success(Some(2)))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/licenses/enabled"))
            .and(body_json(json!({"id": 2, "enabled": false})))
            .respond_with(success(None))
            .expect(1)
            .mount(&server)
            .await;

        let mut state = planned();
        state.enabled = Value::Value(false);

        let resource = ContentResource::<License>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        resource
            .create(&mut diags, state.clone(), state, Value::Null, Value::Null)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn read_maps_localizations() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/licenses/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 2,
                "licensetype": "link",
                "organization": {"organization/id": "umccr"},
                "localizations": {
                    "en": {"title": "Terms of use", "textcontent": "https://example.org/terms"}
                },
                "enabled": true,
                "archived": false
            })))
            .mount(&server)
            .await;

        let mut state = planned();
        state.id = Value::Value(2);

        let resource = ContentResource::<License>::new(shared_client(&server));
        let mut diags = Diagnostics::default();
        let (read, _) = resource
            .read(&mut diags, state.clone(), Value::Null, Value::Null)
            .await
            .unwrap();

        assert_eq!(read, state);
    }

    #[test]
    fn content_changes_force_replacement() {
        let prior = planned();
        let mut proposed = planned();
        proposed.license_type = text("text");
        proposed.enabled = Value::Value(false);

        let paths = License::requires_replace(&prior, &proposed);

        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn attachment_needs_attachment_id() {
        let mut state = planned();
        state.license_type = text("attachment");
        let mut diags = Diagnostics::default();

        License::validate(&mut diags, &state);

        assert_eq!(diags.errors.len(), 1);
    }
}
