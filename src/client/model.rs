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

//! Wire types of the REMS API.
//!
//! REMS uses namespaced keys (`form/title`, `field/id`, ...) for most of its
//! content, but plain keys for licenses, workflows, resources and catalogue
//! items. Optional values are never sent as `null`: REMS rejects explicit
//! nulls on most command fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Text keyed by language code (`en`, `fi`, ...).
pub type Localized = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationId {
    #[serde(rename = "organization/id")]
    pub id: String,
}

impl OrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Organization {
    #[serde(rename = "organization/id")]
    pub id: String,
    #[serde(rename = "organization/short-name", default)]
    pub short_name: Localized,
    #[serde(rename = "organization/name", default)]
    pub name: Localized,
    #[serde(rename = "organization/owners", default)]
    pub owners: Vec<UserRef>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub archived: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub userid: String,
}

/// Reply to every `create` command.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    pub id: Option<i64>,
    #[serde(default)]
    pub errors: Option<Vec<serde_json::Value>>,
}

/// Reply to `edit`, `enabled`, `archived` and `delete` commands.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(default)]
    pub errors: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnabledCommand {
    pub id: i64,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedCommand {
    pub id: i64,
    pub archived: bool,
}

// Forms

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTemplate {
    #[serde(rename = "field/id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "field/type")]
    pub field_type: String,
    #[serde(rename = "field/title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Localized>,
    #[serde(
        rename = "field/info-text",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub info_text: Option<Localized>,
    #[serde(
        rename = "field/placeholder",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub placeholder: Option<Localized>,
    #[serde(rename = "field/optional", default)]
    pub optional: bool,
    #[serde(
        rename = "field/max-length",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_length: Option<i64>,
    #[serde(rename = "field/privacy", default, skip_serializing_if = "Option::is_none")]
    pub privacy: Option<String>,
    #[serde(rename = "field/options", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(rename = "field/columns", default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<FieldOption>>,
    #[serde(
        rename = "field/visibility",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub visibility: Option<FieldVisibility>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub key: String,
    #[serde(default)]
    pub label: Localized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVisibility {
    #[serde(rename = "visibility/type")]
    pub visibility_type: String,
    #[serde(
        rename = "visibility/field",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub field: Option<FieldRef>,
    #[serde(
        rename = "visibility/values",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub values: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    #[serde(rename = "field/id")]
    pub id: String,
}

/// Body of `POST /api/forms/create` and, with `id` set, `PUT /api/forms/edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormCommand {
    #[serde(rename = "form/id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub organization: OrganizationId,
    #[serde(rename = "form/title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "form/internal-name")]
    pub internal_name: String,
    #[serde(rename = "form/external-title", skip_serializing_if = "Option::is_none")]
    pub external_title: Option<Localized>,
    #[serde(rename = "form/fields")]
    pub fields: Vec<FieldTemplate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Form {
    #[serde(rename = "form/id")]
    pub id: i64,
    pub organization: OrganizationId,
    #[serde(rename = "form/title", default)]
    pub title: Option<String>,
    #[serde(rename = "form/internal-name", default)]
    pub internal_name: Option<String>,
    #[serde(rename = "form/external-title", default)]
    pub external_title: Option<Localized>,
    #[serde(rename = "form/fields", default)]
    pub fields: Vec<FieldTemplate>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub archived: bool,
}

// Categories

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "category/id")]
    pub id: i64,
}

/// Body of `POST /api/categories/create` and, with `id` set,
/// `PUT /api/categories/edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCommand {
    #[serde(rename = "category/id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "category/title")]
    pub title: Localized,
    #[serde(rename = "category/description", skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized>,
    #[serde(rename = "category/display-order", skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,
    #[serde(rename = "category/children", skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<CategoryRef>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Category {
    #[serde(rename = "category/id")]
    pub id: i64,
    #[serde(rename = "category/title", default)]
    pub title: Localized,
    #[serde(rename = "category/description", default)]
    pub description: Option<Localized>,
    #[serde(rename = "category/display-order", default)]
    pub display_order: Option<i64>,
    #[serde(rename = "category/children", default)]
    pub children: Option<Vec<CategoryRef>>,
}

// Licenses

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseLocalization {
    pub title: String,
    #[serde(default)]
    pub textcontent: String,
    #[serde(
        rename = "attachment-id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub attachment_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateLicenseCommand {
    pub licensetype: String,
    pub organization: OrganizationId,
    pub localizations: BTreeMap<String, LicenseLocalization>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct License {
    pub id: i64,
    pub licensetype: String,
    pub organization: OrganizationId,
    #[serde(default)]
    pub localizations: BTreeMap<String, LicenseLocalization>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub archived: bool,
}

// Workflows

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRef {
    #[serde(rename = "form/id")]
    pub id: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseRef {
    #[serde(rename = "license/id")]
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateWorkflowCommand {
    pub organization: OrganizationId,
    pub title: String,
    #[serde(rename = "type")]
    pub workflow_type: String,
    pub handlers: Vec<String>,
    pub forms: Vec<FormRef>,
    pub licenses: Vec<LicenseRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditWorkflowCommand {
    pub id: i64,
    pub organization: OrganizationId,
    pub title: String,
    pub handlers: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkflowBody {
    #[serde(rename = "type")]
    pub workflow_type: String,
    #[serde(default)]
    pub handlers: Vec<UserRef>,
    #[serde(default)]
    pub forms: Vec<FormRef>,
    #[serde(default)]
    pub licenses: Vec<LicenseRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Workflow {
    pub id: i64,
    pub organization: OrganizationId,
    pub title: String,
    pub workflow: WorkflowBody,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub archived: bool,
}

// Resources

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateResourceCommand {
    pub resid: String,
    pub organization: OrganizationId,
    pub licenses: Vec<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceLicense {
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub resid: String,
    pub organization: OrganizationId,
    #[serde(default)]
    pub licenses: Vec<ResourceLicense>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub archived: bool,
}

// Catalogue items

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogueItemLocalization {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub infourl: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateCatalogueItemCommand {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<i64>,
    pub resid: i64,
    pub wfid: i64,
    pub organization: OrganizationId,
    pub localizations: BTreeMap<String, CatalogueItemLocalization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryRef>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditCatalogueItemCommand {
    pub id: i64,
    pub localizations: BTreeMap<String, CatalogueItemLocalization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryRef>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogueItem {
    pub id: i64,
    #[serde(rename = "resource-id")]
    pub resource_id: i64,
    pub wfid: i64,
    #[serde(default)]
    pub formid: Option<i64>,
    pub organization: OrganizationId,
    #[serde(default)]
    pub localizations: BTreeMap<String, CatalogueItemLocalization>,
    #[serde(default)]
    pub categories: Option<Vec<CategoryRef>>,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub archived: bool,
}
