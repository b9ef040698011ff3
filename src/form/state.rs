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

use serde::{Deserialize, Serialize};
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueBool, ValueList, ValueMap, ValueNumber, ValueString};
use tf_provider::map;

use crate::content::ContentState;
use crate::utils::{attribute, localized_type, WithSchema};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState<'a> {
    pub id: ValueNumber,
    #[serde(borrow = "'a")]
    pub organization_id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub title: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub external_title: ValueMap<'a, ValueString<'a>>,
    pub enabled: ValueBool,
    #[serde(borrow = "'a")]
    pub fields: ValueList<Value<FieldState<'a>>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldState<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    #[serde(borrow = "'a", rename = "type")]
    pub field_type: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub title: ValueMap<'a, ValueString<'a>>,
    #[serde(borrow = "'a")]
    pub info: ValueMap<'a, ValueString<'a>>,
    #[serde(borrow = "'a")]
    pub placeholder: ValueMap<'a, ValueString<'a>>,
    pub optional: ValueBool,
    pub max_length: ValueNumber,
    #[serde(borrow = "'a")]
    pub privacy: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub options: ValueList<Value<FieldOptionState<'a>>>,
    #[serde(borrow = "'a")]
    pub columns: ValueList<Value<FieldOptionState<'a>>>,
    #[serde(borrow = "'a")]
    pub visibility: Value<FieldVisibilityState<'a>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptionState<'a> {
    #[serde(borrow = "'a")]
    pub key: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub label: ValueMap<'a, ValueString<'a>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVisibilityState<'a> {
    #[serde(borrow = "'a", rename = "type")]
    pub visibility_type: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub field: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub values: ValueList<ValueString<'a>>,
}

impl<'a> ContentState<'a> for FormState<'a> {
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

fn option_attributes(what: &str) -> HashMap<String, Attribute> {
    map! {
        "key" => attribute(
            AttributeType::String,
            AttributeConstraint::Required,
            &format!("Key stored in the application when this {what} is picked"),
        ),
        "label" => attribute(
            localized_type(),
            AttributeConstraint::Required,
            "Label of the entry, by language",
        ),
    }
}

fn field_attributes() -> HashMap<String, Attribute> {
    map! {
        "id" => attribute(
            AttributeType::String,
            AttributeConstraint::OptionalComputed,
            "Field identifier within the form, assigned by REMS when unset",
        ),
        "type" => attribute(
            AttributeType::String,
            AttributeConstraint::Required,
            "Field type: description, email, date, phone-number, table, header, texta, option, label, multiselect, ip-address, attachment or text",
        ),
        "title" => attribute(
            localized_type(),
            AttributeConstraint::Optional,
            "Title of the field, by language",
        ),
        "info" => attribute(
            localized_type(),
            AttributeConstraint::Optional,
            "Additional information shown next to the field, by language",
        ),
        "placeholder" => attribute(
            localized_type(),
            AttributeConstraint::Optional,
            "Placeholder of the input, by language",
        ),
        "optional" => attribute(
            AttributeType::Bool,
            AttributeConstraint::OptionalComputed,
            "Whether the applicant may leave the field empty (default: false)",
        ),
        "max_length" => attribute(
            AttributeType::Number,
            AttributeConstraint::Optional,
            "Maximum length of text answers",
        ),
        "privacy" => attribute(
            AttributeType::String,
            AttributeConstraint::Optional,
            "Whether reviewers see the answer: public or private",
        ),
        "options" => attribute(
            AttributeType::AttributeList(option_attributes("option")),
            AttributeConstraint::Optional,
            "Choices of option and multiselect fields",
        ),
        "columns" => attribute(
            AttributeType::AttributeList(option_attributes("column")),
            AttributeConstraint::Optional,
            "Columns of table fields",
        ),
        "visibility" => attribute(
            AttributeType::AttributeSingle(map! {
                "type" => attribute(
                    AttributeType::String,
                    AttributeConstraint::Required,
                    "always or only-if",
                ),
                "field" => attribute(
                    AttributeType::String,
                    AttributeConstraint::Optional,
                    "Id of the field the visibility depends on",
                ),
                "values" => attribute(
                    AttributeType::List(Box::new(AttributeType::String)),
                    AttributeConstraint::Optional,
                    "Values of `field` making this field visible",
                ),
            }),
            AttributeConstraint::Optional,
            "Show the field only for some answers of another field",
        ),
    }
}

impl<'a> WithSchema for FormState<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain("Form internal identifier"),
                        constraint: AttributeConstraint::Computed,
                        sensitive: false,
                        deprecated: false,
                    },
                    "organization_id" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Organization owning the form"),
                        constraint: AttributeConstraint::Required,
                        sensitive: false,
                        deprecated: false,
                    },
                    "title" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::plain("Internal name of the form"),
                        constraint: AttributeConstraint::Required,
                        sensitive: false,
                        deprecated: false,
                    },
                    "external_title" => Attribute {
                        attr_type: localized_type(),
                        description: Description::plain("Title shown to applicants, by language"),
                        constraint: AttributeConstraint::Optional,
                        sensitive: false,
                        deprecated: false,
                    },
                    "enabled" => Attribute {
                        attr_type: AttributeType::Bool,
                        description: Description::plain(
                            "Whether the form can be used (default: true)",
                        ),
                        constraint: AttributeConstraint::OptionalComputed,
                        sensitive: false,
                        deprecated: false,
                    },
                    "fields" => Attribute {
                        attr_type: AttributeType::AttributeList(field_attributes()),
                        description: Description::plain("Fields of the form, in display order"),
                        constraint: AttributeConstraint::Required,
                        sensitive: false,
                        deprecated: false,
                    },
                },
                description: Description::plain("REMS application form"),
                ..Default::default()
            },
        }
    }
}
