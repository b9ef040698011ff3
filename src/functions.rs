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

//! Provider functions building form field objects.
//!
//! `form_field_header` and `form_field_label` return fields that fit in the
//! `fields` list of `remscontent_form` without repeating `type` and
//! `optional` for static content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{Description, FunctionSchema, Parameter, Type};
use tf_provider::value::{Value, ValueBool, ValueMap, ValueString};
use tf_provider::{map, Diagnostics, Function};

/// Field object returned by the functions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticField<'a> {
    #[serde(borrow = "'a")]
    pub id: ValueString<'a>,
    #[serde(borrow = "'a")]
    pub title: ValueMap<'a, ValueString<'a>>,
    #[serde(borrow = "'a", rename = "type")]
    pub field_type: ValueString<'a>,
    pub optional: ValueBool,
}

fn field_schema(field_type: &str, description: String) -> FunctionSchema {
    FunctionSchema {
        parameters: vec![
            Parameter {
                name: "field_id".into(),
                param_type: Type::String,
                allow_null: true,
                description: Description::plain("Field id, null to let REMS assign one"),
                ..Default::default()
            },
            Parameter {
                name: "title".into(),
                param_type: Type::Map(Box::new(Type::String)),
                description: Description::plain("Text of the field, by language"),
                ..Default::default()
            },
        ],
        return_type: Type::Object(map! {
            "id" => Type::String,
            "title" => Type::Map(Box::new(Type::String)),
            "type" => Type::String,
            "optional" => Type::Bool,
        }),
        summary: format!("Field template for a {field_type}"),
        description: Description::markdown(description),
        ..Default::default()
    }
}

fn static_field<'a>(
    diags: &mut Diagnostics,
    field_type: &'static str,
    (field_id, title): (ValueString<'a>, ValueMap<'a, ValueString<'a>>),
) -> Option<StaticField<'a>> {
    match &title {
        Value::Null => {
            diags.root_error(
                format!("Missing {field_type} title"),
                "`title` must not be null.",
            );
            return None;
        }
        Value::Value(title) if title.is_empty() => {
            diags.root_error(
                format!("Empty {field_type} title"),
                "`title` needs at least one language.",
            );
            return None;
        }
        _ => (),
    }

    Some(StaticField {
        id: field_id,
        title,
        field_type: Value::Value(field_type.into()),
        optional: Value::Value(false),
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FormFieldHeaderFunction;

#[async_trait]
impl Function for FormFieldHeaderFunction {
    type Input<'a> = (ValueString<'a>, ValueMap<'a, ValueString<'a>>);
    type Output<'a> = StaticField<'a>;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<FunctionSchema> {
        Some(field_schema(
            "header",
            "Build a `header` field for the `fields` of a remscontent_form.".into(),
        ))
    }

    async fn call<'a>(
        &self,
        diags: &mut Diagnostics,
        params: Self::Input<'a>,
    ) -> Option<Self::Output<'a>> {
        static_field(diags, "header", params)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FormFieldLabelFunction;

#[async_trait]
impl Function for FormFieldLabelFunction {
    type Input<'a> = (ValueString<'a>, ValueMap<'a, ValueString<'a>>);
    type Output<'a> = StaticField<'a>;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<FunctionSchema> {
        Some(field_schema(
            "label",
            "Build a `label` field for the `fields` of a remscontent_form. \
             Takes `(field_id, title)` like `form_field_header`, where `title` is a map of \
             text by language, instead of a single string."
                .into(),
        ))
    }

    async fn call<'a>(
        &self,
        diags: &mut Diagnostics,
        params: Self::Input<'a>,
    ) -> Option<Self::Output<'a>> {
        static_field(diags, "label", params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{localized_state, text};

    #[tokio::test]
    async fn header_builds_static_field() {
        let mut diags = Diagnostics::default();
        let field = FormFieldHeaderFunction
            .call(&mut diags, (text("intro"), localized_state(&[("en", "Introduction")])))
            .await
            .unwrap();

        assert_eq!(
            field,
            StaticField {
                id: text("intro"),
                title: localized_state(&[("en", "Introduction")]),
                field_type: text("header"),
                optional: Value::Value(false),
            }
        );
    }

    #[tokio::test]
    async fn label_keeps_null_id() {
        let mut diags = Diagnostics::default();
        let field = FormFieldLabelFunction
            .call(&mut diags, (Value::Null, localized_state(&[("fi", "Huom")])))
            .await
            .unwrap();

        assert!(field.id.is_null());
        assert_eq!(field.field_type, text("label"));
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn null_title_is_an_error() {
        let mut diags = Diagnostics::default();
        let field = FormFieldLabelFunction
            .call(&mut diags, (text("note"), Value::Null))
            .await;

        assert!(field.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn schema_names_field_type() {
        let mut diags = Diagnostics::default();
        let schema = FormFieldHeaderFunction.schema(&mut diags).unwrap();

        assert_eq!(schema.parameters.len(), 2);
        assert!(schema.parameters[0].allow_null);
        assert_eq!(schema.summary, "Field template for a header");
    }

    #[test]
    fn label_describes_title_map() {
        let mut diags = Diagnostics::default();
        let schema = FormFieldLabelFunction.schema(&mut diags).unwrap();

        assert_eq!(schema.parameters[0].name, "field_id");
        assert_eq!(schema.parameters[1].param_type, Type::Map(Box::new(Type::String)));
        assert!(schema.description.content.contains("`(field_id, title)`"));
        assert!(schema.description.content.contains("map of text by language"));
    }
}
