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

use std::collections::BTreeSet;

use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::utils::{known_str, DisplayJoinable, WithValidate};

use super::state::{FieldState, FormState};

pub const FIELD_TYPES: &[&str] = &[
    "description",
    "email",
    "date",
    "phone-number",
    "table",
    "header",
    "texta",
    "option",
    "label",
    "multiselect",
    "ip-address",
    "attachment",
    "text",
];

const PRIVACIES: &[&str] = &["public", "private"];
const VISIBILITIES: &[&str] = &["always", "only-if"];

impl<'a> WithValidate for FormState<'a> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        let Value::Value(fields) = &self.fields else {
            return;
        };

        let mut ids = BTreeSet::new();
        for (i, field) in fields.iter().enumerate() {
            let Value::Value(field) = field else {
                continue;
            };
            let attr_path = attr_path.clone().attribute("fields").index(i as i64);

            if let Some(id) = known_str(&field.id) {
                if !ids.insert(id) {
                    diags.error(
                        "Duplicate field id",
                        format!("Field id `{id}` is used by more than one field."),
                        attr_path.clone().attribute("id"),
                    );
                }
            }

            field.validate(diags, attr_path);
        }
    }
}

impl<'a> WithValidate for FieldState<'a> {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Some(field_type) = known_str(&self.field_type) {
            if !FIELD_TYPES.contains(&field_type) {
                diags.error(
                    "Unknown field type",
                    format!(
                        "`{field_type}` is not one of: {}.",
                        FIELD_TYPES.iter().join_with(", ")
                    ),
                    attr_path.clone().attribute("type"),
                );
            }
            if matches!(field_type, "option" | "multiselect") && self.options.is_null() {
                diags.error(
                    "Missing options",
                    format!("A `{field_type}` field needs `options`."),
                    attr_path.clone().attribute("options"),
                );
            }
            if field_type == "table" && self.columns.is_null() {
                diags.error(
                    "Missing columns",
                    "A `table` field needs `columns`.",
                    attr_path.clone().attribute("columns"),
                );
            }
        }

        if self.title.is_null() {
            diags.error(
                "Missing field title",
                "REMS requires every field to have a title.",
                attr_path.clone().attribute("title"),
            );
        }

        if let Some(privacy) = known_str(&self.privacy) {
            if !PRIVACIES.contains(&privacy) {
                diags.error(
                    "Invalid privacy",
                    format!("`{privacy}` must be `public` or `private`."),
                    attr_path.clone().attribute("privacy"),
                );
            }
        }

        if let Value::Value(visibility) = &self.visibility {
            let attr_path = attr_path.attribute("visibility");
            match known_str(&visibility.visibility_type) {
                Some("only-if") if visibility.field.is_null() => diags.error(
                    "Missing visibility field",
                    "`only-if` visibility needs the `field` it depends on.",
                    attr_path.attribute("field"),
                ),
                Some(visibility_type) if !VISIBILITIES.contains(&visibility_type) => diags.error(
                    "Invalid visibility type",
                    format!("`{visibility_type}` must be `always` or `only-if`."),
                    attr_path.attribute("type"),
                ),
                _ => (),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::state::{FieldOptionState, FieldVisibilityState};
    use crate::testing::{localized_state, text};

    fn validate(fields: Vec<FieldState<'_>>) -> Diagnostics {
        let state = FormState {
            fields: Value::Value(fields.into_iter().map(Value::Value).collect()),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        state.validate(&mut diags, AttributePath::default());
        diags
    }

    fn field<'a>(field_type: &'a str) -> FieldState<'a> {
        FieldState {
            field_type: text(field_type),
            title: localized_state(&[("en", "Title")]),
            ..Default::default()
        }
    }

    #[test]
    fn accepts_well_formed_fields() {
        let mut choice = field("multiselect");
        choice.options = Value::Value(vec![Value::Value(FieldOptionState {
            key: text("a"),
            label: localized_state(&[("en", "A")]),
        })]);
        let mut conditional = field("text");
        conditional.visibility = Value::Value(FieldVisibilityState {
            visibility_type: text("only-if"),
            field: text("fld1"),
            values: Value::Value(vec![text("a")]),
        });

        assert!(validate(vec![field("header"), choice, conditional]).errors.is_empty());
    }

    #[test]
    fn rejects_unknown_type_and_missing_title() {
        let mut untitled = field("label");
        untitled.title = Value::Null;

        let diags = validate(vec![field("checkbox"), untitled]);

        assert_eq!(diags.errors.len(), 2);
    }

    #[test]
    fn unknown_values_are_not_checked() {
        let mut pending = field("text");
        pending.field_type = Value::Unknown;
        pending.title = Value::Unknown;
        pending.privacy = Value::Unknown;

        assert!(validate(vec![pending]).errors.is_empty());
    }

    #[test]
    fn rejects_missing_options_and_columns() {
        let diags = validate(vec![field("option"), field("table")]);
        assert_eq!(diags.errors.len(), 2);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut first = field("header");
        first.id = text("fld1");
        let mut second = field("label");
        second.id = text("fld1");

        assert_eq!(validate(vec![first, second]).errors.len(), 1);
    }

    #[test]
    fn only_if_visibility_needs_field() {
        let mut conditional = field("text");
        conditional.visibility = Value::Value(FieldVisibilityState {
            visibility_type: text("only-if"),
            ..Default::default()
        });
        conditional.privacy = text("secret");

        assert_eq!(validate(vec![conditional]).errors.len(), 2);
    }
}
