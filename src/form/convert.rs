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

//! Mapping between form state and REMS form commands.
//!
//! Each Terraform field becomes one nested `field/*` object, in declaration
//! order. Null and unknown attributes are left out of the command.

use tf_provider::value::{Value, ValueList};

use crate::client::model::{
    FieldOption, FieldRef, FieldTemplate, FieldVisibility, Form, FormCommand, OrganizationId,
};
use crate::content::read_enabled;
use crate::utils::{
    known_string, list_value_like, localized, localized_value, localized_value_like,
    optional_string_value, string_value, strings, strings_value_like,
};

use super::state::{FieldOptionState, FieldState, FieldVisibilityState, FormState};

pub(super) fn form_command(state: &FormState<'_>, id: Option<i64>) -> FormCommand {
    let title = known_string(&state.title).unwrap_or_default();
    FormCommand {
        id,
        organization: OrganizationId::new(known_string(&state.organization_id).unwrap_or_default()),
        title: Some(title.clone()),
        internal_name: title,
        external_title: localized(&state.external_title),
        fields: state
            .fields
            .iter()
            .flatten()
            .flatten()
            .map(field_template)
            .collect(),
    }
}

pub(super) fn field_template(field: &FieldState<'_>) -> FieldTemplate {
    FieldTemplate {
        id: known_string(&field.id),
        field_type: known_string(&field.field_type).unwrap_or_default(),
        title: localized(&field.title),
        info_text: localized(&field.info),
        placeholder: localized(&field.placeholder),
        optional: field.optional.as_ref_option().copied().unwrap_or(false),
        max_length: field.max_length.as_ref_option().copied(),
        privacy: known_string(&field.privacy),
        options: field_options(&field.options),
        columns: field_options(&field.columns),
        visibility: field.visibility.as_ref_option().map(field_visibility),
    }
}

fn field_options(options: &ValueList<Value<FieldOptionState<'_>>>) -> Option<Vec<FieldOption>> {
    options.as_ref_option().map(|options| {
        options
            .iter()
            .flatten()
            .map(|option| FieldOption {
                key: known_string(&option.key).unwrap_or_default(),
                label: localized(&option.label).unwrap_or_default(),
            })
            .collect()
    })
}

fn field_visibility(visibility: &FieldVisibilityState<'_>) -> FieldVisibility {
    FieldVisibility {
        visibility_type: known_string(&visibility.visibility_type).unwrap_or_default(),
        field: known_string(&visibility.field).map(|id| FieldRef { id }),
        values: strings(&visibility.values),
    }
}

/// Copy a form read from REMS into `state`.
pub(super) fn apply_form(form: Form, state: &mut FormState<'_>) {
    state.id = Value::Value(form.id);
    state.organization_id = string_value(form.organization.id);
    if let Some(title) = form.internal_name.or(form.title) {
        state.title = string_value(title);
    }
    state.external_title = localized_value_like(&state.external_title, form.external_title);
    read_enabled(&mut state.enabled, form.enabled);

    let prior = state.fields.as_ref_option().cloned().unwrap_or_default();
    state.fields = Value::Value(
        form.fields
            .into_iter()
            .enumerate()
            .map(|(i, template)| {
                let prior = prior
                    .get(i)
                    .and_then(|field| field.as_ref_option())
                    .cloned()
                    .unwrap_or_default();
                Value::Value(field_state(template, &prior))
            })
            .collect(),
    );
}

/// Fill the field ids REMS assigned to fields declared without one.
pub(super) fn resolve_field_ids(form: &Form, state: &mut FormState<'_>) {
    let Value::Value(fields) = &mut state.fields else {
        return;
    };
    for (field, template) in fields.iter_mut().flatten().zip(&form.fields) {
        if field.id.is_unknown() {
            field.id = optional_string_value(template.id.clone());
        }
    }
}

/// Convert a field read from REMS, keeping null the attributes that are unset
/// in `prior` and that REMS reports with their default value.
fn field_state<'a>(template: FieldTemplate, prior: &FieldState<'_>) -> FieldState<'a> {
    let privacy = match template.privacy {
        Some(privacy) if privacy == "public" && prior.privacy.is_null() => None,
        privacy => privacy,
    };
    let visibility = match template.visibility {
        Some(visibility)
            if visibility.visibility_type == "always"
                && visibility.field.is_none()
                && prior.visibility.is_null() =>
        {
            None
        }
        visibility => visibility,
    };

    FieldState {
        id: optional_string_value(template.id),
        field_type: string_value(template.field_type),
        title: localized_value_like(&prior.title, template.title),
        info: localized_value_like(&prior.info, template.info_text),
        placeholder: localized_value_like(&prior.placeholder, template.placeholder),
        optional: Value::Value(template.optional),
        max_length: template.max_length.map_or(Value::Null, Value::Value),
        privacy: optional_string_value(privacy),
        options: options_state(&prior.options, template.options),
        columns: options_state(&prior.columns, template.columns),
        visibility: visibility.map_or(Value::Null, |visibility| {
            let prior_values = prior
                .visibility
                .as_ref_option()
                .map(|prior| prior.values.clone())
                .unwrap_or_default();
            Value::Value(FieldVisibilityState {
                visibility_type: string_value(visibility.visibility_type),
                field: optional_string_value(visibility.field.map(|field| field.id)),
                values: strings_value_like(&prior_values, visibility.values.unwrap_or_default()),
            })
        }),
    }
}

fn options_state<'a>(
    prior: &ValueList<Value<FieldOptionState<'_>>>,
    options: Option<Vec<FieldOption>>,
) -> ValueList<Value<FieldOptionState<'a>>> {
    list_value_like(
        prior,
        options
            .unwrap_or_default()
            .into_iter()
            .map(|option| {
                Value::Value(FieldOptionState {
                    key: string_value(option.key),
                    label: localized_value(option.label),
                })
            })
            .collect(),
    )
}
