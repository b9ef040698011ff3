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

//! `remscontent_form`: application forms and their fields.

use async_trait::async_trait;
use tf_provider::schema::Schema;
use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{model, Kind, RemsClient, RemsError};
use crate::content::Content;
use crate::utils::{Reported, WithSchema, WithValidate};

mod convert;
mod state;
mod validate;

pub use state::{FieldState, FormState};

#[derive(Debug, Default)]
pub struct Form;

#[async_trait]
impl Content for Form {
    const NAME: &'static str = "form";
    const KIND: Option<Kind> = Some(Kind::Forms);

    type State<'a> = FormState<'a>;
    type Remote = model::Form;

    fn schema() -> Schema {
        FormState::schema()
    }

    fn validate(diags: &mut Diagnostics, config: &Self::State<'_>) {
        config.validate(diags, AttributePath::default());
    }

    fn normalize(state: &mut Self::State<'_>) {
        let Value::Value(fields) = &mut state.fields else {
            return;
        };
        for field in fields.iter_mut().flatten() {
            if field.id.is_null() {
                field.id = Value::Unknown;
            }
            if field.optional.is_null() {
                field.optional = Value::Value(false);
            }
        }
    }

    fn requires_replace(
        _prior: &Self::State<'_>,
        _proposed: &Self::State<'_>,
    ) -> Vec<AttributePath> {
        Vec::new()
    }

    async fn create<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        planned: &Self::State<'a>,
    ) -> Option<i64> {
        client
            .create_form(&convert::form_command(planned, None))
            .await
            .reported(diags, "Failure to create form")
    }

    async fn fetch(client: &RemsClient, id: i64) -> Result<Self::Remote, RemsError> {
        client.get_form(id).await
    }

    fn apply(remote: Self::Remote, state: &mut Self::State<'_>) {
        convert::apply_form(remote, state);
    }

    fn has_unknowns(state: &Self::State<'_>) -> bool {
        state
            .fields
            .iter()
            .flatten()
            .flatten()
            .any(|field| field.id.is_unknown())
    }

    fn resolve(remote: Self::Remote, state: &mut Self::State<'_>) {
        convert::resolve_field_ids(&remote, state);
    }

    fn clear_unknowns(state: &mut Self::State<'_>) {
        let Value::Value(fields) = &mut state.fields else {
            return;
        };
        for field in fields.iter_mut().flatten() {
            if field.id.is_unknown() {
                field.id = Value::Null;
            }
        }
    }

    async fn update<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        id: i64,
        _prior: &Self::State<'a>,
        planned: &Self::State<'a>,
    ) -> Option<()> {
        client
            .edit_form(&convert::form_command(planned, Some(id)))
            .await
            .reported(diags, "Failure to update form")
    }
}
