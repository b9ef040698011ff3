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

use std::marker::PhantomData;

use async_trait::async_trait;
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};
use tracing::info;

use crate::client::RemsClient;
use crate::provider::SharedClient;
use crate::utils::Reported;

use super::{apply_enabled, Content, ContentState};

#[derive(Debug)]
pub struct ContentResource<T: Content> {
    client: SharedClient,
    content: PhantomData<T>,
}

impl<T: Content> ContentResource<T> {
    pub fn new(client: SharedClient) -> Self {
        Self {
            client,
            content: PhantomData,
        }
    }

    /// Read back values REMS assigned during a write.
    ///
    /// Values that cannot be read back are set to null: the object exists and
    /// its state must be saved with known values.
    async fn resolve<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        id: i64,
        state: &mut T::State<'a>,
    ) {
        if T::has_unknowns(state) {
            let remote = T::fetch(client, id)
                .await
                .reported(diags, &format!("Failure to read back {}", T::NAME));
            if let Some(remote) = remote {
                T::resolve(remote, state);
            }
            T::clear_unknowns(state);
        }
    }

    /// Push the planned `enabled` flag. On failure the state keeps `current`,
    /// the value REMS still holds.
    async fn push_enabled<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        id: i64,
        state: &mut T::State<'a>,
        current: bool,
    ) {
        let Some(kind) = T::KIND else {
            return;
        };
        let Some(enabled) = state.enabled_mut() else {
            return;
        };
        if apply_enabled(client, diags, kind, id, enabled, current)
            .await
            .is_none()
        {
            *enabled = Value::Value(current);
        }
    }
}

fn default_enabled<'a, S: ContentState<'a>>(state: &mut S) {
    if let Some(enabled) = state.enabled_mut() {
        if enabled.is_null() {
            *enabled = Value::Value(true);
        }
    }
}

#[async_trait]
impl<T: Content> Resource for ContentResource<T> {
    type State<'a> = T::State<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(T::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        T::validate(diags, &config);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Some(id) = state.id().as_ref_option().copied() else {
            return Some((state, private_state));
        };
        let Some(client) = self.client.get(diags) else {
            return Some((state, private_state));
        };

        match T::fetch(&client, id).await {
            Ok(remote) => {
                let mut state = state;
                T::apply(remote, &mut state);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                diags.root_warning(
                    format!("{} {id} no longer exists", T::NAME),
                    "It has been removed outside of Terraform and will be dropped from the state.",
                );
                None
            }
            Err(err) => {
                diags.root_error(format!("Failure to read {}", T::NAME), err.to_string());
                Some((state, private_state))
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        *state.id_mut() = Value::Unknown;
        default_enabled(&mut state);
        T::normalize(&mut state);

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<AttributePath>,
    )> {
        let trigger_replace = T::requires_replace(&prior_state, &proposed_state);

        let mut state = proposed_state;
        *state.id_mut() = prior_state.id().clone();
        default_enabled(&mut state);
        T::normalize(&mut state);

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let mut state = planned_state;

        let id = T::create(&client, diags, &state).await?;
        *state.id_mut() = Value::Value(id);
        info!(id, kind = T::NAME, "created");

        // New content is enabled
        Self::push_enabled(&client, diags, id, &mut state, true).await;
        Self::resolve(&client, diags, id, &mut state).await;

        Some((state, private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let Some(id) = prior_state.id().as_ref_option().copied() else {
            diags.root_error(
                format!("Failure to update {}", T::NAME),
                "The prior state has no id.",
            );
            return None;
        };

        let mut state = planned_state;
        *state.id_mut() = Value::Value(id);

        T::update(&client, diags, id, &prior_state, &state).await?;
        info!(id, kind = T::NAME, "updated");

        let current = prior_state
            .enabled()
            .and_then(|enabled| enabled.as_ref_option().copied())
            .unwrap_or(true);
        Self::push_enabled(&client, diags, id, &mut state, current).await;
        Self::resolve(&client, diags, id, &mut state).await;

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let Some(id) = state.id().as_ref_option().copied() else {
            return Some(());
        };
        let client = self.client.get(diags)?;

        T::delete(&client, diags, id).await
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let Ok(id) = id.trim().parse::<i64>() else {
            diags.root_error(
                format!("Invalid {} import id", T::NAME),
                format!("Expected the numeric REMS id, got `{id}`."),
            );
            return None;
        };

        let mut state = Self::State::default();
        *state.id_mut() = Value::Value(id);
        Some((state, Default::default()))
    }
}
