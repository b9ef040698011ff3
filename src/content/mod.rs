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

//! Shared lifecycle of REMS content resources.
//!
//! Every REMS object managed by the provider follows the same shape: a
//! numeric id assigned by REMS, a `create` command, a `GET` by id, an optional
//! `edit` command and an `enabled`/`archived` pair instead of deletion. The
//! differences are captured by [`Content`]; [`ContentResource`] implements the
//! Terraform lifecycle once for all of them.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::Schema;
use tf_provider::value::{Value, ValueBool, ValueNumber};
use tf_provider::{AttributePath, Diagnostics};
use tracing::info;

use crate::client::{Kind, RemsClient, RemsError};
use crate::utils::Reported;

mod resource;

pub use resource::ContentResource;

/// Terraform state of a REMS object.
pub trait ContentState<'a>:
    Send + Sync + Clone + Debug + Default + PartialEq + Serialize + Deserialize<'a>
{
    fn id(&self) -> &ValueNumber;
    fn id_mut(&mut self) -> &mut ValueNumber;

    /// The `enabled` attribute, for objects that have one.
    fn enabled(&self) -> Option<&ValueBool> {
        None
    }
    fn enabled_mut(&mut self) -> Option<&mut ValueBool> {
        None
    }
}

#[async_trait]
pub trait Content: Debug + Send + Sync + 'static {
    /// Human readable name used in diagnostics.
    const NAME: &'static str;
    /// Kind used for the `enabled`/`archived` endpoints, if any.
    const KIND: Option<Kind>;

    type State<'a>: ContentState<'a>;
    /// Object as returned by REMS.
    type Remote: Send + Sync;

    fn schema() -> Schema;

    fn validate(_diags: &mut Diagnostics, _config: &Self::State<'_>) {}

    /// Fill defaults and mark computed values unknown while planning.
    fn normalize(_state: &mut Self::State<'_>) {}

    /// Attributes REMS cannot edit in place.
    fn requires_replace(
        prior: &Self::State<'_>,
        proposed: &Self::State<'_>,
    ) -> Vec<AttributePath>;

    async fn create<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        planned: &Self::State<'a>,
    ) -> Option<i64>;

    async fn fetch(client: &RemsClient, id: i64) -> Result<Self::Remote, RemsError>;

    /// Copy a REMS object into the state, keeping unset attributes null where
    /// REMS reports an empty value.
    fn apply(remote: Self::Remote, state: &mut Self::State<'_>);

    /// Whether values left unknown at plan time need to be read back after a
    /// write.
    fn has_unknowns(_state: &Self::State<'_>) -> bool {
        false
    }

    /// Fill values left unknown at plan time from a freshly written object.
    fn resolve(_remote: Self::Remote, _state: &mut Self::State<'_>) {}

    /// Set values still unknown after a write to null.
    fn clear_unknowns(_state: &mut Self::State<'_>) {}

    async fn update<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        id: i64,
        prior: &Self::State<'a>,
        planned: &Self::State<'a>,
    ) -> Option<()>;

    /// REMS keeps content for existing applications: retire it instead of
    /// deleting it.
    async fn delete(client: &RemsClient, diags: &mut Diagnostics, id: i64) -> Option<()> {
        let Some(kind) = Self::KIND else {
            return Some(());
        };
        client
            .set_enabled(kind, id, false)
            .await
            .reported(diags, &format!("Failure to disable {}", Self::NAME))?;
        client
            .set_archived(kind, id, true)
            .await
            .reported(diags, &format!("Failure to archive {}", Self::NAME))?;
        info!(id, kind = Self::NAME, "archived");
        Some(())
    }
}

/// Push the planned `enabled` flag when it differs from `current`.
pub(crate) async fn apply_enabled(
    client: &RemsClient,
    diags: &mut Diagnostics,
    kind: Kind,
    id: i64,
    planned: &ValueBool,
    current: bool,
) -> Option<()> {
    match planned {
        Value::Value(enabled) if *enabled != current => client
            .set_enabled(kind, id, *enabled)
            .await
            .reported(diags, "Failure to change enabled flag"),
        _ => Some(()),
    }
}

/// Copy the `enabled` flag read from REMS. A reply without it leaves the state
/// unchanged.
pub(crate) fn read_enabled(state: &mut ValueBool, remote: Option<bool>) {
    if let Some(enabled) = remote {
        *state = Value::Value(enabled);
    }
}
