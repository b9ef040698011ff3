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

//! `remscontent_category`: catalogue categories.
//!
//! Categories are the only REMS content that can be deleted; they have no
//! enabled flag.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{AttributeConstraint, AttributeType, Block, Description, Schema};
use tf_provider::value::{Value, ValueList, ValueMap, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};
use tracing::info;

use crate::client::model::{self, CategoryCommand, CategoryRef};
use crate::client::{Kind, RemsClient, RemsError};
use crate::content::{Content, ContentState};
use crate::utils::{
    attribute, localized, localized_type, localized_value, localized_value_like, numbers,
    numbers_value_like, Reported,
};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryState<'a> {
    pub id: ValueNumber,
    #[serde(borrow = "'a")]
    pub title: ValueMap<'a, ValueString<'a>>,
    #[serde(borrow = "'a")]
    pub description: ValueMap<'a, ValueString<'a>>,
    pub display_order: ValueNumber,
    pub children: ValueList<ValueNumber>,
}

impl<'a> ContentState<'a> for CategoryState<'a> {
    fn id(&self) -> &ValueNumber {
        &self.id
    }
    fn id_mut(&mut self) -> &mut ValueNumber {
        &mut self.id
    }
}

impl CategoryState<'_> {
    fn command(&self, id: Option<i64>) -> CategoryCommand {
        CategoryCommand {
            id,
            title: localized(&self.title).unwrap_or_default(),
            description: localized(&self.description),
            display_order: self.display_order.as_ref_option().copied(),
            children: numbers(&self.children)
                .map(|children| children.into_iter().map(|id| CategoryRef { id }).collect()),
        }
    }
}

#[derive(Debug, Default)]
pub struct Category;

#[async_trait]
impl Content for Category {
    const NAME: &'static str = "category";
    const KIND: Option<Kind> = None;

    type State<'a> = CategoryState<'a>;
    type Remote = model::Category;

    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "id" => attribute(AttributeType::Number, AttributeConstraint::Computed, "Category identifier"),
                    "title" => attribute(localized_type(), AttributeConstraint::Required, "Title of the category, by language"),
                    "description" => attribute(localized_type(), AttributeConstraint::Optional, "Description of the category, by language"),
                    "display_order" => attribute(AttributeType::Number, AttributeConstraint::Optional, "Position of the category among its siblings"),
                    "children" => attribute(
                        AttributeType::List(Box::new(AttributeType::Number)),
                        AttributeConstraint::Optional,
                        "Ids of the sub-categories",
                    ),
                },
                description: Description::plain("REMS catalogue category"),
                ..Default::default()
            },
        }
    }

    fn validate(diags: &mut Diagnostics, config: &Self::State<'_>) {
        if let Value::Value(title) = &config.title {
            if title.is_empty() {
                diags.error(
                    "Empty category title",
                    "At least one language must be given.",
                    AttributePath::new("title"),
                );
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
            .create_category(&planned.command(None))
            .await
            .reported(diags, "Failure to create category")
    }

    async fn fetch(client: &RemsClient, id: i64) -> Result<Self::Remote, RemsError> {
        client.get_category(id).await
    }

    fn apply(remote: Self::Remote, state: &mut Self::State<'_>) {
        state.id = Value::Value(remote.id);
        state.title = localized_value(remote.title);
        state.description = localized_value_like(&state.description, remote.description);
        state.display_order = remote.display_order.map_or(Value::Null, Value::Value);
        state.children = numbers_value_like(
            &state.children,
            remote
                .children
                .unwrap_or_default()
                .into_iter()
                .map(|child| child.id)
                .collect(),
        );
    }

    async fn update<'a>(
        client: &RemsClient,
        diags: &mut Diagnostics,
        id: i64,
        _prior: &Self::State<'a>,
        planned: &Self::State<'a>,
    ) -> Option<()> {
        client
            .edit_category(&planned.command(Some(id)))
            .await
            .reported(diags, "Failure to update category")
    }

    async fn delete(client: &RemsClient, diags: &mut Diagnostics, id: i64) -> Option<()> {
        client
            .delete_category(id)
            .await
            .reported(diags, "Failure to delete category")?;
        info!(id, "deleted category");
        Some(())
    }
}
