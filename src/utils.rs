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

use std::borrow::Cow;
use std::cell::RefCell;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description, Schema};
use tf_provider::value::{Value, ValueList, ValueMap, ValueNumber, ValueString};
use tf_provider::{AttributePath, Diagnostics};

use crate::client::{model::Localized, RemsError};

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

pub(crate) trait WithValidate {
    fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath);
}

/// Report a failed REMS call as a root diagnostic.
pub(crate) trait Reported<T> {
    fn reported(self, diags: &mut Diagnostics, summary: &str) -> Option<T>;
}

impl<T> Reported<T> for Result<T, RemsError> {
    fn reported(self, diags: &mut Diagnostics, summary: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                diags.root_error(summary.to_owned(), err.to_string());
                None
            }
        }
    }
}

pub(crate) fn attribute(
    attr_type: AttributeType,
    constraint: AttributeConstraint,
    description: &str,
) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        sensitive: false,
        deprecated: false,
    }
}

pub(crate) fn localized_type() -> AttributeType {
    AttributeType::Map(Box::new(AttributeType::String))
}

pub(crate) fn known_str<'v>(value: &'v ValueString<'_>) -> Option<&'v str> {
    value.as_deref_option()
}

pub(crate) fn known_string(value: &ValueString<'_>) -> Option<String> {
    value.as_deref_option().map(str::to_owned)
}

pub(crate) fn string_value<'a>(value: impl Into<String>) -> ValueString<'a> {
    Value::Value(Cow::Owned(value.into()))
}

pub(crate) fn optional_string_value<'a>(value: Option<String>) -> ValueString<'a> {
    value.map_or(Value::Null, string_value)
}

/// Known entries of a `map(string)` attribute. Null and unknown maps give `None`.
pub(crate) fn localized(value: &ValueMap<'_, ValueString<'_>>) -> Option<Localized> {
    value.as_ref_option().map(|map| {
        map.iter()
            .filter_map(|(lang, text)| Some((lang.to_string(), known_string(text)?)))
            .collect()
    })
}

pub(crate) fn localized_value<'a>(value: Localized) -> ValueMap<'a, ValueString<'a>> {
    Value::Value(
        value
            .into_iter()
            .map(|(lang, text)| (Cow::Owned(lang), string_value(text)))
            .collect(),
    )
}

/// Like [`localized_value`], but an absent or empty map stays null when the
/// prior value was not set.
pub(crate) fn localized_value_like<'a>(
    prior: &ValueMap<'_, ValueString<'_>>,
    value: Option<Localized>,
) -> ValueMap<'a, ValueString<'a>> {
    match value {
        Some(value) if !value.is_empty() || !prior.is_null() => localized_value(value),
        _ => Value::Null,
    }
}

pub(crate) fn numbers(value: &ValueList<ValueNumber>) -> Option<Vec<i64>> {
    value
        .as_ref_option()
        .map(|list| list.iter().filter_map(|n| n.as_ref_option().copied()).collect())
}

pub(crate) fn strings(value: &ValueList<ValueString<'_>>) -> Option<Vec<String>> {
    value
        .as_ref_option()
        .map(|list| list.iter().filter_map(known_string).collect())
}

/// A list read back from REMS; empty lists stay null when the prior value was.
pub(crate) fn list_value_like<T, U>(prior: &ValueList<U>, items: Vec<T>) -> ValueList<T> {
    if items.is_empty() && prior.is_null() {
        Value::Null
    } else {
        Value::Value(items)
    }
}

pub(crate) fn numbers_value_like<T>(
    prior: &ValueList<T>,
    items: Vec<i64>,
) -> ValueList<ValueNumber> {
    list_value_like(prior, items.into_iter().map(Value::Value).collect())
}

pub(crate) fn strings_value_like<'a, T>(
    prior: &ValueList<T>,
    items: Vec<String>,
) -> ValueList<ValueString<'a>> {
    list_value_like(prior, items.into_iter().map(string_value).collect())
}

/// Record `name` as requiring replacement when its planned value differs.
pub(crate) fn replace_if_changed<T: PartialEq>(
    paths: &mut Vec<AttributePath>,
    name: &'static str,
    prior: &T,
    proposed: &T,
) {
    if prior != proposed {
        paths.push(AttributePath::new(name));
    }
}

pub struct DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    iter: RefCell<T>,
    sep: &'a str,
}

pub trait DisplayJoinable {
    type Joiner<'a>;
    fn join_with(self, sep: &str) -> Self::Joiner<'_>;
}

impl<T, I> DisplayJoinable for T
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    type Joiner<'a> = DisplayJoiner<'a, T, I>;

    fn join_with(self, sep: &str) -> Self::Joiner<'_> {
        DisplayJoiner {
            iter: RefCell::new(self),
            sep,
        }
    }
}

impl<'a, T, I> std::fmt::Display for DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        let mut iter = self.iter.try_borrow_mut().or(Err(std::fmt::Error))?;
        for elt in iter.by_ref() {
            f.write_str(sep)?;
            f.write_fmt(format_args!("{elt}"))?;
            sep = self.sep;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_with_separates_items() {
        assert_eq!(["a", "b", "c"].iter().join_with(", ").to_string(), "a, b, c");
        assert_eq!(std::iter::empty::<&str>().join_with(", ").to_string(), "");
    }

    #[test]
    fn localized_skips_unknown_entries() {
        let value: ValueMap<'_, ValueString<'_>> = Value::Value(
            [
                (Cow::Borrowed("en"), Value::Value(Cow::Borrowed("Hello"))),
                (Cow::Borrowed("fi"), Value::Unknown),
            ]
            .into_iter()
            .collect(),
        );

        assert_eq!(
            localized(&value),
            Some(Localized::from([("en".into(), "Hello".into())]))
        );
        assert_eq!(localized(&Value::Unknown), None);
    }

    #[test]
    fn empty_collections_keep_prior_null() {
        let prior: ValueList<ValueNumber> = Value::Null;
        assert_eq!(numbers_value_like(&prior, vec![]), Value::Null);
        assert_eq!(
            numbers_value_like(&prior, vec![3]),
            Value::Value(vec![Value::Value(3)])
        );

        let prior: ValueList<ValueNumber> = Value::Value(vec![]);
        assert_eq!(numbers_value_like(&prior, vec![]), Value::Value(vec![]));

        assert_eq!(localized_value_like(&Value::Null, Some(Localized::new())), Value::Null);
    }
}
