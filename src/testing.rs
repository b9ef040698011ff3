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

//! Helpers shared by the unit tests.

use std::borrow::Cow;

use serde_json::json;
use tf_provider::value::{Value, ValueMap, ValueString};
use wiremock::{MockServer, ResponseTemplate};

use crate::client::{ClientConfig, RemsClient};
use crate::provider::SharedClient;

pub(crate) fn shared_client(server: &MockServer) -> SharedClient {
    RemsClient::new(&ClientConfig {
        endpoint: server.uri(),
        user_id: "owner".into(),
        api_key: "secret".into(),
    })
    .expect("mock server uri is a valid endpoint")
    .into()
}

pub(crate) fn text(value: &str) -> ValueString<'_> {
    Value::Value(Cow::Borrowed(value))
}

pub(crate) fn localized_state<'a>(entries: &[(&'a str, &'a str)]) -> ValueMap<'a, ValueString<'a>> {
    Value::Value(
        entries
            .iter()
            .map(|(lang, value)| (Cow::Borrowed(*lang), text(value)))
            .collect(),
    )
}

/// REMS reply to a successful command, with the id of created objects.
pub(crate) fn success(id: Option<i64>) -> ResponseTemplate {
    let body = match id {
        Some(id) => json!({"success": true, "id": id}),
        None => json!({"success": true}),
    };
    ResponseTemplate::new(200).set_body_json(body)
}
