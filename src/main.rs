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

use tf_provider::serve;

use crate::provider::RemsContentProvider;

mod catalogue_item;
mod category;
mod client;
mod content;
mod form;
mod functions;
mod license;
mod logging;
mod organization;
mod provider;
mod rems_resource;
mod utils;
mod workflow;

#[cfg(test)]
mod testing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting remscontent provider");
    serve("remscontent", RemsContentProvider::default()).await?;
    Ok(())
}
