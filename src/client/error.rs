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

//! Error types for the REMS API client.

use thiserror::Error;

/// Errors that can occur when talking to a REMS instance.
#[derive(Debug, Error)]
pub enum RemsError {
    /// Network-level error during HTTP communication.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The API user or key was refused.
    #[error("REMS refused the credentials (status {status})")]
    Unauthorized { status: u16 },

    /// The requested object does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// REMS answered with an unexpected status.
    #[error("REMS API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// REMS accepted the request but reported `success: false`.
    #[error("REMS rejected the command: {errors}")]
    Rejected { errors: String },

    /// The response body could not be decoded.
    #[error("Invalid response from REMS: {0}")]
    InvalidResponse(String),

    /// The configured endpoint is not a usable base URL.
    #[error("Invalid endpoint `{endpoint}`: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}

impl RemsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemsError::NotFound(_))
    }
}
