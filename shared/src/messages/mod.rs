// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

pub mod signup;
pub mod upload;
pub mod user;

/// Path of the endpoint that creates an account
pub const SIGNUP_PATH: &str = "auth/signup";

/// Error body the API sends alongside a failing status code
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ApiErrorBody {
	pub message: String,
}
