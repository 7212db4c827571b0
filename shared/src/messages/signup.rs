// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidateEmail;

/// Data from the client when creating an account
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
	pub name: String,
	pub email: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
}

/// The user-editable fields of a signup request
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SignupField {
	Name,
	Email,
}

impl SignupField {
	/// The path used to refer to the field in validation results
	pub fn path(&self) -> &'static str {
		match self {
			Self::Name => "name",
			Self::Email => "email",
		}
	}
}

impl fmt::Display for SignupField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.path())
	}
}

/// The first rule a signup request failed
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationError {
	pub field: SignupField,
	pub message: &'static str,
}

impl fmt::Display for ValidationError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message)
	}
}

enum Rule {
	Required,
	Email,
}

impl Rule {
	fn check(&self, value: &str) -> bool {
		match self {
			Self::Required => !value.is_empty(),
			// An empty value is the required rule's concern
			Self::Email => value.is_empty() || value.validate_email(),
		}
	}
}

/// Rules in evaluation order. Only the first violation is reported.
const SIGNUP_RULES: [(SignupField, Rule, &str); 3] = [
	(SignupField::Name, Rule::Required, "Name is required"),
	(SignupField::Email, Rule::Required, "Email is required"),
	(SignupField::Email, Rule::Email, "Please enter a valid email address"),
];

impl SignupRequest {
	pub fn field(&self, field: SignupField) -> &str {
		match field {
			SignupField::Name => &self.name,
			SignupField::Email => &self.email,
		}
	}

	pub fn field_mut(&mut self, field: SignupField) -> &mut String {
		match field {
			SignupField::Name => &mut self.name,
			SignupField::Email => &mut self.email,
		}
	}

	/// Checks the request against the signup rules.
	///
	/// # Errors
	///
	/// Returns the first violated rule, checking the name before the email. The image URL is optional and never
	/// fails validation.
	pub fn validate(&self) -> Result<(), ValidationError> {
		for &(field, ref rule, message) in SIGNUP_RULES.iter() {
			if !rule.check(self.field(field)) {
				return Err(ValidationError { field, message });
			}
		}
		Ok(())
	}
}
