// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use signup_form_shared::messages::signup::ValidationError;
use std::fmt;
use std::time::Duration;

/// Errors that can occur sending a request to the API
#[derive(Debug)]
pub enum HttpError {
	Network(String),
	Timeout(Duration),
	Status { status: u16, message: Option<String> },
	Body(serde_json::Error),
}

impl From<gloo_net::Error> for HttpError {
	fn from(error: gloo_net::Error) -> Self {
		Self::Network(error.to_string())
	}
}

impl From<serde_json::Error> for HttpError {
	fn from(error: serde_json::Error) -> Self {
		Self::Body(error)
	}
}

impl fmt::Display for HttpError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Network(error) => write!(f, "Network Error: {}", error),
			Self::Timeout(timeout) => write!(f, "timeout of {}ms exceeded", timeout.as_millis()),
			Self::Status {
				status,
				message: Some(message),
			} => write!(f, "Request failed with status code {}: {}", status, message),
			Self::Status { status, message: None } => write!(f, "Request failed with status code {}", status),
			Self::Body(error) => write!(f, "An invalid response was received: {}", error),
		}
	}
}

/// Errors that can occur reading a file into a preview
#[derive(Debug)]
pub enum PreviewError {
	Start(String),
	Read(String),
	NotText,
}

impl fmt::Display for PreviewError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Start(error) => write!(f, "Failed to start reading the file: {}", error),
			Self::Read(error) => write!(f, "Failed to read the file: {}", error),
			Self::NotText => write!(f, "The file could not be represented as a data URL"),
		}
	}
}

/// A file was picked that isn't one of the accepted image types
#[derive(Debug, Eq, PartialEq)]
pub struct UnsupportedFileType {
	pub mime_type: String,
}

impl fmt::Display for UnsupportedFileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Image type is not supported: {}", self.mime_type)
	}
}

/// Reasons a form submission stopped before an account was created
#[derive(Debug)]
pub enum SubmitError {
	Validation(ValidationError),
	Upload(HttpError),
	Signup(HttpError),
	InProgress,
}

impl From<ValidationError> for SubmitError {
	fn from(error: ValidationError) -> Self {
		Self::Validation(error)
	}
}

impl fmt::Display for SubmitError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Validation(error) => write!(f, "{}", error),
			Self::Upload(error) => write!(f, "{}", error),
			Self::Signup(error) => write!(f, "{}", error),
			Self::InProgress => write!(f, "A submission is already in progress"),
		}
	}
}
