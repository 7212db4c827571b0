// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use log::Level;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use web_sys::Url;

/// How long a request to the API may take before it's given up on
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(40);

/// How long a notification stays on screen before dismissing itself
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// API base URL baked in at build time
const API_URL: Option<&str> = option_env!("SIGNUP_API_URL");

/// Log level baked in at build time
const LOG_LEVEL: Option<&str> = option_env!("SIGNUP_LOG_LEVEL");

pub enum ConfigError {
	NoWindow,
	Location(String),
}

impl fmt::Display for ConfigError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::NoWindow => write!(f, "The browser window is not accessible"),
			Self::Location(error) => write!(f, "Failed to read the page address: {}", error),
		}
	}
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiConfig {
	pub base_url: String,
	pub timeout: Duration,
}

impl ApiConfig {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
			timeout: REQUEST_TIMEOUT,
		}
	}

	/// Builds the configuration from the build environment, falling back to an `api/` path next to the page when
	/// no API URL was provided.
	///
	/// # Errors
	///
	/// Fails when the fallback is needed and the browser context (window, location, URL) is inaccessible.
	pub fn from_build_env() -> Result<Self, ConfigError> {
		match API_URL {
			Some(url) if !url.trim().is_empty() => Ok(Self::new(url.trim())),
			_ => Ok(Self::new(page_api_endpoint()?)),
		}
	}

	/// Joins an endpoint path onto the base URL with exactly one slash between them
	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
	}
}

/// Gets the API address for the page in a way that adapts to any URL structure at which the application could be
/// hosted.
fn page_api_endpoint() -> Result<String, ConfigError> {
	let js_location = web_sys::window().ok_or(ConfigError::NoWindow)?.location();
	let web_endpoint = js_location
		.href()
		.map_err(|error| ConfigError::Location(format!("{:?}", error)))?;
	let url = Url::new(&web_endpoint).map_err(|error| ConfigError::Location(format!("{:?}", error)))?;
	url.set_search(""); // Query string and fragment are unnecessary and should be cleared
	url.set_hash("");
	let url_path = url.pathname();
	let api_path = if let Some(path) = url_path.strip_suffix('/') {
		format!("{}/api/", path)
	} else {
		format!("{}/api/", url_path)
	};
	url.set_pathname(&api_path);
	Ok(url.to_string().into())
}

/// Gets the level at which to log, preferring the build-time setting
pub fn log_level() -> Level {
	parse_log_level(LOG_LEVEL)
}

fn parse_log_level(setting: Option<&str>) -> Level {
	setting
		.and_then(|level| Level::from_str(level.trim()).ok())
		.unwrap_or(if cfg!(debug_assertions) { Level::Debug } else { Level::Info })
}
