// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::config::ApiConfig;
use crate::error::HttpError;
use futures::future::{self, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use signup_form_shared::messages::ApiErrorBody;
use std::rc::Rc;
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

/// Sends requests to the API. Bodies come back as text for the caller to interpret.
///
/// `F` is the file handle type that can be sent as a multipart upload.
#[allow(async_fn_in_trait)]
pub trait HttpClient<F> {
	/// Sends `body` as JSON in a POST request to `path`.
	///
	/// # Errors
	///
	/// Fails on network errors, timeouts, and responses with a non-2xx status.
	async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<String, HttpError>;

	/// Sends `file` as the multipart form field `field` in a POST request to `path`.
	///
	/// # Errors
	///
	/// Fails on network errors, timeouts, and responses with a non-2xx status.
	async fn post_file(&self, path: &str, field: &str, file: &F) -> Result<String, HttpError>;
}

/// Browser HTTP client bound to the configured API base URL and timeout
#[derive(Clone)]
pub struct ApiClient {
	config: Rc<ApiConfig>,
}

impl ApiClient {
	pub fn new(config: ApiConfig) -> Self {
		Self {
			config: Rc::new(config),
		}
	}

	async fn send(&self, request: Request) -> Result<String, HttpError> {
		let exchange = async {
			let response = request.send().await?;
			let ok = response.ok();
			let status = response.status();
			let body = response.text().await?;
			Ok::<_, HttpError>((ok, status, body))
		};
		let timeout_ms = u32::try_from(self.config.timeout.as_millis()).unwrap_or(u32::MAX);

		let (ok, status, body) = match future::select(Box::pin(exchange), TimeoutFuture::new(timeout_ms)).await {
			Either::Left((result, _)) => result?,
			Either::Right(_) => return Err(HttpError::Timeout(self.config.timeout)),
		};

		if !ok {
			let message = serde_json::from_str::<ApiErrorBody>(&body)
				.ok()
				.map(|error_body| error_body.message);
			return Err(HttpError::Status { status, message });
		}
		Ok(body)
	}
}

fn js_error(error: JsValue) -> HttpError {
	HttpError::Network(format!("{:?}", error))
}

impl HttpClient<File> for ApiClient {
	async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<String, HttpError> {
		let url = self.config.endpoint(path);
		log::debug!("Sending JSON request to {}", url);
		let request = Request::post(&url).json(body)?;
		self.send(request).await
	}

	async fn post_file(&self, path: &str, field: &str, file: &File) -> Result<String, HttpError> {
		let url = self.config.endpoint(path);
		log::debug!("Uploading {} ({} bytes) to {}", file.name(), file.size(), url);

		// The browser fills in the multipart content type along with its boundary
		let form = FormData::new().map_err(js_error)?;
		form.append_with_blob(field, file).map_err(js_error)?;
		let request = Request::post(&url).body(form)?;
		self.send(request).await
	}
}
