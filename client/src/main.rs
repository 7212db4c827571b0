// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod app;
mod components;
mod config;
mod error;
mod file_reader;
mod http;
mod notifications;
mod page_utils;
mod pages;
mod signup;

use app::App;
use config::ApiConfig;
use pages::error::{ErrorData, ErrorView};
use sycamore::prelude::*;

fn main() {
	console_error_panic_hook::set_once();
	wasm_logger::init(wasm_logger::Config::new(config::log_level()));

	let config = match ApiConfig::from_build_env() {
		Ok(config) => config,
		Err(error) => {
			log::error!("Unable to determine the API address: {}", error);
			sycamore::render(|ctx| {
				provide_context(ctx, ErrorData::new_with_error("Unable to load: the API address is unknown", error));
				view! { ctx, ErrorView {} }
			});
			return;
		}
	};
	log::info!("Using API at {}", config.base_url);

	sycamore::render(|ctx| {
		view! { ctx, App(config=config) }
	});
}
