// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt::Display;
use sycamore::prelude::*;

/// A failure that keeps the page from loading at all
#[derive(Clone)]
pub struct ErrorData {
	message: &'static str,
	error_display: Option<String>,
}

impl ErrorData {
	pub fn new_with_error(message: &'static str, error: impl Display) -> Self {
		let error_display = Some(format!("{}", error));
		Self { message, error_display }
	}
}

#[component]
pub fn ErrorView<G: Html>(ctx: Scope) -> View<G> {
	let error_data: &ErrorData = use_context(ctx);
	let message = error_data.message;

	match error_data.error_display.clone() {
		Some(err_disp) => view! {
			ctx,
			div(id="app_error") {
				(message)
				br {}
				(err_disp)
			}
		},
		None => view! {
			ctx,
			div(id="app_error") { (message) }
		},
	}
}
