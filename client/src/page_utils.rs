// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use web_sys::window;

pub fn set_page_title(new_title: &str) {
	let Some(document) = window().and_then(|window| window.document()) else {
		log::debug!("No document available to set the title \"{}\"", new_title);
		return;
	};
	document.set_title(new_title);
}
