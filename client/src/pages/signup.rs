// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::file_reader::BrowserFileReader;
use crate::http::ApiClient;
use crate::notifications::Toasts;
use crate::page_utils::set_page_title;
use crate::signup::controller::SignupController;
use crate::signup::form::FormSnapshot;
use signup_form_shared::messages::signup::SignupField;
use sycamore::futures::spawn_local_scoped;
use sycamore::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event as WebEvent, File, HtmlInputElement};

pub type BrowserSignupController = SignupController<File, ApiClient, BrowserFileReader, Toasts>;

fn field_class(form: &FormSnapshot, field: SignupField) -> &'static str {
	if form.invalid_field == Some(field) {
		"error"
	} else {
		""
	}
}

#[component]
pub fn SignupView<G: Html>(ctx: Scope<'_>) -> View<G> {
	set_page_title("Sign Up");

	let api: &ApiClient = use_context(ctx);
	let toasts: &Toasts = use_context(ctx);

	let form_signal = create_rc_signal(FormSnapshot::default());
	// Dropped with the page's scope, which aborts a preview read that's still running
	let controller: &BrowserSignupController = create_ref(
		ctx,
		SignupController::new(api.clone(), BrowserFileReader, toasts.clone(), {
			let form_signal = form_signal.clone();
			move |snapshot: &FormSnapshot| form_signal.set(snapshot.clone())
		}),
	);
	let form = create_memo(ctx, move || (*form_signal.get()).clone());

	let name_signal = create_signal(ctx, String::new());
	let email_signal = create_signal(ctx, String::new());
	create_effect(ctx, move || controller.update_field(SignupField::Name, &name_signal.get()));
	create_effect(ctx, move || controller.update_field(SignupField::Email, &email_signal.get()));
	// Resets originate in the controller, so the inputs follow the form state
	create_effect(ctx, move || {
		let form = form.get();
		if *name_signal.get_untracked() != form.name {
			name_signal.set(form.name.clone());
		}
		if *email_signal.get_untracked() != form.email {
			email_signal.set(form.email.clone());
		}
	});

	let name_class = create_memo(ctx, move || field_class(&form.get(), SignupField::Name));
	let email_class = create_memo(ctx, move || field_class(&form.get(), SignupField::Email));
	let submitting = create_memo(ctx, move || form.get().submitting);

	let file_change_handler = move |event: WebEvent| {
		let Some(input) = event
			.target()
			.and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
		else {
			return;
		};
		let file = input.files().and_then(|files| files.get(0));
		// Cleared so that picking the same file again still fires a change
		input.set_value("");

		if let Some(file) = file {
			if let Err(error) = controller.select_image(file) {
				log::debug!("File selection rejected: {}", error);
			}
		}
	};
	let remove_image_handler = move |_event: WebEvent| controller.remove_image();
	let cancel_handler = move |_event: WebEvent| controller.cancel();
	let submit_handler = move |_event: WebEvent| {
		spawn_local_scoped(ctx, async move {
			match controller.submit().await {
				Ok(()) => log::info!("Signup completed"),
				Err(error) => log::warn!("Signup was not completed: {}", error),
			}
		});
	};

	view! {
		ctx,
		div(id="signup_page") {
			div(id="signup_card") {
				h1 { "Sign Up" }
				div(id="signup_avatar") {
					(match form.get().preview.clone().or_else(|| form.get().image_url.clone()) {
						Some(source) => view! {
							ctx,
							img(class="signup_avatar_image", src=source, alt="Avatar")
						},
						None => {
							let placeholder_text = if form.get().preview_loading { "Loading..." } else { "" };
							view! {
								ctx,
								div(class="signup_avatar_placeholder") { (placeholder_text) }
							}
						}
					})
					button(type="button", class="signup_avatar_remove", title="Remove image", on:click=remove_image_handler) { "×" }
					label(for="select-file", class="click") { "Change Avatar" }
					input(id="select-file", type="file", accept="image/*", style="display: none", on:change=file_change_handler)
				}
				div(class="signup_field") {
					label(for="signup_name") { "Name *" }
					input(id="signup_name", type="text", placeholder="Name", class=*name_class.get(), bind:value=name_signal)
				}
				div(class="signup_field") {
					label(for="signup_email") { "Email *" }
					input(id="signup_email", type="email", placeholder="your-email@example.com", class=*email_class.get(), bind:value=email_signal)
				}
				div(id="signup_actions") {
					button(type="button", class="signup_cancel", on:click=cancel_handler) { "Cancel" }
					button(type="button", class="signup_submit", disabled=*submitting.get(), on:click=submit_handler) { "Submit" }
				}
			}
		}
	}
}
