// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::notifications::{Toast, Toasts};
use sycamore::prelude::*;
use web_sys::Event as WebEvent;

#[component]
pub fn ToastList<G: Html>(ctx: Scope<'_>) -> View<G> {
	let toasts: &Toasts = use_context(ctx);
	let entries = create_memo(ctx, || (*toasts.entries().get()).clone());

	view! {
		ctx,
		ul(id="toasts", class="toasts_top_right") {
			Indexed(
				iterable=entries,
				view=move |ctx, toast: Toast| {
					let Toast { id, notification } = toast;
					let title = notification.title;
					let description_view = match notification.description {
						Some(description) => view! { ctx, div(class="toast_description") { (description) } },
						None => view! { ctx, },
					};
					let dismiss_view = if notification.closable {
						let toasts = toasts.clone();
						let dismiss_handler = move |_event: WebEvent| toasts.dismiss(id);
						view! {
							ctx,
							a(class="toast_dismiss click", on:click=dismiss_handler) { "[X]" }
						}
					} else {
						view! { ctx, }
					};
					let toast_class = format!("toast {}", notification.severity.class());

					view! {
						ctx,
						li(class=toast_class) {
							div(class="toast_title") { (title) }
							(description_view)
							(dismiss_view)
						}
					}
				}
			)
		}
	}
}
