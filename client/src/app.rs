// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::components::toast_list::ToastList;
use crate::config::{ApiConfig, NOTIFICATION_DURATION};
use crate::http::ApiClient;
use crate::notifications::Toasts;
use crate::pages::signup::SignupView;
use sycamore::prelude::*;

#[derive(Prop)]
pub struct AppProps {
	config: ApiConfig,
}

#[component]
pub fn App<G: Html>(ctx: Scope<'_>, props: AppProps) -> View<G> {
	provide_context(ctx, ApiClient::new(props.config));
	provide_context(ctx, Toasts::new(NOTIFICATION_DURATION));

	view! {
		ctx,
		SignupView {}
		ToastList {}
	}
}
