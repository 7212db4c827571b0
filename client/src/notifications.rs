// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use gloo_timers::callback::Timeout;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use sycamore::prelude::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
	Success,
	Error,
}

impl Severity {
	pub fn class(&self) -> &'static str {
		match self {
			Self::Success => "toast_success",
			Self::Error => "toast_error",
		}
	}
}

/// A message for the user about the outcome of something they did
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
	pub title: &'static str,
	pub description: Option<String>,
	pub severity: Severity,
	pub closable: bool,
}

impl Notification {
	pub fn success(title: &'static str) -> Self {
		Self {
			title,
			description: None,
			severity: Severity::Success,
			closable: true,
		}
	}

	pub fn error(title: &'static str, description: impl ToString) -> Self {
		Self {
			title,
			description: Some(description.to_string()),
			severity: Severity::Error,
			closable: false,
		}
	}
}

/// Somewhere to show the user notifications and blocking alerts
pub trait Notifier {
	fn notify(&self, notification: Notification);

	/// Shows a message the user has to acknowledge before continuing
	fn alert(&self, message: &str);
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Toast {
	pub id: u64,
	pub notification: Notification,
}

/// Notifications currently shown on the page. Each one dismisses itself after the configured duration.
#[derive(Clone)]
pub struct Toasts {
	entries: RcSignal<Vec<Toast>>,
	next_id: Rc<Cell<u64>>,
	duration: Duration,
}

impl Toasts {
	pub fn new(duration: Duration) -> Self {
		Self {
			entries: create_rc_signal(Vec::new()),
			next_id: Rc::new(Cell::new(0)),
			duration,
		}
	}

	pub fn entries(&self) -> &RcSignal<Vec<Toast>> {
		&self.entries
	}

	/// Adds a notification to the page without scheduling its removal
	pub fn push(&self, notification: Notification) -> u64 {
		let id = self.next_id.get();
		self.next_id.set(id + 1);
		self.entries.modify().push(Toast { id, notification });
		id
	}

	pub fn dismiss(&self, id: u64) {
		let is_shown = self.entries.get().iter().any(|toast| toast.id == id);
		if is_shown {
			self.entries.modify().retain(|toast| toast.id != id);
		}
	}
}

impl Notifier for Toasts {
	fn notify(&self, notification: Notification) {
		let id = self.push(notification);
		let toasts = self.clone();
		let duration_ms = u32::try_from(self.duration.as_millis()).unwrap_or(u32::MAX);
		Timeout::new(duration_ms, move || toasts.dismiss(id)).forget();
	}

	fn alert(&self, message: &str) {
		let Some(window) = web_sys::window() else {
			log::warn!("Unable to show alert without a window: {}", message);
			return;
		};
		if let Err(error) = window.alert_with_message(message) {
			log::warn!("Failed to show alert \"{}\": {:?}", message, error);
		}
	}
}
