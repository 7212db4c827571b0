// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use signup_form_shared::messages::signup::{SignupField, SignupRequest, ValidationError};

/// A picked image along with the preview read from it
pub struct SelectedImage<F> {
	pub file: F,
	pub preview: String,
}

enum ImageState<F> {
	Empty,
	/// The preview read for `file` is still running
	Loading { file: F, generation: u64 },
	Selected(SelectedImage<F>),
}

/// Everything the page shows about the form at one point in time
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FormSnapshot {
	pub name: String,
	pub email: String,
	pub image_url: Option<String>,
	pub preview: Option<String>,
	pub preview_loading: bool,
	pub invalid_field: Option<SignupField>,
	pub submitting: bool,
}

/// In-progress signup state.
///
/// An image only counts as selected once its preview is available, so a file and its preview are either both
/// present or both absent. Every image change bumps the read generation; a preview read may only land if it still
/// carries the current generation. Every reset starts a new session, which lets a running submission tell that the
/// form it started from is gone.
pub struct SignupForm<F> {
	request: SignupRequest,
	image: ImageState<F>,
	generation: u64,
	session: u64,
	invalid_field: Option<SignupField>,
	submitting: bool,
}

impl<F> Default for SignupForm<F> {
	fn default() -> Self {
		Self {
			request: SignupRequest::default(),
			image: ImageState::Empty,
			generation: 0,
			session: 0,
			invalid_field: None,
			submitting: false,
		}
	}
}

impl<F: Clone> SignupForm<F> {
	#[cfg(test)]
	pub fn request(&self) -> &SignupRequest {
		&self.request
	}

	#[cfg(test)]
	pub fn invalid_field(&self) -> Option<SignupField> {
		self.invalid_field
	}

	pub fn is_submitting(&self) -> bool {
		self.submitting
	}

	pub fn set_submitting(&mut self, submitting: bool) {
		self.submitting = submitting;
	}

	pub fn session(&self) -> u64 {
		self.session
	}

	/// Changes whenever the image is picked, replaced or removed
	pub fn image_generation(&self) -> u64 {
		self.generation
	}

	#[cfg(test)]
	pub fn selected_image(&self) -> Option<&SelectedImage<F>> {
		match &self.image {
			ImageState::Selected(image) => Some(image),
			_ => None,
		}
	}

	/// Sets a field's value, clearing the validation error on that field. Returns whether anything changed.
	pub fn update_field(&mut self, field: SignupField, value: &str) -> bool {
		if self.request.field(field) == value {
			return false;
		}
		*self.request.field_mut(field) = value.to_string();
		if self.invalid_field == Some(field) {
			self.invalid_field = None;
		}
		true
	}

	/// Validates the current request, recording the failing field so it can be highlighted
	pub fn validate(&mut self) -> Result<SignupRequest, ValidationError> {
		match self.request.validate() {
			Ok(()) => Ok(self.request.clone()),
			Err(error) => {
				self.invalid_field = Some(error.field);
				Err(error)
			}
		}
	}

	/// Drops any current image and marks `file` as being read. Returns the generation the read must report back
	/// with.
	pub fn begin_read(&mut self, file: F) -> u64 {
		self.generation += 1;
		self.image = ImageState::Loading {
			file,
			generation: self.generation,
		};
		self.generation
	}

	/// Applies a finished preview read. Returns `false` when the read has since been superseded.
	pub fn complete_read(&mut self, generation: u64, preview: String) -> bool {
		match std::mem::replace(&mut self.image, ImageState::Empty) {
			ImageState::Loading {
				file,
				generation: current,
			} if current == generation => {
				self.image = ImageState::Selected(SelectedImage { file, preview });
				true
			}
			other => {
				self.image = other;
				false
			}
		}
	}

	/// Drops the pending file after its read failed. Returns `false` when the read has since been superseded.
	pub fn fail_read(&mut self, generation: u64) -> bool {
		match self.image {
			ImageState::Loading { generation: current, .. } if current == generation => {
				self.image = ImageState::Empty;
				true
			}
			_ => false,
		}
	}

	pub fn remove_image(&mut self) {
		self.generation += 1;
		self.image = ImageState::Empty;
	}

	/// The file to upload on submit, whether or not its preview has finished loading
	pub fn upload_target(&self) -> Option<F> {
		match &self.image {
			ImageState::Empty => None,
			ImageState::Loading { file, .. } => Some(file.clone()),
			ImageState::Selected(image) => Some(image.file.clone()),
		}
	}

	/// Records the server's reference to an uploaded image. The local image is dropped only if it's still the one
	/// from `image_generation`; returns whether it was.
	pub fn attach_image_url(&mut self, image_url: String, image_generation: u64) -> bool {
		self.request.image_url = Some(image_url);
		if self.generation != image_generation {
			return false;
		}
		self.remove_image();
		true
	}

	/// Returns the form to its initial empty state. An in-flight submission stays flagged until it finishes.
	pub fn reset(&mut self) {
		self.session += 1;
		self.request = SignupRequest::default();
		self.invalid_field = None;
		self.remove_image();
	}

	pub fn snapshot(&self) -> FormSnapshot {
		let (preview, preview_loading) = match &self.image {
			ImageState::Empty => (None, false),
			ImageState::Loading { .. } => (None, true),
			ImageState::Selected(image) => (Some(image.preview.clone()), false),
		};
		FormSnapshot {
			name: self.request.name.clone(),
			email: self.request.email.clone(),
			image_url: self.request.image_url.clone(),
			preview,
			preview_loading,
			invalid_field: self.invalid_field,
			submitting: self.submitting,
		}
	}
}
