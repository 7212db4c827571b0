// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::form::{FormSnapshot, SignupForm};
use crate::error::{HttpError, PreviewError, SubmitError, UnsupportedFileType};
use crate::file_reader::{ImageFile, PreviewCallback, PreviewReader, ReadHandle};
use crate::http::HttpClient;
use crate::notifications::{Notification, Notifier};
use signup_form_shared::messages::signup::{SignupField, SignupRequest};
use signup_form_shared::messages::upload::{
	is_supported_image_type, UploadResponse, UPLOAD_FILE_FIELD, UPLOAD_PATH,
};
use signup_form_shared::messages::user::UserData;
use signup_form_shared::messages::SIGNUP_PATH;
use std::cell::RefCell;
use std::rc::Rc;

const FAILURE_TITLE: &str = "There was a problem signing up";
const SUCCESS_TITLE: &str = "Signup successful";
const UNSUPPORTED_TYPE_MESSAGE: &str = "Image type is not supported";

type Observer = Rc<dyn Fn(&FormSnapshot)>;

/// Runs the signup form: field edits, avatar selection and preview, and submission to the API.
///
/// Every state change is published to the observer as a [`FormSnapshot`]. Dropping the controller aborts a
/// preview read that's still running.
pub struct SignupController<F, H, R, N>
where
	R: PreviewReader<F>,
{
	form: Rc<RefCell<SignupForm<F>>>,
	active_read: RefCell<Option<R::Handle>>,
	http: H,
	reader: R,
	notifier: N,
	observer: Observer,
}

impl<F, H, R, N> SignupController<F, H, R, N>
where
	F: ImageFile,
	H: HttpClient<F>,
	R: PreviewReader<F>,
	N: Notifier,
{
	pub fn new(http: H, reader: R, notifier: N, observer: impl Fn(&FormSnapshot) + 'static) -> Self {
		Self {
			form: Rc::new(RefCell::new(SignupForm::default())),
			active_read: RefCell::new(None),
			http,
			reader,
			notifier,
			observer: Rc::new(observer),
		}
	}

	pub fn snapshot(&self) -> FormSnapshot {
		self.form.borrow().snapshot()
	}

	fn publish(&self) {
		let snapshot = self.form.borrow().snapshot();
		(self.observer)(&snapshot);
	}

	/// Stops the running preview read, if any
	fn stop_active_read(&self) {
		if let Some(handle) = self.active_read.borrow_mut().take() {
			if handle.is_loading() {
				handle.abort();
			}
		}
	}

	/// Picks a new avatar image and starts reading its preview. Any previous image or read is discarded.
	///
	/// # Errors
	///
	/// Rejects files that aren't PNG or JPEG images, leaving the form untouched.
	pub fn select_image(&self, file: F) -> Result<(), UnsupportedFileType> {
		let mime_type = file.mime_type();
		if !is_supported_image_type(&mime_type) {
			log::warn!("Rejected file of type \"{}\"", mime_type);
			self.notifier.alert(UNSUPPORTED_TYPE_MESSAGE);
			return Err(UnsupportedFileType { mime_type });
		}

		self.stop_active_read();
		let generation = self.form.borrow_mut().begin_read(file.clone());
		self.publish();

		let on_done: PreviewCallback = {
			let form = Rc::clone(&self.form);
			let observer = Rc::clone(&self.observer);
			Box::new(move |result: Result<String, PreviewError>| {
				let applied = match result {
					Ok(preview) => form.borrow_mut().complete_read(generation, preview),
					Err(error) => {
						log::warn!("Failed to load image preview: {}", error);
						form.borrow_mut().fail_read(generation)
					}
				};
				if applied {
					let snapshot = form.borrow().snapshot();
					observer(&snapshot);
				} else {
					log::debug!("Discarding superseded image preview (generation {})", generation);
				}
			})
		};
		let handle = self.reader.read_as_data_url(&file, on_done);
		*self.active_read.borrow_mut() = Some(handle);
		Ok(())
	}

	pub fn remove_image(&self) {
		self.stop_active_read();
		self.form.borrow_mut().remove_image();
		self.publish();
	}

	pub fn update_field(&self, field: SignupField, value: &str) {
		let changed = self.form.borrow_mut().update_field(field, value);
		if changed {
			self.publish();
		}
	}

	/// Discards all edits and any image, returning to the initial empty form
	pub fn cancel(&self) {
		self.stop_active_read();
		self.form.borrow_mut().reset();
		self.publish();
	}

	/// Validates the form, uploads the avatar if one was picked, and creates the account. Each outcome is
	/// reported to the user through the notifier.
	///
	/// # Errors
	///
	/// Fails without touching the network when validation fails or another submission is still running. An upload
	/// failure stops the submission before signup is attempted. Upload and signup failures leave the entered
	/// details in place for another try.
	pub async fn submit(&self) -> Result<(), SubmitError> {
		let (request, image, session) = {
			let mut form = self.form.borrow_mut();
			if form.is_submitting() {
				return Err(SubmitError::InProgress);
			}
			let validation = form.validate();
			match validation {
				Ok(request) => {
					form.set_submitting(true);
					let image = form.upload_target().map(|file| (file, form.image_generation()));
					(request, image, form.session())
				}
				Err(error) => {
					drop(form);
					self.publish();
					self.notifier.notify(Notification::error(FAILURE_TITLE, &error));
					return Err(error.into());
				}
			}
		};
		self.publish();

		let result = self.run_submission(request, image, session).await;
		self.form.borrow_mut().set_submitting(false);
		self.publish();

		match &result {
			Ok(()) => self.notifier.notify(Notification::success(SUCCESS_TITLE)),
			Err(error) => self.notifier.notify(Notification::error(FAILURE_TITLE, error)),
		}
		result
	}

	/// Sends the requests for a submission that started in form session `session`. Results only land in the form if
	/// it hasn't been reset since.
	async fn run_submission(
		&self,
		mut request: SignupRequest,
		image: Option<(F, u64)>,
		session: u64,
	) -> Result<(), SubmitError> {
		if let Some((file, image_generation)) = image {
			let image_url = self.upload(&file).await.map_err(SubmitError::Upload)?;
			log::info!("Uploaded avatar image to {}", image_url);

			if self.form.borrow().session() == session {
				let released = self
					.form
					.borrow_mut()
					.attach_image_url(image_url.clone(), image_generation);
				// A read still running for the uploaded file has nothing left to show
				if released {
					self.stop_active_read();
				}
				self.publish();
			} else {
				log::debug!("Form was reset during the upload; not attaching {}", image_url);
			}
			request.image_url = Some(image_url);
		}

		let body = self
			.http
			.post_json(SIGNUP_PATH, &request)
			.await
			.map_err(SubmitError::Signup)?;
		match serde_json::from_str::<UserData>(&body) {
			Ok(user) => log::info!("Created account {} for {}", user.id, user.email),
			Err(_) => log::info!("Created account for {}", request.email),
		}

		if self.form.borrow().session() == session {
			self.stop_active_read();
			self.form.borrow_mut().reset();
		}
		Ok(())
	}

	async fn upload(&self, file: &F) -> Result<String, HttpError> {
		let body = self.http.post_file(UPLOAD_PATH, UPLOAD_FILE_FIELD, file).await?;
		let response: UploadResponse = serde_json::from_str(&body)?;
		Ok(response.image_url)
	}
}

impl<F, H, R, N> Drop for SignupController<F, H, R, N>
where
	R: PreviewReader<F>,
{
	fn drop(&mut self) {
		if let Some(handle) = self.active_read.get_mut().take() {
			if handle.is_loading() {
				handle.abort();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file_reader::PreviewCallback;
	use futures::channel::oneshot;
	use futures::executor::block_on;
	use futures::FutureExt;
	use serde::Serialize;
	use std::cell::Cell;

	const UPLOADED_URL: &str = "http://localhost:3001/uploads/userimages/avatar.png";

	#[derive(Clone, Debug, PartialEq)]
	struct TestFile {
		name: &'static str,
		mime_type: &'static str,
	}

	impl ImageFile for TestFile {
		fn mime_type(&self) -> String {
			self.mime_type.to_string()
		}
	}

	fn png(name: &'static str) -> TestFile {
		TestFile {
			name,
			mime_type: "image/png",
		}
	}

	#[derive(Debug, PartialEq)]
	enum Call {
		Json { path: String, body: serde_json::Value },
		File { path: String, field: String, file: &'static str },
	}

	#[derive(Clone, Default)]
	struct FakeApi {
		calls: Rc<RefCell<Vec<Call>>>,
		failing_paths: Rc<RefCell<Vec<&'static str>>>,
		upload_gate: Rc<RefCell<Option<oneshot::Receiver<()>>>>,
	}

	impl FakeApi {
		fn fail(&self, path: &'static str) {
			self.failing_paths.borrow_mut().push(path);
		}

		fn succeed(&self, path: &'static str) {
			self.failing_paths.borrow_mut().retain(|failing| *failing != path);
		}

		fn result(&self, path: &str, body: &str) -> Result<String, HttpError> {
			if self.failing_paths.borrow().iter().any(|failing| *failing == path) {
				Err(HttpError::Status {
					status: 500,
					message: Some(String::from("Error while trying to reach the server")),
				})
			} else {
				Ok(body.to_string())
			}
		}

		fn paths(&self) -> Vec<String> {
			self.calls
				.borrow()
				.iter()
				.map(|call| match call {
					Call::Json { path, .. } | Call::File { path, .. } => path.clone(),
				})
				.collect()
		}

		fn last_json_body(&self) -> serde_json::Value {
			self.calls
				.borrow()
				.iter()
				.rev()
				.find_map(|call| match call {
					Call::Json { body, .. } => Some(body.clone()),
					Call::File { .. } => None,
				})
				.expect("no JSON request was sent")
		}
	}

	impl HttpClient<TestFile> for FakeApi {
		async fn post_json<T: Serialize>(&self, path: &str, body: &T) -> Result<String, HttpError> {
			self.calls.borrow_mut().push(Call::Json {
				path: path.to_string(),
				body: serde_json::to_value(body).unwrap(),
			});
			self.result(path, r#"{"id":7,"name":"Sage","email":"sage@example.com","imageUrl":""}"#)
		}

		async fn post_file(&self, path: &str, field: &str, file: &TestFile) -> Result<String, HttpError> {
			self.calls.borrow_mut().push(Call::File {
				path: path.to_string(),
				field: field.to_string(),
				file: file.name,
			});
			let gate = self.upload_gate.borrow_mut().take();
			if let Some(gate) = gate {
				let _ = gate.await;
			}
			self.result(path, &format!(r#"{{"imageUrl":"{}"}}"#, UPLOADED_URL))
		}
	}

	struct PendingRead {
		file: &'static str,
		on_done: Option<PreviewCallback>,
		loading: Rc<Cell<bool>>,
		aborted: Rc<Cell<bool>>,
	}

	#[derive(Clone, Default)]
	struct FakeReader {
		reads: Rc<RefCell<Vec<PendingRead>>>,
	}

	impl FakeReader {
		/// Delivers the result of the `index`th read, even if it was aborted
		fn finish(&self, index: usize, result: Result<String, PreviewError>) {
			let on_done = {
				let mut reads = self.reads.borrow_mut();
				let read = &mut reads[index];
				read.loading.set(false);
				read.on_done.take()
			};
			if let Some(on_done) = on_done {
				on_done(result);
			}
		}

		fn was_aborted(&self, index: usize) -> bool {
			self.reads.borrow()[index].aborted.get()
		}
	}

	struct FakeHandle {
		loading: Rc<Cell<bool>>,
		aborted: Rc<Cell<bool>>,
	}

	impl ReadHandle for FakeHandle {
		fn is_loading(&self) -> bool {
			self.loading.get()
		}

		fn abort(&self) {
			self.aborted.set(true);
			self.loading.set(false);
		}
	}

	impl PreviewReader<TestFile> for FakeReader {
		type Handle = FakeHandle;

		fn read_as_data_url(&self, file: &TestFile, on_done: PreviewCallback) -> FakeHandle {
			let loading = Rc::new(Cell::new(true));
			let aborted = Rc::new(Cell::new(false));
			self.reads.borrow_mut().push(PendingRead {
				file: file.name,
				on_done: Some(on_done),
				loading: Rc::clone(&loading),
				aborted: Rc::clone(&aborted),
			});
			FakeHandle { loading, aborted }
		}
	}

	#[derive(Clone, Default)]
	struct FakeNotifier {
		notifications: Rc<RefCell<Vec<Notification>>>,
		alerts: Rc<RefCell<Vec<String>>>,
	}

	impl Notifier for FakeNotifier {
		fn notify(&self, notification: Notification) {
			self.notifications.borrow_mut().push(notification);
		}

		fn alert(&self, message: &str) {
			self.alerts.borrow_mut().push(message.to_string());
		}
	}

	struct Harness {
		api: FakeApi,
		reader: FakeReader,
		notifier: FakeNotifier,
		published: Rc<RefCell<Vec<FormSnapshot>>>,
		controller: SignupController<TestFile, FakeApi, FakeReader, FakeNotifier>,
	}

	impl Harness {
		fn new() -> Self {
			let api = FakeApi::default();
			let reader = FakeReader::default();
			let notifier = FakeNotifier::default();
			let published = Rc::new(RefCell::new(Vec::new()));
			let controller = SignupController::new(api.clone(), reader.clone(), notifier.clone(), {
				let published = Rc::clone(&published);
				move |snapshot: &FormSnapshot| published.borrow_mut().push(snapshot.clone())
			});
			Self {
				api,
				reader,
				notifier,
				published,
				controller,
			}
		}

		fn fill(&self, name: &str, email: &str) {
			self.controller.update_field(SignupField::Name, name);
			self.controller.update_field(SignupField::Email, email);
		}

		/// Selects an image and completes its preview read
		fn select_loaded(&self, file: TestFile) {
			self.controller.select_image(file).unwrap();
			let index = self.reader.reads.borrow().len() - 1;
			self.reader.finish(index, Ok(String::from("data:image/png;base64,AAAA")));
		}

		fn last_notification(&self) -> Notification {
			self.notifier
				.notifications
				.borrow()
				.last()
				.cloned()
				.expect("no notification was shown")
		}
	}

	#[test]
	fn invalid_input_never_reaches_the_network() {
		for (name, email) in [("", "sage@example.com"), ("Sage", ""), ("Sage", "sage.example.com"), ("", "")] {
			let harness = Harness::new();
			harness.fill(name, email);

			let result = block_on(harness.controller.submit());
			assert!(matches!(result, Err(SubmitError::Validation(_))), "{name:?} {email:?}");
			assert!(harness.api.calls.borrow().is_empty());

			let notification = harness.last_notification();
			assert_eq!(notification.title, "There was a problem signing up");
			assert!(harness.controller.snapshot().invalid_field.is_some());
			assert!(!harness.controller.snapshot().submitting);
		}
	}

	#[test]
	fn validation_failure_highlights_the_first_failing_field() {
		let harness = Harness::new();
		harness.fill("Sage", "not-an-email");

		let _ = block_on(harness.controller.submit());
		let snapshot = harness.controller.snapshot();
		assert_eq!(snapshot.invalid_field, Some(SignupField::Email));
		assert_eq!(
			harness.last_notification().description.as_deref(),
			Some("Please enter a valid email address")
		);

		harness.controller.update_field(SignupField::Email, "sage@example.com");
		assert_eq!(harness.controller.snapshot().invalid_field, None);
	}

	#[test]
	fn signup_without_image_sends_no_image_url() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");

		block_on(harness.controller.submit()).unwrap();
		assert_eq!(harness.api.paths(), vec!["auth/signup"]);
		assert_eq!(
			harness.api.last_json_body(),
			serde_json::json!({ "name": "Sage", "email": "sage@example.com" })
		);
	}

	#[test]
	fn image_is_uploaded_before_signup_and_its_reference_sent() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("avatar.png"));

		block_on(harness.controller.submit()).unwrap();
		assert_eq!(harness.api.paths(), vec!["uploads", "auth/signup"]);
		assert_eq!(
			harness.api.calls.borrow()[0],
			Call::File {
				path: String::from("uploads"),
				field: String::from("file"),
				file: "avatar.png",
			}
		);
		assert_eq!(harness.api.last_json_body()["imageUrl"], UPLOADED_URL);
	}

	#[test]
	fn image_still_loading_is_uploaded_rather_than_its_preview() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.controller.select_image(png("slow.png")).unwrap();

		block_on(harness.controller.submit()).unwrap();
		assert_eq!(harness.api.paths(), vec!["uploads", "auth/signup"]);
		assert!(harness.reader.was_aborted(0));
		assert_eq!(harness.api.last_json_body()["imageUrl"], UPLOADED_URL);
	}

	#[test]
	fn failed_upload_stops_before_signup_and_keeps_the_form() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("avatar.png"));
		harness.api.fail("uploads");

		let result = block_on(harness.controller.submit());
		assert!(matches!(result, Err(SubmitError::Upload(_))));
		assert_eq!(harness.api.paths(), vec!["uploads"]);

		let snapshot = harness.controller.snapshot();
		assert_eq!(snapshot.name, "Sage");
		assert_eq!(snapshot.email, "sage@example.com");
		assert!(snapshot.preview.is_some());
		assert!(!snapshot.submitting);

		let notification = harness.last_notification();
		assert_eq!(
			notification.description.as_deref(),
			Some("Request failed with status code 500: Error while trying to reach the server")
		);
	}

	#[test]
	fn failed_signup_keeps_the_form_and_the_uploaded_reference() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("avatar.png"));
		harness.api.fail("auth/signup");

		let result = block_on(harness.controller.submit());
		assert!(matches!(result, Err(SubmitError::Signup(_))));

		let snapshot = harness.controller.snapshot();
		assert_eq!(snapshot.name, "Sage");
		assert_eq!(snapshot.image_url.as_deref(), Some(UPLOADED_URL));
		assert!(snapshot.preview.is_none());

		// Retrying sends the stored reference without uploading again
		harness.api.succeed("auth/signup");
		block_on(harness.controller.submit()).unwrap();
		assert_eq!(harness.api.paths(), vec!["uploads", "auth/signup", "auth/signup"]);
		assert_eq!(harness.api.last_json_body()["imageUrl"], UPLOADED_URL);
	}

	#[test]
	fn unsupported_file_is_rejected_with_an_alert() {
		let harness = Harness::new();
		let text_file = TestFile {
			name: "notes.txt",
			mime_type: "text/plain",
		};

		let result = harness.controller.select_image(text_file);
		assert_eq!(
			result,
			Err(UnsupportedFileType {
				mime_type: String::from("text/plain")
			})
		);
		assert_eq!(*harness.notifier.alerts.borrow(), vec![String::from("Image type is not supported")]);
		assert!(harness.reader.reads.borrow().is_empty());
		assert_eq!(harness.controller.snapshot(), FormSnapshot::default());
		assert!(harness.published.borrow().is_empty());
	}

	#[test]
	fn unsupported_file_leaves_current_image_alone() {
		let harness = Harness::new();
		harness.select_loaded(png("avatar.png"));
		let before = harness.controller.snapshot();

		let gif = TestFile {
			name: "anim.gif",
			mime_type: "image/gif",
		};
		assert!(harness.controller.select_image(gif).is_err());
		assert_eq!(harness.controller.snapshot(), before);
	}

	#[test]
	fn superseded_preview_never_overwrites_the_newer_one() {
		let harness = Harness::new();
		harness.controller.select_image(png("a.png")).unwrap();
		harness.controller.select_image(png("b.png")).unwrap();
		assert!(harness.reader.was_aborted(0));
		assert!(!harness.reader.was_aborted(1));

		harness.reader.finish(1, Ok(String::from("data:b")));
		harness.reader.finish(0, Ok(String::from("data:a")));

		assert_eq!(harness.controller.snapshot().preview.as_deref(), Some("data:b"));
		assert_eq!(harness.reader.reads.borrow()[1].file, "b.png");
	}

	#[test]
	fn stale_preview_is_ignored_even_before_the_newer_one_lands() {
		let harness = Harness::new();
		harness.controller.select_image(png("a.png")).unwrap();
		harness.controller.select_image(png("b.png")).unwrap();

		harness.reader.finish(0, Ok(String::from("data:a")));
		let snapshot = harness.controller.snapshot();
		assert!(snapshot.preview.is_none());
		assert!(snapshot.preview_loading);
	}

	#[test]
	fn failed_preview_read_drops_the_pending_image() {
		let harness = Harness::new();
		harness.controller.select_image(png("a.png")).unwrap();
		harness.reader.finish(0, Err(PreviewError::Read(String::from("NotReadableError"))));

		assert_eq!(harness.controller.snapshot(), FormSnapshot::default());
	}

	#[test]
	fn remove_image_is_idempotent() {
		let harness = Harness::new();
		harness.select_loaded(png("avatar.png"));
		harness.controller.remove_image();
		harness.controller.remove_image();

		let snapshot = harness.controller.snapshot();
		assert!(snapshot.preview.is_none());
		assert!(!snapshot.preview_loading);
	}

	#[test]
	fn successful_signup_resets_everything() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("avatar.png"));

		block_on(harness.controller.submit()).unwrap();
		assert_eq!(harness.controller.snapshot(), FormSnapshot::default());
		assert_eq!(harness.published.borrow().last(), Some(&FormSnapshot::default()));

		let notification = harness.last_notification();
		assert_eq!(notification.title, "Signup successful");
		assert!(notification.closable);
	}

	#[test]
	fn cancel_always_returns_to_the_empty_form() {
		let harness = Harness::new();
		harness.controller.cancel();
		assert_eq!(harness.controller.snapshot(), FormSnapshot::default());

		harness.fill("Sage", "");
		harness.controller.cancel();
		assert_eq!(harness.controller.snapshot(), FormSnapshot::default());

		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("avatar.png"));
		harness.controller.select_image(png("pending.png")).unwrap();
		harness.controller.cancel();
		assert_eq!(harness.controller.snapshot(), FormSnapshot::default());
		assert!(harness.reader.was_aborted(1));
	}

	#[test]
	fn second_submit_is_rejected_while_one_is_running() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("avatar.png"));
		let (release_upload, gate) = oneshot::channel();
		*harness.api.upload_gate.borrow_mut() = Some(gate);

		let first = harness.controller.submit();
		futures::pin_mut!(first);
		assert!(first.as_mut().now_or_never().is_none());
		assert!(harness.controller.snapshot().submitting);

		let second = block_on(harness.controller.submit());
		assert!(matches!(second, Err(SubmitError::InProgress)));
		assert_eq!(harness.api.paths(), vec!["uploads"]);

		release_upload.send(()).unwrap();
		block_on(first).unwrap();
		assert_eq!(harness.api.paths(), vec!["uploads", "auth/signup"]);
		assert!(!harness.controller.snapshot().submitting);
	}

	#[test]
	fn cancel_during_upload_keeps_the_form_empty() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("avatar.png"));
		harness.api.fail("auth/signup");
		let (release_upload, gate) = oneshot::channel();
		*harness.api.upload_gate.borrow_mut() = Some(gate);

		let submission = harness.controller.submit();
		futures::pin_mut!(submission);
		assert!(submission.as_mut().now_or_never().is_none());
		harness.controller.cancel();

		release_upload.send(()).unwrap();
		let result = block_on(submission);
		assert!(matches!(result, Err(SubmitError::Signup(_))));
		assert_eq!(harness.api.last_json_body()["imageUrl"], UPLOADED_URL);
		assert_eq!(harness.controller.snapshot(), FormSnapshot::default());
	}

	#[test]
	fn edits_made_after_cancel_survive_the_earlier_signup() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("avatar.png"));
		let (release_upload, gate) = oneshot::channel();
		*harness.api.upload_gate.borrow_mut() = Some(gate);

		let submission = harness.controller.submit();
		futures::pin_mut!(submission);
		assert!(submission.as_mut().now_or_never().is_none());
		harness.controller.cancel();
		harness.fill("River", "river@example.com");

		release_upload.send(()).unwrap();
		block_on(submission).unwrap();
		assert_eq!(harness.api.last_json_body()["name"], "Sage");

		let snapshot = harness.controller.snapshot();
		assert_eq!(snapshot.name, "River");
		assert_eq!(snapshot.email, "river@example.com");
		assert_eq!(snapshot.image_url, None);
		assert!(!snapshot.submitting);
	}

	#[test]
	fn image_picked_during_upload_is_kept() {
		let harness = Harness::new();
		harness.fill("Sage", "sage@example.com");
		harness.select_loaded(png("a.png"));
		harness.api.fail("auth/signup");
		let (release_upload, gate) = oneshot::channel();
		*harness.api.upload_gate.borrow_mut() = Some(gate);

		let submission = harness.controller.submit();
		futures::pin_mut!(submission);
		assert!(submission.as_mut().now_or_never().is_none());
		harness.controller.select_image(png("b.png")).unwrap();

		release_upload.send(()).unwrap();
		assert!(matches!(block_on(submission), Err(SubmitError::Signup(_))));
		assert!(!harness.reader.was_aborted(1));
		assert!(harness.controller.snapshot().preview_loading);

		harness.reader.finish(1, Ok(String::from("data:b")));
		assert_eq!(harness.controller.snapshot().preview.as_deref(), Some("data:b"));

		// The newer image is uploaded on the next attempt
		harness.api.succeed("auth/signup");
		block_on(harness.controller.submit()).unwrap();
		assert_eq!(harness.api.paths(), vec!["uploads", "auth/signup", "uploads", "auth/signup"]);
		assert_eq!(
			harness.api.calls.borrow()[2],
			Call::File {
				path: String::from("uploads"),
				field: String::from("file"),
				file: "b.png",
			}
		);
	}

	#[test]
	fn dropping_the_controller_aborts_a_running_read() {
		let harness = Harness::new();
		harness.controller.select_image(png("a.png")).unwrap();
		let Harness { reader, controller, .. } = harness;

		drop(controller);
		assert!(reader.was_aborted(0));
	}
}
