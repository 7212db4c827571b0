// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::PreviewError;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, FileReader, ProgressEvent};

/// `FileReader.readyState` while a read is underway
const LOADING: u16 = 1;

/// A local file picked by the user
pub trait ImageFile: Clone + 'static {
	fn mime_type(&self) -> String;
}

impl ImageFile for File {
	fn mime_type(&self) -> String {
		self.type_()
	}
}

pub type PreviewCallback = Box<dyn FnOnce(Result<String, PreviewError>)>;

/// Reads files into a form that can be displayed as a preview
pub trait PreviewReader<F> {
	type Handle: ReadHandle;

	/// Starts reading `file` as a data URL. `on_done` is called once with the result unless the read is aborted
	/// first.
	fn read_as_data_url(&self, file: &F, on_done: PreviewCallback) -> Self::Handle;
}

/// An asynchronous read that may still be running
pub trait ReadHandle {
	fn is_loading(&self) -> bool;
	fn abort(&self);
}

#[derive(Clone, Copy, Default)]
pub struct BrowserFileReader;

/// A read running on a browser `FileReader`. The event handlers live as long as the handle does.
pub struct BrowserRead {
	reader: Option<FileReader>,
	_on_load: Option<Closure<dyn FnMut(ProgressEvent)>>,
	_on_error: Option<Closure<dyn FnMut(ProgressEvent)>>,
}

impl BrowserRead {
	/// A handle for a read that never started, after its failure was already reported
	fn failed() -> Self {
		Self {
			reader: None,
			_on_load: None,
			_on_error: None,
		}
	}
}

impl PreviewReader<File> for BrowserFileReader {
	type Handle = BrowserRead;

	fn read_as_data_url(&self, file: &File, on_done: PreviewCallback) -> BrowserRead {
		let reader = match FileReader::new() {
			Ok(reader) => reader,
			Err(error) => {
				on_done(Err(PreviewError::Start(format!("{:?}", error))));
				return BrowserRead::failed();
			}
		};

		// Load and error both report through the same one-shot callback
		let on_done = Rc::new(RefCell::new(Some(on_done)));

		let on_load = {
			let reader = reader.clone();
			let on_done = Rc::clone(&on_done);
			Closure::<dyn FnMut(ProgressEvent)>::new(move |_event: ProgressEvent| {
				let Some(on_done) = on_done.borrow_mut().take() else {
					return;
				};
				let result = match reader.result() {
					Ok(value) => value.as_string().ok_or(PreviewError::NotText),
					Err(error) => Err(PreviewError::Read(format!("{:?}", error))),
				};
				on_done(result);
			})
		};
		let on_error = {
			let reader = reader.clone();
			let on_done = Rc::clone(&on_done);
			Closure::<dyn FnMut(ProgressEvent)>::new(move |_event: ProgressEvent| {
				let Some(on_done) = on_done.borrow_mut().take() else {
					return;
				};
				let message = reader
					.error()
					.map(|error| error.message())
					.unwrap_or_else(|| String::from("unknown error"));
				on_done(Err(PreviewError::Read(message)));
			})
		};
		reader.set_onload(Some(on_load.as_ref().unchecked_ref()));
		reader.set_onerror(Some(on_error.as_ref().unchecked_ref()));

		if let Err(error) = reader.read_as_data_url(file) {
			let callback = on_done.borrow_mut().take();
			if let Some(callback) = callback {
				callback(Err(PreviewError::Start(format!("{:?}", error))));
			}
		}

		BrowserRead {
			reader: Some(reader),
			_on_load: Some(on_load),
			_on_error: Some(on_error),
		}
	}
}

impl ReadHandle for BrowserRead {
	fn is_loading(&self) -> bool {
		self.reader
			.as_ref()
			.map(|reader| reader.ready_state() == LOADING)
			.unwrap_or(false)
	}

	fn abort(&self) {
		if let Some(reader) = self.reader.as_ref() {
			reader.abort();
		}
	}
}

impl Drop for BrowserRead {
	fn drop(&mut self) {
		if let Some(reader) = self.reader.take() {
			reader.set_onload(None);
			reader.set_onerror(None);
			if reader.ready_state() == LOADING {
				reader.abort();
			}
		}
	}
}
