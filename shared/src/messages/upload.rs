// © 2022-2024 Jacob Riddle (ElementalAlchemist)
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};

/// Path of the endpoint that stores an uploaded image
pub const UPLOAD_PATH: &str = "uploads";

/// Name of the multipart field carrying the image file
pub const UPLOAD_FILE_FIELD: &str = "file";

/// Image subtypes accepted for avatars
pub const ALLOWED_IMAGE_SUBTYPES: [&str; 3] = ["png", "jpg", "jpeg"];

/// Response data from the API for a successful upload
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
	pub image_url: String,
}

/// Checks whether a MIME type names one of the accepted image formats. Matching is case-insensitive and, as with
/// the browser's own type strings, tolerates parameters after the subtype (`image/png; charset=binary`).
pub fn is_supported_image_type(mime_type: &str) -> bool {
	let essence = mime_type.split(';').next().unwrap_or_default().trim();
	let Some((kind, subtype)) = essence.split_once('/') else {
		return false;
	};
	kind.eq_ignore_ascii_case("image")
		&& ALLOWED_IMAGE_SUBTYPES
			.iter()
			.any(|allowed| subtype.eq_ignore_ascii_case(allowed))
}
