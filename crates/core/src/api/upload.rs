use reqwest::multipart::{Form, Part};
use serde_json::Value;
use skillswap_protocol::endpoints::{UPLOAD_DOCUMENT, UPLOAD_PROFILE_PHOTO};
use skillswap_protocol::Envelope;

use crate::ApiClient;

/// In-memory file handed to an upload endpoint.
#[derive(Debug, Clone)]
pub struct UploadFile {
	pub file_name: String,
	pub mime_type: String,
	pub bytes: Vec<u8>,
}

impl UploadFile {
	pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
		Self {
			file_name: file_name.into(),
			mime_type: mime_type.into(),
			bytes,
		}
	}

	fn into_part(self) -> reqwest::Result<Part> {
		Part::bytes(self.bytes)
			.file_name(self.file_name)
			.mime_str(&self.mime_type)
	}
}

/// Multipart uploads. Size and type limits in
/// [`skillswap_protocol::limits`] are advisory and not enforced here.
#[derive(Debug, Clone, Copy)]
pub struct UploadApi<'a> {
	client: &'a ApiClient,
}

impl<'a> UploadApi<'a> {
	pub(crate) fn new(client: &'a ApiClient) -> Self {
		Self { client }
	}

	/// Sends the file as the `photo` field.
	pub async fn profile_photo(&self, file: UploadFile) -> Envelope<Value> {
		match file.into_part() {
			Ok(part) => {
				self.client
					.upload(UPLOAD_PROFILE_PHOTO, Form::new().part("photo", part))
					.await
			}
			Err(err) => Envelope::failure(format!("invalid upload: {err}")),
		}
	}

	/// Sends the file as `document` alongside its `type` label.
	pub async fn document(&self, file: UploadFile, kind: &str) -> Envelope<Value> {
		match file.into_part() {
			Ok(part) => {
				let form = Form::new().part("document", part).text("type", kind.to_string());
				self.client.upload(UPLOAD_DOCUMENT, form).await
			}
			Err(err) => Envelope::failure(format!("invalid upload: {err}")),
		}
	}
}
