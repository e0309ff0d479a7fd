//! Upload constraints published for form components.
//!
//! The transport layer does not enforce these; they are descriptive.

/// Size and MIME constraints for one upload slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimit {
	pub max_size: u64,
	pub allowed_types: &'static [&'static str],
}

impl UploadLimit {
	pub fn allows_type(&self, mime: &str) -> bool {
		self.allowed_types.iter().any(|allowed| allowed.eq_ignore_ascii_case(mime))
	}

	pub fn allows_size(&self, size: u64) -> bool {
		size <= self.max_size
	}
}

pub const PROFILE_PHOTO_LIMIT: UploadLimit = UploadLimit {
	max_size: 2 * 1024 * 1024,
	allowed_types: &["image/jpeg", "image/png", "image/webp"],
};

pub const DOCUMENT_LIMIT: UploadLimit = UploadLimit {
	max_size: 10 * 1024 * 1024,
	allowed_types: &[
		"application/pdf",
		"application/msword",
		"application/vnd.openxmlformats-officedocument.wordprocessingml.document",
	],
};
