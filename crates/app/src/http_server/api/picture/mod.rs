//! Picture uploads kept beside the trees, addressed by generated ids.
//!
//! Pictures are raw objects under `pictures/{id}` where the id is
//!  `{owner}_{hex}` plus the uploaded file's extension, if it had a sane one.

pub mod get;
pub mod upload;

pub const PICTURE_PREFIX: &str = "pictures";

pub(crate) fn object_key(id: &str) -> String {
    format!("{}/{}", PICTURE_PREFIX, id)
}

/// Ids only ever contain what [`upload`] generates.
pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
