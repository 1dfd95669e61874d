//! Object names for uploaded ticket images.

use super::types::ImageFile;
use chrono::{DateTime, Utc};
use rand::Rng;

/// Folder of listing images inside the bucket
pub const IMAGE_FOLDER: &str = "ticket-images";

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// File extension: from the name if it has one, else from the MIME subtype
#[must_use]
pub fn extension(file: &ImageFile) -> String {
    let from_name = file
        .name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric()));
    let from_type = || {
        file.content_type
            .split_once('/')
            .map(|(_, subtype)| subtype.split(['+', ';']).next().unwrap_or(subtype))
            .filter(|subtype| !subtype.is_empty())
    };
    from_name
        .or_else(from_type)
        .unwrap_or("bin")
        .to_ascii_lowercase()
}

/// Collision-resistant object path: `ticket-images/{unix_millis}-{random}.{ext}`
pub fn object_path<R: Rng + ?Sized>(now: DateTime<Utc>, file: &ImageFile, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    format!(
        "{IMAGE_FOLDER}/{}-{suffix}.{}",
        now.timestamp_millis(),
        extension(file)
    )
}
