use sha1::{Digest, Sha1};

/// Extensions accepted for avatar uploads, dot included.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];

/// Content-addressed name: hex SHA-1 of the bytes followed by `ext`.
pub fn image_name(data: &[u8], ext: &str) -> String {
    format!("{}{}", hex::encode(Sha1::digest(data)), ext)
}

/// Extension of an uploaded file name (from the last dot) if it is one of
/// [`ALLOWED_EXTENSIONS`].
pub fn avatar_extension(filename: &str) -> Option<&str> {
    let ext = &filename[filename.rfind('.')?..];
    ALLOWED_EXTENSIONS.contains(&ext).then_some(ext)
}

/// MIME type served for a stored image name, `None` for anything unknown.
pub fn mime_for(name: &str) -> Option<&'static str> {
    if name.ends_with(".jpg") || name.ends_with(".jpeg") {
        Some("image/jpeg")
    } else if name.ends_with(".png") {
        Some("image/png")
    } else if name.ends_with(".gif") {
        Some("image/gif")
    } else {
        None
    }
}
