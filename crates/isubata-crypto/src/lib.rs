//! Isubata identity and content-addressing helpers.
//!
//! Passwords are stored as hex SHA-1 of a per-user random salt followed by
//! the password. Avatar images are named after the hex SHA-1 of their bytes,
//! so identical uploads share one stored row.

pub mod image;
pub mod password;

pub use image::{ALLOWED_EXTENSIONS, avatar_extension, image_name, mime_for};
pub use password::{SALT_LEN, hash_password, random_string, verify_password};
