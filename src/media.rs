//! Storage of uploaded post images under the media directory.

use std::fs;
use std::path::Path;

use actix_multipart::form::tempfile::TempFile;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::types::{ImagePath, TypeConstraintError};

pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Largest accepted post image, in bytes.
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Subdirectory of the media root that holds post images.
const POST_IMAGES_DIR: &str = "posts";

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Допустимые форматы изображений: jpg, jpeg, png, gif, webp.")]
    UnsupportedExtension,
    #[error("Размер изображения не должен превышать 5 МБ.")]
    TooLarge,
    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid media path: {0}")]
    Path(#[from] TypeConstraintError),
}

/// Lower-cased extension of `file_name` when it is an allowed image type.
pub fn image_extension(file_name: Option<&str>) -> Option<String> {
    let extension = Path::new(file_name?)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_IMAGE_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// Copy `source` into `<media_dir>/posts/<uuid>.<ext>` and return the path
/// relative to the media root.
pub fn store_image(
    source: &Path,
    file_name: Option<&str>,
    media_dir: &Path,
) -> Result<ImagePath, MediaError> {
    let extension = image_extension(file_name).ok_or(MediaError::UnsupportedExtension)?;
    let relative = format!("{POST_IMAGES_DIR}/{}.{extension}", Uuid::new_v4());

    fs::create_dir_all(media_dir.join(POST_IMAGES_DIR))?;
    fs::copy(source, media_dir.join(&relative))?;

    Ok(ImagePath::new(relative)?)
}

/// Reject uploads that are too large or of an unknown type before anything
/// is written to the media directory.
pub fn check_post_image(file: &TempFile) -> Result<(), MediaError> {
    if file.size > MAX_IMAGE_SIZE {
        return Err(MediaError::TooLarge);
    }
    image_extension(file.file_name.as_deref())
        .map(|_| ())
        .ok_or(MediaError::UnsupportedExtension)
}

/// Delete a stored image. A file that is already gone is not an error.
pub fn remove_image(image: &ImagePath, media_dir: &Path) -> Result<(), MediaError> {
    match fs::remove_file(media_dir.join(image.as_str())) {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Store an uploaded post image.
pub fn store_post_image(file: &TempFile, media_dir: &Path) -> Result<ImagePath, MediaError> {
    store_image(file.file.path(), file.file_name.as_deref(), media_dir)
}
