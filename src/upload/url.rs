//! URL helpers for hosted bill attachments

/// Path segment after which the asset host accepts transformations
pub const UPLOAD_SEGMENT: &str = "upload/";

/// Transformation producing the bordered 200x250 bill thumbnail
pub const THUMBNAIL_TRANSFORMATION: &str = "w_200,h_250,bo_1px_solid_black/";

/// Derive the thumbnail URL of an uploaded asset.
///
/// The transformation is inserted right after the first `upload/` segment and
/// the extension is forced to `.jpg`, so PDFs get an image preview too.
pub fn thumbnail_url(original: &str) -> String {
    match original.find(UPLOAD_SEGMENT) {
        Some(index) => {
            let (prefix, asset) = original.split_at(index + UPLOAD_SEGMENT.len());
            format!(
                "{}{}{}",
                prefix,
                THUMBNAIL_TRANSFORMATION,
                with_jpg_extension(asset)
            )
        }
        None => with_jpg_extension(original),
    }
}

/// Replace the extension of the last path segment with `jpg`
fn with_jpg_extension(path: &str) -> String {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) => format!("{}.jpg", &path[..file_start + dot]),
        None => format!("{}.jpg", path),
    }
}

/// Lower-cased extension of a file name, with `jpeg` folded into `jpg`
pub fn normalized_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    let ext = ext.to_ascii_lowercase();
    Some(if ext == "jpeg" { "jpg".to_string() } else { ext })
}
