//! Filename generation shared by all storage backends.
//!
//! Stored filenames are `{uuid}.{ext}`. The UUID doubles as the review image id, so a
//! record and its object can always be matched by filename stem.

use uuid::Uuid;

const MAX_EXTENSION_LEN: usize = 8;

/// A freshly generated filename together with the id it embeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFilename {
    pub id: Uuid,
    pub filename: String,
}

/// Generate a unique filename for an image of type `content_type`.
///
/// The original extension is kept (lowercased, ASCII alphanumerics only) when it is one
/// of the spellings of that type; anything else is replaced by the type's default
/// extension. The stored name never carries an extension the bytes were not validated as.
pub fn generate_filename(original_filename: &str, content_type: &str) -> GeneratedFilename {
    let id = Uuid::new_v4();
    let extension = sanitize_extension(original_filename)
        .filter(|ext| extensions_for_mime(content_type).contains(&ext.as_str()))
        .or_else(|| extension_for_mime(content_type).map(String::from));

    let filename = match extension {
        Some(ext) => format!("{}.{}", id, ext),
        None => id.to_string(),
    };

    GeneratedFilename { id, filename }
}

fn sanitize_extension(original_filename: &str) -> Option<String> {
    let base = original_filename.rsplit(['/', '\\']).next()?;
    let (stem, ext) = base.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }

    let ext: String = ext
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(MAX_EXTENSION_LEN)
        .collect::<String>()
        .to_ascii_lowercase();

    (!ext.is_empty()).then_some(ext)
}

fn normalized_mime(content_type: &str) -> Option<String> {
    Some(content_type.split(';').next()?.trim().to_ascii_lowercase())
}

/// Default file extension for a supported image MIME type
pub fn extension_for_mime(content_type: &str) -> Option<&'static str> {
    extensions_for_mime(content_type).first().copied()
}

/// Every accepted extension for a supported image MIME type, default first
fn extensions_for_mime(content_type: &str) -> &'static [&'static str] {
    match normalized_mime(content_type).as_deref() {
        Some("image/jpeg") | Some("image/jpg") => &["jpg", "jpeg"],
        Some("image/png") => &["png"],
        Some("image/webp") => &["webp"],
        _ => &[],
    }
}

/// Extract the stored filename from a public URL (its last path segment).
pub fn filename_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next()?;
    path.rsplit('/').next().filter(|segment| !segment.is_empty())
}
