use mime_guess::mime;
use std::path::Path;

#[cfg(windows)]
const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

/// Returns the short type description shown in the "Type" column.
///
/// Directories are "Folder", files without an extension are plain "File",
/// everything else is the upper-cased extension followed by a coarse kind
/// guessed from the MIME type ("PNG Image", "TXT File").
pub fn type_label(path: &Path, is_directory: bool) -> String {
    if is_directory {
        return "Folder".to_string();
    }

    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return "File".to_string();
    };
    if ext.is_empty() {
        return "File".to_string();
    }

    let kind = match mime_guess::from_ext(ext).first() {
        Some(guess) if guess.type_() == mime::IMAGE => "Image",
        Some(guess) if guess.type_() == mime::AUDIO => "Audio",
        Some(guess) if guess.type_() == mime::VIDEO => "Video",
        Some(guess) if guess.type_() == "font" => "Font",
        _ => "File",
    };

    format!("{} {}", ext.to_uppercase(), kind)
}

/// Returns `true` for entries a platform file view hides by default.
///
/// On Unix that is any dot-file. Windows additionally honours the hidden
/// file attribute.
pub fn is_hidden(path: &Path) -> bool {
    let dot_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'));

    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        dot_file
            || std::fs::symlink_metadata(path)
                .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
                .unwrap_or(false)
    }

    #[cfg(not(windows))]
    {
        dot_file
    }
}
