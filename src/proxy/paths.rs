//! Image path derivation
//!
//! Card image file names encode their cache location: "WXDi-P01-001.jpg"
//! lives under "WXDi/P01/001.jpg". The slug used for the existence check is
//! the file name without its extension.

use std::path::{Path, PathBuf};

/// Splits an image file name into its cache sub-path and bare file name
///
/// Tokens before the last `-` become directory levels. Returns `None` for
/// names that cannot produce a file (trailing `-` or empty input).
pub fn split_image_name(file: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = file.split('-').collect();
    let (name, rest) = tokens.split_last()?;
    if name.is_empty() {
        return None;
    }
    Some((rest.join("/"), name.to_string()))
}

/// The record slug an image file name refers to (extension stripped)
pub fn slug_for_image(file: &str) -> &str {
    match file.find('.') {
        Some(i) => &file[..i],
        None => file,
    }
}

/// Local cache path for a requested image
pub fn cache_file_path(image_cache_dir: &Path, product_dir: &str, file: &str) -> Option<PathBuf> {
    let (sub_path, name) = split_image_name(file)?;
    let mut path = image_cache_dir.join(product_dir);
    for segment in sub_path.split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(name);
    Some(path)
}

/// Origin URL the image is proxied from
pub fn origin_url(image_origin: &str, product_dir: &str, file: &str) -> String {
    format!(
        "{}/{}/{}",
        image_origin.trim_end_matches('/'),
        product_dir,
        file
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_image_name() {
        assert_eq!(
            split_image_name("WXDi-P01-001.jpg"),
            Some(("WXDi/P01".to_string(), "001.jpg".to_string()))
        );
    }

    #[test]
    fn test_split_image_name_single_token() {
        assert_eq!(
            split_image_name("001.jpg"),
            Some((String::new(), "001.jpg".to_string()))
        );
    }

    #[test]
    fn test_split_image_name_trailing_dash() {
        assert_eq!(split_image_name("WXDi-"), None);
    }

    #[test]
    fn test_slug_strips_extension() {
        assert_eq!(slug_for_image("WXDi-P01-001.jpg"), "WXDi-P01-001");
        assert_eq!(slug_for_image("WXDi-P01-001"), "WXDi-P01-001");
    }

    #[test]
    fn test_cache_file_path_layout() {
        let path = cache_file_path(Path::new("/cache/img"), "WXDi-P01", "WXDi-P01-001.jpg");
        assert_eq!(
            path,
            Some(PathBuf::from("/cache/img/WXDi-P01/WXDi/P01/001.jpg"))
        );
    }

    #[test]
    fn test_origin_url() {
        assert_eq!(
            origin_url(
                "https://catalog.example.com/img/card",
                "WXDi-P01",
                "WXDi-P01-001.jpg"
            ),
            "https://catalog.example.com/img/card/WXDi-P01/WXDi-P01-001.jpg"
        );
    }
}
