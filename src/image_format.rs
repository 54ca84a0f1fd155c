//! # Image Format Sniffing
//!
//! Plugins only touch buffers of their own format and hand everything else
//! back untouched, so each one needs to recognise its input from the bytes
//! alone. Raster formats come from `image::guess_format` (magic bytes), SVG
//! from a text sniff of the document root.

use image::ImageFormat;

/// Formats handled by the default plugins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gif,
    Jpeg,
    Png,
    Svg,
}

impl ImageKind {
    /// Detect the format of a buffer
    pub fn detect(buf: &[u8]) -> Option<Self> {
        match image::guess_format(buf) {
            Ok(ImageFormat::Gif) => Some(Self::Gif),
            Ok(ImageFormat::Jpeg) => Some(Self::Jpeg),
            Ok(ImageFormat::Png) => Some(Self::Png),
            _ if is_svg(buf) => Some(Self::Svg),
            _ => None,
        }
    }

    /// File extension used for temporary tool input/output
    pub fn extension(self) -> &'static str {
        match self {
            Self::Gif => "gif",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// True when the document root is an `<svg>` element
pub fn is_svg(buf: &[u8]) -> bool {
    // The root element is always near the top; skip prolog, comments and doctype.
    let head = &buf[..buf.len().min(16 * 1024)];
    let text = String::from_utf8_lossy(head);
    let mut rest = text.trim_start_matches('\u{feff}').trim_start();

    loop {
        if let Some(after) = rest.strip_prefix("<?") {
            match after.find("?>") {
                Some(end) => rest = after[end + 2..].trim_start(),
                None => return false,
            }
        } else if let Some(after) = rest.strip_prefix("<!--") {
            match after.find("-->") {
                Some(end) => rest = after[end + 3..].trim_start(),
                None => return false,
            }
        } else if let Some(after) = rest.strip_prefix("<!DOCTYPE").or_else(|| rest.strip_prefix("<!doctype")) {
            match doctype_end(after) {
                Some(end) => rest = after[end..].trim_start(),
                None => return false,
            }
        } else {
            break;
        }
    }

    rest.strip_prefix("<svg")
        .and_then(|after| after.chars().next())
        .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
}

/// Offset just past the `>` closing a DOCTYPE, skipping an internal
/// subset (`[ <!ENTITY ...> ]`) when present
fn doctype_end(after: &str) -> Option<usize> {
    let close = after.find('>')?;
    match after.find('[') {
        Some(open) if open < close => {
            let subset_end = open + after[open..].find(']')?;
            let close = subset_end + after[subset_end..].find('>')?;
            Some(close + 1)
        }
        _ => Some(close + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_HEADER: &[u8] = b"\xff\xd8\xff\xe0\0\x10JFIF\0";
    const GIF_HEADER: &[u8] = b"GIF89a\x01\0\x01\0";

    #[test]
    fn test_detect_raster_formats() {
        assert_eq!(ImageKind::detect(PNG_HEADER), Some(ImageKind::Png));
        assert_eq!(ImageKind::detect(JPEG_HEADER), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::detect(GIF_HEADER), Some(ImageKind::Gif));
        assert_eq!(ImageKind::detect(b"plain text"), None);
    }

    #[test]
    fn test_detect_svg() {
        let svg = br#"<?xml version="1.0"?>
<!-- exported -->
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg"></svg>"#;
        assert_eq!(ImageKind::detect(svg), Some(ImageKind::Svg));
        assert!(is_svg(b"  <svg/>"));
        assert!(!is_svg(b"<svgfoo></svgfoo>"));
        assert!(!is_svg(b"<html><svg></svg></html>"));
        assert!(!is_svg(b"<!-- unterminated"));
    }

    #[test]
    fn test_detect_svg_with_internal_subset() {
        let svg = br#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd" [
	<!ENTITY ns_extend "http://ns.adobe.com/Extensibility/1.0/">
	<!ENTITY ns_ai "http://ns.adobe.com/AdobeIllustrator/10.0/">
]>
<svg version="1.1" xmlns="http://www.w3.org/2000/svg" xmlns:x="&ns_extend;"></svg>"#;
        assert_eq!(ImageKind::detect(svg), Some(ImageKind::Svg));
        assert!(!is_svg(br#"<!DOCTYPE svg [ <!ENTITY a "b"> <svg/>"#));
    }
}
