use std::collections::HashMap;

use mime::Mime;
use lazy_static::lazy_static;

lazy_static! {
    static ref EXT_MIME_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        // documents
        m.insert("txt", "text/plain");
        m.insert("pdf", "application/pdf");
        m.insert("doc", "application/msword");
        m.insert("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document");
        m.insert("xls", "application/vnd.ms-excel");
        m.insert("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet");
        m.insert("ppt", "application/vnd.ms-powerpoint");
        m.insert("pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation");

        // media
        m.insert("jpg", "image/jpeg");
        m.insert("jpeg", "image/jpeg");
        m.insert("png", "image/png");
        m.insert("gif", "image/gif");
        m.insert("mp4", "video/mp4");
        m.insert("mp3", "audio/mpeg");

        // data
        m.insert("zip", "application/zip");
        m.insert("json", "application/json");
        m.insert("xml", "application/xml");
        m
    };
}

/// accepts the extension with or without its leading dot
pub fn mime_from_ext(ext: Option<&str>) -> Mime {
    let Some(ext) = ext else {
        return mime::APPLICATION_OCTET_STREAM;
    };

    let lower = ext.trim_start_matches('.').to_ascii_lowercase();

    if let Some(mime_str) = EXT_MIME_MAP.get(lower.as_str()) {
        (*mime_str).parse().unwrap()
    } else {
        mime::APPLICATION_OCTET_STREAM
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_from_ext(Some("pdf")), "application/pdf");
        assert_eq!(mime_from_ext(Some(".pdf")), "application/pdf");
        assert_eq!(mime_from_ext(Some("JPG")), "image/jpeg");
        assert_eq!(mime_from_ext(Some("docx")).to_string(), "application/vnd.openxmlformats-officedocument.wordprocessingml.document");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        assert_eq!(mime_from_ext(Some("bin")), mime::APPLICATION_OCTET_STREAM);
        assert_eq!(mime_from_ext(None), mime::APPLICATION_OCTET_STREAM);
    }
}
