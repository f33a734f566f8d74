use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Decode a base64 image payload, with or without the
/// `data:image/...;base64,` prefix. Returns the bytes and a file
/// extension guessed from the declared content type.
pub fn decode_data_url(data_url: &str) -> Result<(Vec<u8>, &'static str), String> {
    let parts: Vec<&str> = data_url.split(',').collect();
    let base64_data = if parts.len() > 1 { parts[1] } else { data_url };

    let bytes = BASE64
        .decode(base64_data.trim())
        .map_err(|e| format!("Invalid base64 image data: {}", e))?;

    if bytes.is_empty() {
        return Err("Empty image data".to_string());
    }

    let ext = if data_url.contains("image/jpeg") || data_url.contains("image/jpg") {
        "jpg"
    } else {
        "png"
    };

    Ok((bytes, ext))
}

pub fn content_type_for(ext: &str) -> String {
    format!("image/{}", if ext == "jpg" { "jpeg" } else { ext })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_data_url_with_prefix() {
        let (bytes, ext) = decode_data_url("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(ext, "jpg");
    }

    #[test]
    fn decodes_bare_base64_as_png() {
        let (bytes, ext) = decode_data_url("aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
        assert_eq!(ext, "png");
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_data_url("%%%not-base64%%%").is_err());
        assert!(decode_data_url("").is_err());
    }
}
