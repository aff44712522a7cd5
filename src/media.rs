use base64::Engine;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLimits {
    pub max_bytes: usize,
    pub max_dimension: u32,
}

impl Default for ImageLimits {
    fn default() -> Self {
        ImageLimits {
            max_bytes: 5 * 1024 * 1024,
            max_dimension: 1600,
        }
    }
}

/// Encode an uploaded photo as a self-contained `data:` URL.
/// The format is sniffed from the bytes; `declared` (the browser's
/// content type) is only logged when it disagrees.
/// Oversized images are downscaled to fit `max_dimension`.
pub fn encode_data_url(
    bytes: &[u8],
    declared: Option<&str>,
    limits: ImageLimits,
) -> Result<String, String> {
    if bytes.is_empty() {
        return Err("Uploaded photo is empty".to_string());
    }
    if bytes.len() > limits.max_bytes {
        return Err(format!(
            "Photo exceeds the {} MB upload limit",
            limits.max_bytes / (1024 * 1024)
        ));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| "Unrecognized image format".to_string())?;
    let mime = format.to_mime_type();
    if let Some(d) = declared {
        if !d.eq_ignore_ascii_case(mime) {
            log::debug!("Upload declared as {} but sniffed as {}", d, mime);
        }
    }

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| format!("Unreadable photo: {}", e))?;
    let (w, h) = img.dimensions();
    if w <= limits.max_dimension && h <= limits.max_dimension {
        return Ok(data_url(mime, bytes));
    }

    let resized = img.resize(limits.max_dimension, limits.max_dimension, FilterType::Lanczos3);
    let (out, out_format) = if format == ImageFormat::Png {
        (resized, ImageFormat::Png)
    } else {
        // JPEG has no alpha channel
        (DynamicImage::ImageRgb8(resized.to_rgb8()), ImageFormat::Jpeg)
    };

    let mut buf = Cursor::new(Vec::new());
    out.write_to(&mut buf, out_format).map_err(|e| e.to_string())?;
    Ok(data_url(out_format.to_mime_type(), buf.get_ref()))
}

/// Same as `encode_data_url`, run on the blocking pool.
pub async fn encode_data_url_async(
    bytes: Vec<u8>,
    declared: Option<String>,
    limits: ImageLimits,
) -> Result<String, String> {
    rocket::tokio::task::spawn_blocking(move || {
        encode_data_url(&bytes, declared.as_deref(), limits)
    })
    .await
    .map_err(|e| format!("Photo encoding did not finish: {}", e))?
}

/// Accepts either a `data:<mime>;base64,<payload>` URL or bare base64.
pub fn decode_base64_payload(raw: &str) -> Result<Vec<u8>, String> {
    let payload = match raw.trim().strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((meta, data)) if meta.ends_with(";base64") => data,
            _ => return Err("Only base64 data URLs are supported".to_string()),
        },
        None => raw.trim(),
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| format!("Invalid base64 photo: {}", e))
}

fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}
