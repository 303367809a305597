use crate::utils::error::{Result, SummaryError};
use encoding_rs::Encoding;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SummaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SummaryError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SummaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// http(s) 網址，或相對於 base 的網址
pub fn validate_url_or_relative(field_name: &str, url_str: &str, base: Option<&str>) -> Result<()> {
    match base.and_then(|b| Url::parse(b).ok()) {
        Some(base_url) if Url::parse(url_str).is_err() => {
            let joined = base_url
                .join(url_str)
                .map_err(|e| SummaryError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: url_str.to_string(),
                    reason: format!("Cannot resolve against {}: {}", base_url, e),
                })?;
            validate_url(field_name, joined.as_str())
        }
        _ => validate_url(field_name, url_str),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SummaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SummaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_path(field_name, name)?;
    if name.contains('/') || name.contains('\\') {
        return Err(SummaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name must not contain path separators".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SummaryError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// 頁面需以同一編碼寫回，所以只接受能編碼輸出的編碼
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
        SummaryError::UnknownEncodingError {
            label: label.to_string(),
        }
    })?;

    if encoding.output_encoding() != encoding {
        return Err(SummaryError::InvalidConfigValueError {
            field: "source.encoding".to_string(),
            value: label.to_string(),
            reason: format!(
                "{} cannot be written back; output would be {}",
                encoding.name(),
                encoding.output_encoding().name()
            ),
        });
    }

    Ok(encoding)
}
