//! Multipart form decoding

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::{AppError, AppResult};
use crate::services::uploads::UploadedImage;

/// Text fields and the (optional) image of a multipart form
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

/// Read every part of `multipart`; the part named `file_field` is the image
pub async fn read_form(mut multipart: Multipart, file_field: &str) -> AppResult<FormData> {
    let mut form = FormData::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == file_field {
            let file_name = field.file_name().unwrap_or("upload.jpg").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::ValidationError(format!("Invalid upload: {}", e)))?;
            // Browsers send an empty part when no file was chosen
            if !bytes.is_empty() {
                form.image = Some(UploadedImage {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::validation(&name, format!("Invalid text field: {}", e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

impl FormData {
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    /// Field value, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// Field value, None when absent or blank
    pub fn optional_text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn number(&self, name: &str) -> AppResult<f64> {
        self.optional_number(name)?
            .ok_or_else(|| AppError::validation(name, format!("{} is required", name)))
    }

    /// Numeric field; blank counts as absent
    pub fn optional_number(&self, name: &str) -> AppResult<Option<f64>> {
        match self.optional_text(name) {
            None => Ok(None),
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| AppError::validation(name, format!("{} must be a number", name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_number() {
        let form = FormData::from_fields([("budget", " 15000 "), ("water_limit", ""), ("area", "x")]);
        assert_eq!(form.optional_number("budget").unwrap(), Some(15000.0));
        assert_eq!(form.optional_number("water_limit").unwrap(), None);
        assert_eq!(form.optional_number("missing").unwrap(), None);
        assert!(form.optional_number("area").is_err());
        assert!(form.number("water_limit").is_err());
    }

    #[test]
    fn test_text_defaults_to_empty() {
        let form = FormData::from_fields([("crop", "Rice")]);
        assert_eq!(form.text("crop"), "Rice");
        assert_eq!(form.text("soil_type"), "");
        assert_eq!(form.optional_text("crop").as_deref(), Some("Rice"));
    }
}
