use crate::common::errors::TrackingResult;
use axum::extract::Multipart;
use std::collections::HashMap;

/// Fields of a `multipart/form-data` request, buffered in memory
#[derive(Debug, Default)]
pub struct UploadForm {
    fields: HashMap<String, Vec<u8>>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> TrackingResult<Self> {
        let mut fields = HashMap::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| crate::input_shape_error!("multipart", e))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| crate::input_shape_error!(name, e))?;
            fields.insert(name, bytes.to_vec());
        }
        Ok(Self { fields })
    }

    /// Trimmed text value; blank fields read as missing
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn require_text(&self, name: &str) -> TrackingResult<String> {
        self.text(name)
            .ok_or_else(|| crate::input_shape_error!(name, "field is required"))
    }

    pub fn require_file(&self, name: &str) -> TrackingResult<&[u8]> {
        self.fields
            .get(name)
            .map(Vec::as_slice)
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| crate::input_shape_error!(name, "no file uploaded"))
    }
}
