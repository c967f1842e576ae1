use serde::{Deserialize, Serialize};

/// Document styling for generated prescriptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Font for body text.
    pub body_font: String,

    /// Font for headings.
    pub heading_font: String,

    /// Body text size in points.
    pub body_size: usize,

    /// Heading 1 size in points.
    pub heading1_size: usize,

    /// Heading 2 size in points.
    pub heading2_size: usize,

    /// Heading 3 size in points.
    pub heading3_size: usize,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            body_font: "Calibri".to_string(),
            heading_font: "Arial".to_string(),
            body_size: 11,
            heading1_size: 18,
            heading2_size: 14,
            heading3_size: 12,
        }
    }
}
