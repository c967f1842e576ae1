//! Prescription documents.
//!
//! A prescription is scoped to one patient and, as issued from the
//! attendance screen, to a single exam or medicine line.

use serde::Serialize;
use tera::{Context, Tera};
use tracing::debug;

use emed_core::models::medical_record::{Exam, Medicine};

use crate::docx::generate_docx;
use crate::error::ExportError;
use crate::file::{DOCX_CONTENT_TYPE, ExportedFile};
use crate::styles::DocumentStyles;

const TEMPLATE_NAME: &str = "prescription.md";

const TEMPLATE: &str = r#"# Prescription

**Patient:** {{ patient_name }}
**Date:** {{ issued_on }}
{% if exams %}
## Exams
{% for exam in exams %}- **{{ exam.name }}**{% if exam.description %}: {{ exam.description }}{% endif %}
{% endfor %}{% endif %}{% if medicines %}
## Medicines
{% for medicine in medicines %}- **{{ medicine.name }}**{% if medicine.concentration %} {{ medicine.concentration }}{% endif %}{% if medicine.usage %}: {{ medicine.usage }}{% endif %}{% if medicine.producer %} ({{ medicine.producer }}){% endif %}
{% endfor %}{% endif %}{% if professional_name %}

>> {{ professional_name }}
{% endif %}"#;

#[derive(Debug, Clone, Serialize)]
pub struct Prescription {
    pub patient_name: String,
    pub issued_on: jiff::civil::Date,
    pub exams: Vec<Exam>,
    pub medicines: Vec<Medicine>,
    pub professional_name: Option<String>,
}

impl Prescription {
    pub fn for_exam(patient_name: &str, exam: Exam, issued_on: jiff::civil::Date) -> Self {
        Self {
            patient_name: patient_name.to_string(),
            issued_on,
            exams: vec![exam],
            medicines: Vec::new(),
            professional_name: None,
        }
    }

    pub fn for_medicine(
        patient_name: &str,
        medicine: Medicine,
        issued_on: jiff::civil::Date,
    ) -> Self {
        Self {
            patient_name: patient_name.to_string(),
            issued_on,
            exams: Vec::new(),
            medicines: vec![medicine],
            professional_name: None,
        }
    }

    pub fn signed_by(mut self, professional_name: impl Into<String>) -> Self {
        self.professional_name = Some(professional_name.into());
        self
    }

    /// `prescription_<patient>_<date>.docx`, with the patient name reduced
    /// to ASCII alphanumerics and underscores.
    pub fn file_name(&self) -> String {
        let patient: String = self
            .patient_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        format!("prescription_{}_{}.docx", patient.trim_matches('_'), self.issued_on)
    }
}

/// The prescription as the intermediate markup `generate_docx` reads.
pub fn render_prescription(prescription: &Prescription) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let context = Context::from_serialize(prescription)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;
    Ok(tera.render(TEMPLATE_NAME, &context)?)
}

pub fn prescription_docx(
    prescription: &Prescription,
    styles: &DocumentStyles,
) -> Result<ExportedFile, ExportError> {
    let rendered = render_prescription(prescription)?;
    let bytes = generate_docx(&rendered, styles)?;
    debug!(
        exams = prescription.exams.len(),
        medicines = prescription.medicines.len(),
        size = bytes.len(),
        "prescription generated"
    );

    Ok(ExportedFile {
        file_name: prescription.file_name(),
        content_type: DOCX_CONTENT_TYPE,
        bytes,
    })
}
