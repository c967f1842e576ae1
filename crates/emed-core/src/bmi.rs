//! Body mass index.
//!
//! BMI is never persisted on its own; it is recomputed from weight (kg) and
//! height (m) every time either changes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bmi {
    /// kg/m², rounded to one decimal place.
    pub value: f64,
    pub category: BmiCategory,
}

/// WHO adult classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_value(value: f64) -> Self {
        if value < 18.5 {
            BmiCategory::Underweight
        } else if value < 25.0 {
            BmiCategory::Normal
        } else if value < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl Bmi {
    /// Fixed one-decimal rendering used in the read-only form field.
    pub fn display(&self) -> String {
        format!("{:.1}", self.value)
    }
}

/// `None` when either input is missing, non-finite, or not positive.
pub fn calculate(weight: Option<f64>, height: Option<f64>) -> Option<Bmi> {
    let (weight, height) = (weight?, height?);
    if !weight.is_finite() || !height.is_finite() || weight <= 0.0 || height <= 0.0 {
        return None;
    }

    let value = (weight / (height * height) * 10.0).round() / 10.0;
    // Classified on the shown value so label and number agree.
    Some(Bmi {
        value,
        category: BmiCategory::from_value(value),
    })
}
