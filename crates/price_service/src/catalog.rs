//! Form metadata for the prediction page
//!
//! Labels and numeric input bounds for the known listing fields. Options
//! for categorical fields always come from the fitted encoders; numeric
//! fields without a catalog entry fall back to the range seen in training.

use housepk_core::features::ColumnKind;
use housepk_core::FeatureLayout;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Display hints for one listing field
#[derive(Debug, Clone, Copy)]
struct FieldInfo {
    label: &'static str,
    bounds: Option<(f64, f64, f64)>,
}

const fn choice(label: &'static str) -> FieldInfo {
    FieldInfo {
        label,
        bounds: None,
    }
}

const fn number(label: &'static str, min: f64, max: f64, default: f64) -> FieldInfo {
    FieldInfo {
        label,
        bounds: Some((min, max, default)),
    }
}

static FIELD_INFO: Lazy<HashMap<&'static str, FieldInfo>> = Lazy::new(|| {
    HashMap::from([
        ("property_type", choice("Property Type")),
        ("city", choice("City")),
        ("province_name", choice("Province")),
        ("latitude", number("Latitude", 24.0, 37.0, 33.6844)),
        ("longitude", number("Longitude", 60.0, 78.0, 73.0479)),
        ("baths", number("Number of Bathrooms", 1.0, 10.0, 2.0)),
        ("bedrooms", number("Number of Bedrooms", 1.0, 10.0, 3.0)),
        ("Area Type", choice("Area Type")),
        ("Area Size", number("Area Size", 0.5, 100.0, 5.0)),
        ("Area Category", choice("Area Category")),
    ])
});

/// How a field is rendered in the form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormInput {
    Select { options: Vec<String> },
    Number { min: f64, max: f64, default: f64 },
}

/// One input of the prediction form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub input: FormInput,
}

/// Form fields in model input order
pub fn form_fields(layout: &FeatureLayout) -> Vec<FormField> {
    layout
        .columns()
        .iter()
        .map(|column| {
            let info = FIELD_INFO.get(column.name.as_str());
            let label = info.map_or_else(|| column.name.clone(), |i| i.label.to_string());

            let input = match &column.kind {
                ColumnKind::Categorical(encoder) => FormInput::Select {
                    options: encoder.classes().to_vec(),
                },
                ColumnKind::Numeric(range) => match info.and_then(|i| i.bounds) {
                    Some((min, max, default)) => FormInput::Number { min, max, default },
                    None => FormInput::Number {
                        min: range.min,
                        max: range.max,
                        default: range.min,
                    },
                },
            };

            FormField {
                name: column.name.clone(),
                label,
                input,
            }
        })
        .collect()
}
