//! 60×40 mm food labels
//!
//! Two variants share the header and the date lines: a single ingredient,
//! or a preparation with its ingredient and allergen list.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::documents::error::LabelError;
use crate::documents::layout::{
    line_height_mm, sanitize_filename_part, wrap_text, PdfBuilder, RenderedDocument, Rgb8, Weight,
};

pub const LABEL_WIDTH_MM: f32 = 60.0;
pub const LABEL_HEIGHT_MM: f32 = 40.0;

/// Days from preparation to the suggested expiry
pub const DEFAULT_SHELF_LIFE_DAYS: i64 = 3;

const MARGIN_MM: f32 = 5.0;
const PRINTABLE_WIDTH_MM: f32 = LABEL_WIDTH_MM - 2.0 * MARGIN_MM;
const INGREDIENTS_FONT_PT: f32 = 6.0;
const MAX_INGREDIENT_LINES: usize = 3;

/// What the label identifies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LabelContent {
    Ingredient { name: String },
    Preparation { name: String, ingredients: String },
}

impl LabelContent {
    pub fn name(&self) -> &str {
        match self {
            LabelContent::Ingredient { name } | LabelContent::Preparation { name, .. } => name,
        }
    }

    fn caption(&self) -> &'static str {
        match self {
            LabelContent::Ingredient { .. } => "Ingrediente:",
            LabelContent::Preparation { .. } => "Preparazione:",
        }
    }
}

/// Label form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    #[serde(flatten)]
    pub content: LabelContent,
    pub prep_date: NaiveDate,
    /// Defaults to the preparation date plus three days
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
}

impl LabelSpec {
    pub fn ingredient(name: impl Into<String>, prep_date: NaiveDate) -> Self {
        Self {
            content: LabelContent::Ingredient { name: name.into() },
            prep_date,
            expiry_date: None,
        }
    }

    pub fn preparation(
        name: impl Into<String>,
        ingredients: impl Into<String>,
        prep_date: NaiveDate,
    ) -> Self {
        Self {
            content: LabelContent::Preparation {
                name: name.into(),
                ingredients: ingredients.into(),
            },
            prep_date,
            expiry_date: None,
        }
    }

    pub fn with_expiry(mut self, expiry_date: NaiveDate) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    pub fn expiry(&self) -> NaiveDate {
        self.expiry_date
            .unwrap_or(self.prep_date + Duration::days(DEFAULT_SHELF_LIFE_DAYS))
    }

    /// `etichetta_<name>.pdf`, or `etichetta.pdf` when nothing of the name
    /// survives sanitizing
    pub fn filename(&self) -> String {
        let part = sanitize_filename_part(self.content.name());
        if part.is_empty() {
            "etichetta.pdf".to_string()
        } else {
            format!("etichetta_{}.pdf", part)
        }
    }

    /// Ingredient lines as printed (preparations only)
    pub fn ingredient_lines(&self) -> Vec<String> {
        match &self.content {
            LabelContent::Preparation { ingredients, .. } => wrap_text(
                ingredients,
                INGREDIENTS_FONT_PT,
                PRINTABLE_WIDTH_MM,
                MAX_INGREDIENT_LINES,
            ),
            LabelContent::Ingredient { .. } => Vec::new(),
        }
    }

    pub fn render(&self) -> Result<RenderedDocument, LabelError> {
        let name = self.content.name().trim();
        if name.is_empty() {
            return Err(LabelError::BlankName);
        }

        let builder = PdfBuilder::new("Etichetta HACCP", LABEL_WIDTH_MM, LABEL_HEIGHT_MM)?;
        let page = builder.canvas();

        page.centered_text("ChefAiuto HACCP", 12.0, LABEL_WIDTH_MM / 2.0, 8.0, Weight::Bold);
        page.rule((MARGIN_MM, 10.0), (LABEL_WIDTH_MM - MARGIN_MM, 10.0), 0.3);
        page.text(self.content.caption(), 10.0, MARGIN_MM, 15.5, Weight::Bold);

        let dates_y = match &self.content {
            LabelContent::Ingredient { .. } => {
                let name = first_line(name, 14.0);
                page.text(&name, 14.0, MARGIN_MM, 22.5, Weight::Regular);
                32.0
            }
            LabelContent::Preparation { .. } => {
                let name = first_line(name, 11.0);
                page.text(&name, 11.0, MARGIN_MM, 20.5, Weight::Regular);

                let step = line_height_mm(INGREDIENTS_FONT_PT);
                for (i, line) in self.ingredient_lines().iter().enumerate() {
                    let y = 24.0 + i as f32 * step;
                    page.text(line, INGREDIENTS_FONT_PT, MARGIN_MM, y, Weight::Regular);
                }
                35.5
            }
        };

        page.text("Prep:", 8.0, MARGIN_MM, dates_y, Weight::Bold);
        page.text(&format_date(self.prep_date), 8.0, 15.0, dates_y, Weight::Regular);
        page.text("Scad:", 8.0, 32.0, dates_y, Weight::Bold);
        page.set_color(Rgb8::RED);
        page.text(&format_date(self.expiry()), 10.0, 42.0, dates_y, Weight::Bold);
        page.set_color(Rgb8::BLACK);

        let filename = self.filename();
        let document = builder.finish(filename)?;
        tracing::info!(filename = %document.filename, bytes = document.bytes.len(), "Label rendered");
        Ok(document)
    }
}

fn first_line(text: &str, size_pt: f32) -> String {
    wrap_text(text, size_pt, PRINTABLE_WIDTH_MM, 1)
        .into_iter()
        .next()
        .unwrap_or_default()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prep() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_default_expiry() {
        let label = LabelSpec::ingredient("Pomodoro", prep());
        assert_eq!(label.expiry(), NaiveDate::from_ymd_opt(2026, 10, 22).unwrap());

        let label = label.with_expiry(NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
        assert_eq!(label.expiry(), NaiveDate::from_ymd_opt(2026, 10, 25).unwrap());
    }

    #[test]
    fn test_filename() {
        assert_eq!(
            LabelSpec::ingredient("Pomodoro San Marzano", prep()).filename(),
            "etichetta_Pomodoro_San_Marzano.pdf"
        );
        assert_eq!(LabelSpec::ingredient("ùù", prep()).filename(), "etichetta.pdf");
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let result = LabelSpec::ingredient("   ", prep()).render();
        assert!(matches!(result, Err(LabelError::BlankName)));
    }

    #[test]
    fn test_ingredient_label_renders() {
        let doc = LabelSpec::ingredient("Pomodoro San Marzano", prep())
            .render()
            .unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert_eq!(doc.filename, "etichetta_Pomodoro_San_Marzano.pdf");
    }

    #[test]
    fn test_preparation_ingredients_are_capped() {
        let ingredients = "farina, uova, latte (LATTE), burro, nocciole (FRUTTA A GUSCIO), ".repeat(10);
        let label = LabelSpec::preparation("Torta della nonna", ingredients, prep());

        let lines = label.ingredient_lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with("..."));

        let doc = label.render().unwrap();
        assert!(doc.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_short_ingredient_list_is_not_ellipsized() {
        let label = LabelSpec::preparation("Pesto", "basilico, pinoli, parmigiano (LATTE)", prep());
        assert_eq!(label.ingredient_lines(), vec!["basilico, pinoli, parmigiano (LATTE)"]);
    }

    #[test]
    fn test_form_deserializes() {
        let json = r#"{"kind":"preparation","name":"Ragù","ingredients":"carne, sedano","prep_date":"2026-10-19"}"#;
        let label: LabelSpec = serde_json::from_str(json).unwrap();
        assert_eq!(label.content.name(), "Ragù");
        assert_eq!(label.expiry_date, None);
    }
}
