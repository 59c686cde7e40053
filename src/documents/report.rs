//! Monthly HACCP report
//!
//! Selects the logs of the calendar month containing "now", then renders
//! an A4 register: company header, a striped table of readings and a
//! signatures section with one embedded signature per entry.

use chrono::{DateTime, Datelike, Duration, Locale, LocalResult, TimeZone, Utc};
use serde::Serialize;

use crate::documents::error::{DocumentResult, ReportError};
use crate::documents::layout::{
    line_height_mm, sanitize_filename_part, PdfBuilder, RenderedDocument, Rgb8, Weight,
};
use crate::storage::{DailyLog, Settings, SignatureImage};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 14.0;
const BOTTOM_LIMIT_MM: f32 = PAGE_HEIGHT_MM - 15.0;

const TABLE_FONT_PT: f32 = 9.0;
const CELL_PADDING_MM: f32 = 2.5;
const DATE_COLUMN_MM: f32 = 45.0;
const HEADER_FILL: Rgb8 = Rgb8(30, 41, 59);
const STRIPE_FILL: Rgb8 = Rgb8(245, 245, 245);

/// Inclusive bounds of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
    pub start: DateTime<Utc>,
    /// Last millisecond of the month
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    /// The month containing `now`, in `now`'s time zone
    pub fn containing<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let (year, month) = (now.year(), now.month());
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };

        let start = month_start(&tz, year, month);
        let end = month_start(&tz, next_year, next_month) - Duration::milliseconds(1);

        Self {
            year,
            month,
            start,
            end,
        }
    }

    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }

    /// Italian month and year, e.g. `ottobre 2026`
    pub fn label(&self) -> String {
        Utc.with_ymd_and_hms(self.year, self.month, 1, 12, 0, 0)
            .single()
            .map(|d| d.format_localized("%B %Y", Locale::it_IT).to_string())
            .unwrap_or_else(|| format!("{:02}/{}", self.month, self.year))
    }
}

/// Local midnight of the first of the month, as UTC
fn month_start<Tz: TimeZone>(tz: &Tz, year: i32, month: u32) -> DateTime<Utc> {
    match tz.with_ymd_and_hms(year, month, 1, 0, 0, 0) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Midnight skipped by a DST change: the first hour that exists
        LocalResult::None => tz
            .with_ymd_and_hms(year, month, 1, 1, 0, 0)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| {
                Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
                    .single()
                    .unwrap_or_default()
            }),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyHeader {
    pub name: String,
    pub address: String,
    pub vat: String,
}

impl CompanyHeader {
    fn from_settings(settings: &Settings) -> Self {
        Self {
            name: settings.company_name.trim().to_string(),
            address: settings.company_address.trim().to_string(),
            vat: settings.company_vat.trim().to_string(),
        }
    }

    /// Italian names of the blank identity fields
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("ragione sociale");
        }
        if self.address.is_empty() {
            missing.push("indirizzo");
        }
        if self.vat.is_empty() {
            missing.push("partita IVA");
        }
        missing
    }
}

/// One table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// `dd/mm/yyyy HH:MM`
    pub taken_at: String,
    /// `name: value°C`, one per line
    pub readings: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignatureEntry {
    /// `dd/mm/yyyy`
    pub date: String,
    pub signature: SignatureImage,
}

/// Report content for one month, in chronological order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub window: MonthWindow,
    pub month_label: String,
    pub company: CompanyHeader,
    pub identity_complete: bool,
    pub rows: Vec<ReportRow>,
    pub signatures: Vec<SignatureEntry>,
}

impl MonthlyReport {
    /// Collect the logs of the month containing `now`.
    ///
    /// Fails with `NoEntries` when nothing was logged that month.
    pub fn build<Tz>(
        logs: &[DailyLog],
        settings: &Settings,
        now: &DateTime<Tz>,
    ) -> Result<Self, ReportError>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let window = MonthWindow::containing(now);
        let month_label = window.label();
        let tz = now.timezone();

        let mut selected: Vec<&DailyLog> = logs.iter().filter(|log| window.contains(&log.date)).collect();
        if selected.is_empty() {
            return Err(ReportError::NoEntries { month: month_label });
        }
        selected.sort_by_key(|log| log.timestamp);

        let rows = selected
            .iter()
            .map(|log| ReportRow {
                taken_at: log.date.with_timezone(&tz).format("%d/%m/%Y %H:%M").to_string(),
                readings: log
                    .readings
                    .iter()
                    .map(|r| r.label())
                    .collect::<Vec<_>>()
                    .join("\n"),
            })
            .collect();

        let signatures = selected
            .iter()
            .map(|log| SignatureEntry {
                date: log.date.with_timezone(&tz).format("%d/%m/%Y").to_string(),
                signature: log.signature.clone(),
            })
            .collect();

        Ok(Self {
            window,
            month_label,
            company: CompanyHeader::from_settings(settings),
            identity_complete: settings.identity_complete(),
            rows,
            signatures,
        })
    }

    /// `Report_HACCP_<mese>_<anno>.pdf`
    pub fn filename(&self) -> String {
        format!("Report_HACCP_{}.pdf", sanitize_filename_part(&self.month_label))
    }

    /// Messages to show the user before export
    pub fn notices(&self) -> Vec<String> {
        if self.identity_complete {
            return Vec::new();
        }
        vec![format!(
            "Company details are incomplete (missing: {}); the report will show a warning",
            self.company.missing_fields().join(", ")
        )]
    }

    pub fn render(&self) -> DocumentResult<RenderedDocument> {
        let mut builder = PdfBuilder::new("Registro HACCP Temperature", PAGE_WIDTH_MM, PAGE_HEIGHT_MM)?;
        let center = PAGE_WIDTH_MM / 2.0;

        let page = builder.canvas();
        page.centered_text("Registro HACCP Temperature", 22.0, center, 20.0, Weight::Bold);
        page.centered_text(
            &format!("Report Mensile: {}", self.month_label),
            14.0,
            center,
            30.0,
            Weight::Regular,
        );

        let mut y = 40.0;
        for line in self.company_lines() {
            page.text(&line, 10.0, MARGIN_MM, y, Weight::Regular);
            y += 5.0;
        }
        if !self.identity_complete {
            page.set_color(Rgb8::RED);
            page.text(
                &format!(
                    "Attenzione: dati aziendali incompleti (mancano: {})",
                    self.company.missing_fields().join(", ")
                ),
                9.0,
                MARGIN_MM,
                y,
                Weight::Bold,
            );
            page.set_color(Rgb8::BLACK);
            y += 5.0;
        }

        y = self.draw_table(&mut builder, y + 3.0);
        tracing::debug!(rows = self.rows.len(), table_end = y, "Report table drawn");

        self.draw_signatures(&mut builder);

        let document = builder.finish(self.filename())?;
        tracing::info!(
            filename = %document.filename,
            entries = self.rows.len(),
            bytes = document.bytes.len(),
            "Monthly report rendered"
        );
        Ok(document)
    }

    fn company_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.company.name.is_empty() {
            lines.push(self.company.name.clone());
        }
        if !self.company.address.is_empty() {
            lines.push(self.company.address.clone());
        }
        if !self.company.vat.is_empty() {
            lines.push(format!("P.IVA: {}", self.company.vat));
        }
        lines
    }

    /// Draw the readings table from `y`, breaking pages as needed.
    /// Returns the y position below the last row.
    fn draw_table(&self, builder: &mut PdfBuilder, mut y: f32) -> f32 {
        let line_height = line_height_mm(TABLE_FONT_PT);
        let header_height = line_height + 2.0 * CELL_PADDING_MM;

        y = draw_table_header(builder, y, header_height);

        for (index, row) in self.rows.iter().enumerate() {
            let lines: Vec<&str> = row.readings.lines().collect();
            let height = lines.len().max(1) as f32 * line_height + 2.0 * CELL_PADDING_MM;

            if y + height > BOTTOM_LIMIT_MM {
                builder.add_page();
                y = draw_table_header(builder, 20.0, header_height);
            }

            let page = builder.canvas();
            if index % 2 == 1 {
                page.fill_rect(MARGIN_MM, y, table_width(), height, STRIPE_FILL);
            }
            page.set_color(Rgb8::BLACK);

            let baseline = y + CELL_PADDING_MM + line_height * 0.8;
            page.text(&row.taken_at, TABLE_FONT_PT, MARGIN_MM + CELL_PADDING_MM, baseline, Weight::Regular);
            for (i, line) in lines.iter().enumerate() {
                page.text(
                    line,
                    TABLE_FONT_PT,
                    MARGIN_MM + DATE_COLUMN_MM + CELL_PADDING_MM,
                    baseline + i as f32 * line_height,
                    Weight::Regular,
                );
            }
            y += height;
        }
        y
    }

    fn draw_signatures(&self, builder: &mut PdfBuilder) {
        builder.add_page();
        builder
            .canvas()
            .centered_text("Firme Responsabili", 16.0, PAGE_WIDTH_MM / 2.0, 20.0, Weight::Bold);

        let mut y = 35.0;
        for entry in &self.signatures {
            if y > 250.0 {
                builder.add_page();
                y = 20.0;
            }

            let page = builder.canvas();
            page.text(&format!("Data: {}", entry.date), 10.0, 20.0, y, Weight::Regular);
            if let Err(e) = page.signature(&entry.signature, 120.0, y - 5.0, 40.0, 20.0) {
                tracing::warn!(date = %entry.date, error = %e, "Signature could not be embedded");
                page.text("[firma non leggibile]", 9.0, 120.0, y, Weight::Regular);
            }
            page.rule((20.0, y + 16.0), (190.0, y + 16.0), 0.2);
            y += 25.0;
        }
    }
}

fn table_width() -> f32 {
    PAGE_WIDTH_MM - 2.0 * MARGIN_MM
}

fn draw_table_header(builder: &PdfBuilder, y: f32, height: f32) -> f32 {
    let page = builder.canvas();
    let baseline = y + CELL_PADDING_MM + line_height_mm(TABLE_FONT_PT) * 0.8;

    page.fill_rect(MARGIN_MM, y, table_width(), height, HEADER_FILL);
    page.set_color(Rgb8::WHITE);
    page.text("Data e Ora", TABLE_FONT_PT, MARGIN_MM + CELL_PADDING_MM, baseline, Weight::Bold);
    page.text(
        "Letture",
        TABLE_FONT_PT,
        MARGIN_MM + DATE_COLUMN_MM + CELL_PADDING_MM,
        baseline,
        Weight::Bold,
    );
    page.set_color(Rgb8::BLACK);
    y + height
}
