use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use csv::Writer;
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::task::Task;

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const MARGIN_LEFT: Mm = Mm(15.0);
const MARGIN_RIGHT: Mm = Mm(195.0);
const TOP_Y: Mm = Mm(282.0);
const BOTTOM_Y: Mm = Mm(20.0);
const ROW_HEIGHT: Mm = Mm(7.0);
const COL_PRIORITY: Mm = Mm(115.0);
const COL_DUE: Mm = Mm(155.0);

/// One line of the summary tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRow {
    pub text: String,
    pub priority: String,
    pub due_date: String,
}

impl From<&Task> for SummaryRow {
    fn from(task: &Task) -> Self {
        SummaryRow {
            text: task.text.clone(),
            priority: task.priority.to_string(),
            due_date: task
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Completed and pending tasks as two tables, in store order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub completed: Vec<SummaryRow>,
    pub pending: Vec<SummaryRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Markdown,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Markdown => "md",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!(
                "unknown export format `{other}` (use pdf|markdown|csv|json)"
            )),
        }
    }
}

impl TaskSummary {
    /// Split tasks into completed and pending tables. There has to be
    /// something to summarize.
    pub fn build(tasks: &[Task]) -> Result<Self> {
        if tasks.is_empty() {
            bail!("Nothing to export: the task list is empty");
        }

        Ok(Self {
            completed: tasks
                .iter()
                .filter(|t| t.completed)
                .map(SummaryRow::from)
                .collect(),
            pending: tasks
                .iter()
                .filter(|t| !t.completed)
                .map(SummaryRow::from)
                .collect(),
        })
    }

    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    pub fn to_csv(&self) -> Result<String> {
        let mut wtr = Writer::from_writer(vec![]);

        Self::csv_table(&mut wtr, "Completed Tasks", &self.completed)?;
        wtr.write_record(["", "", ""])?;
        Self::csv_table(&mut wtr, "Pending Tasks", &self.pending)?;

        let data = wtr.into_inner()?;
        Ok(String::from_utf8(data)?)
    }

    fn csv_table(wtr: &mut Writer<Vec<u8>>, heading: &str, rows: &[SummaryRow]) -> Result<()> {
        wtr.write_record([heading, "", ""])?;
        wtr.write_record(["Task Name", "Priority", "Due Date"])?;
        for row in rows {
            wtr.write_record([
                row.text.as_str(),
                row.priority.as_str(),
                row.due_date.as_str(),
            ])?;
        }
        Ok(())
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# To-Do List Summary\n\n");
        output.push_str(&format!(
            "Generated: {}\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ));

        Self::markdown_table(&mut output, "Completed Tasks", &self.completed);
        Self::markdown_table(&mut output, "Pending Tasks", &self.pending);

        output
    }

    fn markdown_table(output: &mut String, heading: &str, rows: &[SummaryRow]) {
        output.push_str(&format!("\n## {} ({})\n\n", heading, rows.len()));
        output.push_str("| Task Name | Priority | Due Date |\n");
        output.push_str("| --- | --- | --- |\n");
        for row in rows {
            output.push_str(&format!(
                "| {} | {} | {} |\n",
                row.text, row.priority, row.due_date
            ));
        }
    }

    /// Render the summary as a paginated A4 document.
    pub fn to_pdf(&self) -> Result<Vec<u8>> {
        let (doc, page, layer) =
            PdfDocument::new("To-Do List Summary", PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("Failed to load PDF font: {e}"))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| anyhow!("Failed to load PDF font: {e}"))?;

        let mut layer = doc.get_page(page).get_layer(layer);
        let mut y = TOP_Y;

        layer.use_text("To-Do List Summary", 20.0, MARGIN_LEFT, y, &bold);
        y = y - Mm(14.0);

        y = Self::pdf_table(&doc, &mut layer, y, "Completed Tasks:", &self.completed, &font, &bold);
        y = y - Mm(6.0);
        Self::pdf_table(&doc, &mut layer, y, "Pending Tasks:", &self.pending, &font, &bold);

        doc.save_to_bytes()
            .map_err(|e| anyhow!("Failed to render PDF: {e}"))
    }

    fn pdf_table(
        doc: &PdfDocumentReference,
        layer: &mut PdfLayerReference,
        mut y: Mm,
        heading: &str,
        rows: &[SummaryRow],
        font: &IndirectFontRef,
        bold: &IndirectFontRef,
    ) -> Mm {
        // A heading needs room for itself, the header row and one data row
        y = Self::page_break(doc, layer, y, Mm(28.0));

        layer.use_text(heading, 12.0, MARGIN_LEFT, y, bold);
        y = y - Mm(8.0);

        layer.use_text("Task Name", 10.0, MARGIN_LEFT, y, bold);
        layer.use_text("Priority", 10.0, COL_PRIORITY, y, bold);
        layer.use_text("Due Date", 10.0, COL_DUE, y, bold);
        Self::rule(layer, y - Mm(2.0));
        y = y - ROW_HEIGHT;

        if rows.is_empty() {
            layer.use_text("(none)", 10.0, MARGIN_LEFT, y, font);
            return y - ROW_HEIGHT;
        }

        for row in rows {
            y = Self::page_break(doc, layer, y, BOTTOM_Y);
            layer.use_text(clip(&row.text, 60), 10.0, MARGIN_LEFT, y, font);
            layer.use_text(row.priority.as_str(), 10.0, COL_PRIORITY, y, font);
            layer.use_text(row.due_date.as_str(), 10.0, COL_DUE, y, font);
            y = y - ROW_HEIGHT;
        }

        y
    }

    fn page_break(
        doc: &PdfDocumentReference,
        layer: &mut PdfLayerReference,
        y: Mm,
        floor: Mm,
    ) -> Mm {
        if y >= floor {
            return y;
        }
        let (page, new_layer) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
        *layer = doc.get_page(page).get_layer(new_layer);
        TOP_Y
    }

    fn rule(layer: &PdfLayerReference, y: Mm) {
        layer.set_outline_thickness(0.4);
        layer.add_line(Line {
            points: vec![
                (Point::new(MARGIN_LEFT, y), false),
                (Point::new(MARGIN_RIGHT, y), false),
            ],
            is_closed: false,
        });
    }

    pub fn write_to_file(&self, format: ExportFormat, path: &Path) -> Result<()> {
        match format {
            ExportFormat::Pdf => fs::write(path, self.to_pdf()?),
            ExportFormat::Markdown => fs::write(path, self.to_markdown()),
            ExportFormat::Csv => fs::write(path, self.to_csv()?),
            ExportFormat::Json => fs::write(path, self.to_json()?),
        }
        .with_context(|| format!("Failed to write export {}", path.display()))?;

        info!(
            path = %path.display(),
            completed = self.completed.len(),
            pending = self.pending.len(),
            "Exported task summary"
        );
        Ok(())
    }
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max).collect();
        format!("{prefix}...")
    }
}
