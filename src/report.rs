use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use eframe::egui::Color32;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rect, Rgb,
};
use printpdf::path::PaintMode;

use crate::color::category_colors;
use crate::config::Theme;
use crate::data::charts::Histogram;
use crate::data::snapshot::{DashboardState, Kpi, FLOWRATE_COLUMN, PRESSURE_COLUMN, TEMPERATURE_COLUMN};

// A4 landscape, millimetres, origin bottom-left.
const PAGE_W: f32 = 297.0;
const PAGE_H: f32 = 210.0;
const MARGIN: f32 = 12.0;
const GAP: f32 = 6.0;

const CARD_TOP: f32 = 178.0;
const CARD_H: f32 = 28.0;
const CHART_TOP: f32 = 140.0;
const CHART_BOTTOM: f32 = 18.0;

// ---------------------------------------------------------------------------
// Report – one-page PDF of the dashboard
// ---------------------------------------------------------------------------

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Axis-aligned box on the page.
#[derive(Debug, Clone, Copy)]
struct Area {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl Area {
    fn right(&self) -> f32 {
        self.x + self.w
    }

    fn top(&self) -> f32 {
        self.y + self.h
    }
}

/// Render the KPI cards and the three charts onto a single page.
pub fn render_pdf(snapshot: &DashboardState, theme: &Theme, bins: usize) -> Result<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new("Chemical Equipment Dashboard", Mm(PAGE_W), Mm(PAGE_H), "Dashboard");
    let fonts = load_fonts(&doc)?;
    let layer = doc.get_page(page).get_layer(layer);

    fill(&layer, theme.bg, Area { x: 0.0, y: 0.0, w: PAGE_W, h: PAGE_H });
    text(&layer, theme.header, "Chemical Equipment Dashboard", 18.0, MARGIN, 194.0, &fonts.bold);
    text(
        &layer,
        theme.axis_text,
        "Overview of Type mix, Flowrate distribution, and Pressure-Temperature relationships.",
        10.0,
        MARGIN,
        186.0,
        &fonts.regular,
    );

    kpi_cards(&layer, &fonts, theme, snapshot);

    let w = (PAGE_W - 2.0 * MARGIN - 2.0 * GAP) / 3.0;
    let panel = |i: usize| Area {
        x: MARGIN + i as f32 * (w + GAP),
        y: CHART_BOTTOM,
        w,
        h: CHART_TOP - CHART_BOTTOM,
    };
    type_mix(&layer, &fonts, theme, snapshot, panel(0));
    flowrate_distribution(&layer, &fonts, theme, snapshot, bins, panel(1));
    pressure_vs_temperature(&layer, &fonts, theme, snapshot, panel(2));

    doc.save_to_bytes().map_err(|e| anyhow!("encoding PDF: {e}"))
}

/// Render and write the report to `path`.
pub fn write_pdf(snapshot: &DashboardState, theme: &Theme, bins: usize, path: &Path) -> Result<()> {
    let bytes = render_pdf(snapshot, theme, bins)?;
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).context("writing PDF")?;
    writer.flush().context("flushing PDF")?;
    log::info!("Exported dashboard report to {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

fn load_fonts(doc: &PdfDocumentReference) -> Result<Fonts> {
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("loading Helvetica: {e}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("loading Helvetica-Bold: {e}"))?;
    Ok(Fonts { regular, bold })
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

fn kpi_cards(layer: &PdfLayerReference, fonts: &Fonts, theme: &Theme, snapshot: &DashboardState) {
    let w = (PAGE_W - 2.0 * MARGIN - 3.0 * GAP) / 4.0;
    for (i, kpi) in Kpi::cards(Some(snapshot)).iter().enumerate() {
        let card = Area {
            x: MARGIN + i as f32 * (w + GAP),
            y: CARD_TOP - CARD_H,
            w,
            h: CARD_H,
        };
        fill(layer, theme.kpi_fills[i], card);
        let x = card.x + 4.0;
        text(layer, theme.text, kpi.title, 9.0, x, card.top() - 7.0, &fonts.bold);
        text(layer, theme.text, &kpi.value, 16.0, x, card.top() - 17.0, &fonts.bold);
        text(layer, theme.text, &kpi.hint, 8.0, x, card.top() - 24.0, &fonts.regular);
    }
}

fn type_mix(layer: &PdfLayerReference, fonts: &Fonts, theme: &Theme, s: &DashboardState, panel: Area) {
    let plot = chart_frame(layer, fonts, theme, "Equipment Type Mix", panel);
    let Some(max) = s.type_counts.iter().map(|(_, n)| n).max() else {
        no_data(layer, fonts, theme, plot);
        return;
    };

    let slot = plot.w / s.type_counts.len() as f32;
    let bars = s.type_counts.iter().zip(category_colors(&s.type_counts, theme.border));
    for (i, ((label, n), (_, color))) in bars.enumerate() {
        let h = plot.h * n as f32 / max as f32;
        let x = plot.x + i as f32 * slot + slot * 0.15;
        fill(layer, color, Area { x, y: plot.y, w: slot * 0.7, h });
        text(layer, theme.text, &n.to_string(), 7.0, x, plot.y + h + 1.5, &fonts.regular);
        text(layer, theme.axis_text, &clip(label, 10), 6.0, x, plot.y - 4.0, &fonts.regular);
    }
    text(layer, theme.axis_text, &format!("max {max}"), 6.0, plot.x, plot.top() + 1.5, &fonts.regular);
}

fn flowrate_distribution(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    theme: &Theme,
    s: &DashboardState,
    bins: usize,
    panel: Area,
) {
    let plot = chart_frame(layer, fonts, theme, "Flowrate Distribution", panel);
    let Some(hist) = Histogram::from_values(&s.flowrate_series, bins) else {
        no_data(layer, fonts, theme, plot);
        return;
    };

    let max = hist.counts.iter().copied().max().unwrap_or(0).max(1);
    let slot = plot.w / hist.counts.len() as f32;
    for (i, &n) in hist.counts.iter().enumerate() {
        let h = plot.h * n as f32 / max as f32;
        fill(
            layer,
            theme.kpi_fills[1],
            Area { x: plot.x + i as f32 * slot, y: plot.y, w: slot, h },
        );
    }
    axis_range(layer, fonts, theme, plot, hist.edges[0], hist.edges[hist.counts.len()]);
    text(layer, theme.axis_text, FLOWRATE_COLUMN, 7.0, plot.x + plot.w / 2.0 - 6.0, plot.y - 9.0, &fonts.regular);
    text(layer, theme.axis_text, &format!("max {max}"), 6.0, plot.x, plot.top() + 1.5, &fonts.regular);
}

fn pressure_vs_temperature(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    theme: &Theme,
    s: &DashboardState,
    panel: Area,
) {
    let plot = chart_frame(layer, fonts, theme, "Pressure vs Temperature", panel);
    let series = &s.pressure_temperature;
    if series.is_empty() {
        no_data(layer, fonts, theme, plot);
        return;
    }

    let (x_lo, x_hi) = span(&series.x);
    let (y_lo, y_hi) = span(&series.y);
    let dot = 1.4;
    for [px, py] in series.points() {
        let x = plot.x + ((px - x_lo) / (x_hi - x_lo)) as f32 * (plot.w - dot);
        let y = plot.y + ((py - y_lo) / (y_hi - y_lo)) as f32 * (plot.h - dot);
        fill(layer, theme.kpi_fills[2], Area { x, y, w: dot, h: dot });
    }
    axis_range(layer, fonts, theme, plot, x_lo, x_hi);
    text(layer, theme.axis_text, PRESSURE_COLUMN, 7.0, plot.x + plot.w / 2.0 - 6.0, plot.y - 9.0, &fonts.regular);
    let y_caption = format!("{TEMPERATURE_COLUMN} {y_lo:.1} to {y_hi:.1}");
    text(layer, theme.axis_text, &y_caption, 6.0, plot.x, plot.top() + 1.5, &fonts.regular);
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Panel background, title and axes. Returns the plotting area.
fn chart_frame(layer: &PdfLayerReference, fonts: &Fonts, theme: &Theme, title: &str, panel: Area) -> Area {
    fill(layer, theme.panel, panel);
    text(layer, theme.header, title, 11.0, panel.x + 3.0, panel.top() - 7.0, &fonts.bold);

    let plot = Area {
        x: panel.x + 6.0,
        y: panel.y + 12.0,
        w: panel.w - 10.0,
        h: panel.h - 26.0,
    };
    layer.set_outline_color(rgb(theme.axis_text));
    layer.set_outline_thickness(0.6);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(plot.x), Mm(plot.top())), false),
            (Point::new(Mm(plot.x), Mm(plot.y)), false),
            (Point::new(Mm(plot.right()), Mm(plot.y)), false),
        ],
        is_closed: false,
    });
    plot
}

fn axis_range(layer: &PdfLayerReference, fonts: &Fonts, theme: &Theme, plot: Area, lo: f64, hi: f64) {
    text(layer, theme.axis_text, &format!("{lo:.1}"), 6.0, plot.x, plot.y - 4.0, &fonts.regular);
    text(layer, theme.axis_text, &format!("{hi:.1}"), 6.0, plot.right() - 8.0, plot.y - 4.0, &fonts.regular);
}

fn no_data(layer: &PdfLayerReference, fonts: &Fonts, theme: &Theme, plot: Area) {
    let (x, y) = (plot.x + plot.w / 2.0 - 7.0, plot.y + plot.h / 2.0);
    text(layer, theme.axis_text, "No data", 9.0, x, y, &fonts.regular);
}

fn fill(layer: &PdfLayerReference, color: Color32, area: Area) {
    layer.set_fill_color(rgb(color));
    let rect = Rect::new(Mm(area.x), Mm(area.y), Mm(area.right()), Mm(area.top()))
        .with_mode(PaintMode::Fill);
    layer.add_rect(rect);
}

fn text(layer: &PdfLayerReference, color: Color32, s: &str, size: f32, x: f32, y: f32, font: &IndirectFontRef) {
    layer.set_fill_color(rgb(color));
    layer.use_text(latin1(s), size, Mm(x), Mm(y), font);
}

fn rgb(c: Color32) -> Color {
    Color::Rgb(Rgb::new(
        c.r() as f32 / 255.0,
        c.g() as f32 / 255.0,
        c.b() as f32 / 255.0,
        None,
    ))
}

/// Min and max, widened by ±0.5 when they coincide.
fn span(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

/// The built-in Helvetica only covers Latin-1.
fn latin1(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '—' | '–' => '-',
            '•' => '|',
            c if (c as u32) < 0x100 => c,
            _ => '?',
        })
        .collect()
}

fn clip(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let head: String = label.chars().take(max - 1).collect();
        format!("{head}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::Table;

    fn snapshot(csv: &str) -> DashboardState {
        DashboardState::build(&Table::parse_str(csv).unwrap())
    }

    #[test]
    fn loaded_dashboard_renders_a_pdf() {
        let s = snapshot(include_str!("../tests/fixtures/equipment.csv"));
        let bytes = render_pdf(&s, &Theme::dark(), 12).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn dashboard_without_rows_still_renders() {
        let s = snapshot("Type,Flowrate,Pressure,Temperature\n");
        let bytes = render_pdf(&s, &Theme::dark(), 12).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn constant_scatter_does_not_divide_by_zero() {
        assert_eq!(span(&[3.0, 3.0]), (2.5, 3.5));
        assert_eq!(span(&[1.0, 4.0]), (1.0, 4.0));
    }

    #[test]
    fn text_is_reduced_to_latin1() {
        assert_eq!(latin1("P50 — • 5°C"), "P50 - | 5°C");
        assert_eq!(clip("HeatExchanger", 10), "HeatExcha.");
        assert_eq!(clip("Pump", 10), "Pump");
    }

    #[test]
    fn written_report_is_a_non_empty_pdf_file() {
        let s = snapshot(include_str!("../tests/fixtures/equipment.csv"));
        let path = std::env::temp_dir().join(format!("dashboard-report-{}.pdf", std::process::id()));

        write_pdf(&s, &Theme::dark(), 12, &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(!bytes.is_empty());
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn unwritable_report_path_is_an_error() {
        let s = snapshot("Type\nA\n");
        let err = write_pdf(&s, &Theme::dark(), 12, Path::new("/no/such/dir/out.pdf")).unwrap_err();
        assert!(format!("{err:#}").contains("creating"));
    }
}
