use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::Theme;
use crate::data::snapshot::DashboardState;

pub const DEFAULT_EXPORT_NAME: &str = "dashboard.pdf";

/// Write the snapshot as pretty-printed JSON.
pub fn write_snapshot(snapshot: &DashboardState, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, snapshot).context("serialising dashboard")?;
    writer.write_all(b"\n")?;
    writer.flush().context("flushing export")?;
    log::info!("Exported dashboard to {}", path.display());
    Ok(())
}

/// Export by file extension: `.json` writes the snapshot, anything else the PDF report.
pub fn export_to(snapshot: &DashboardState, theme: &Theme, bins: usize, path: &Path) -> Result<()> {
    let json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if json {
        write_snapshot(snapshot, path)
    } else {
        crate::report::write_pdf(snapshot, theme, bins, path)
    }
}

/// Ask for a destination and export. Nothing happens if the dialog is cancelled.
pub fn save_dialog(
    snapshot: &DashboardState,
    theme: &Theme,
    bins: usize,
) -> Result<Option<std::path::PathBuf>> {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export dashboard")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("PDF report", &["pdf"])
        .add_filter("JSON", &["json"])
        .save_file()
    else {
        return Ok(None);
    };
    export_to(snapshot, theme, bins, &path)?;
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::Table;

    #[test]
    fn exported_json_contains_every_dataset() {
        let table = Table::parse_str(include_str!("../tests/fixtures/equipment.csv")).unwrap();
        let snapshot = DashboardState::build(&table);
        let path = std::env::temp_dir().join(format!("dashboard-export-{}.json", std::process::id()));

        write_snapshot(&snapshot, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["entry_count"], 8);
        assert_eq!(json["type_counts"][0][0], "Pump");
        assert_eq!(json["flowrate_series"].as_array().unwrap().len(), 6);
        assert_eq!(json["pressure_temperature"]["x"].as_array().unwrap().len(), 7);
        assert_eq!(json["pressure_stats"]["max"], "8.40");
    }

    #[test]
    fn extension_selects_the_format() {
        let table = Table::parse_str(include_str!("../tests/fixtures/equipment.csv")).unwrap();
        let snapshot = DashboardState::build(&table);
        let dir = std::env::temp_dir();
        let pdf = dir.join(format!("dashboard-dispatch-{}.pdf", std::process::id()));
        let json = dir.join(format!("dashboard-dispatch-{}.JSON", std::process::id()));

        export_to(&snapshot, &Theme::dark(), 12, &pdf).unwrap();
        export_to(&snapshot, &Theme::dark(), 12, &json).unwrap();
        let pdf_bytes = std::fs::read(&pdf).unwrap();
        let json_text = std::fs::read_to_string(&json).unwrap();
        std::fs::remove_file(&pdf).ok();
        std::fs::remove_file(&json).ok();

        assert!(pdf_bytes.starts_with(b"%PDF"));
        assert!(json_text.trim_start().starts_with('{'));
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let table = Table::parse_str("Type\nA\n").unwrap();
        let snapshot = DashboardState::build(&table);
        let err = write_snapshot(&snapshot, Path::new("/no/such/dir/out.json")).unwrap_err();
        assert!(format!("{err:#}").contains("creating"));
    }
}
