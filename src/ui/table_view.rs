use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::config::Theme;
use crate::data::table::Table;

const ROW_HEIGHT: f32 = 20.0;

/// Raw cells of the loaded CSV, one row per record.
pub fn data_table(ui: &mut Ui, table: &Table, theme: &Theme) {
    let n_cols = table.columns().len();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(90.0).clip(true), n_cols)
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for name in table.columns() {
                header.col(|ui| {
                    ui.label(RichText::new(name).strong().color(theme.header));
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, table.row_count(), |mut row| {
                let cells = &table.rows()[row.index()];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });
}
