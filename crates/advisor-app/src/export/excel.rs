//! Excel export functionality

use advisor_types::{Error, Result};
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::path::Path;

use crate::app::BatchResults;

fn excel_err(e: XlsxError) -> Error {
    Error::Excel(e.to_string())
}

/// Export advisory results to an Excel file
pub fn export_to_excel(results: &BatchResults, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    // Add summary sheet
    let summary_sheet = workbook.add_worksheet();
    write_summary_sheet(summary_sheet, results)?;

    // Add recommendations sheet
    let details_sheet = workbook.add_worksheet();
    write_recommendations_sheet(details_sheet, results)?;

    workbook.save(output_path).map_err(excel_err)?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, results: &BatchResults) -> Result<()> {
    sheet.set_name("Summary").map_err(excel_err)?;

    let header_format = Format::new().set_bold();

    sheet
        .write_string_with_format(0, 0, "Crop Advisory Report", &header_format)
        .map_err(excel_err)?;

    let rows: [(&str, String); 5] = [
        ("Generated:", results.finished_at.to_rfc3339()),
        ("Recommendations per farm:", results.k.to_string()),
        ("Farms:", results.entries.len().to_string()),
        ("Successful:", results.successful.to_string()),
        ("Failed:", results.failed.to_string()),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let row = 2 + i as u32;
        sheet.write_string(row, 0, *label).map_err(excel_err)?;
        sheet.write_string(row, 1, value).map_err(excel_err)?;
    }

    sheet.set_column_width(0, 28).map_err(excel_err)?;
    Ok(())
}

fn write_recommendations_sheet(sheet: &mut Worksheet, results: &BatchResults) -> Result<()> {
    sheet.set_name("Recommendations").map_err(excel_err)?;

    let header_format = Format::new().set_bold();
    let number_format = Format::new().set_num_format("0.00");
    let percent_format = Format::new().set_num_format("0.0%");

    let headers = [
        "Row",
        "State",
        "Season",
        "Crop Year",
        "Area (ha)",
        "Annual Rainfall (mm)",
        "Fertilizer (kg)",
        "Pesticide (kg)",
        "Rank",
        "Recommended Crop",
        "Expected Yield",
        "Probability",
        "Error",
    ];

    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(excel_err)?;
    }

    let mut row: u32 = 1;
    for entry in &results.entries {
        let obs = &entry.observation;
        // one line per recommendation; failed farms get a single line with the error
        let lines = entry.recommendations.len().max(1);
        for line in 0..lines {
            sheet.write_number(row, 0, entry.row as f64).map_err(excel_err)?;
            sheet.write_string(row, 1, &obs.state).map_err(excel_err)?;
            sheet.write_string(row, 2, &obs.season).map_err(excel_err)?;
            sheet.write_number(row, 3, f64::from(obs.crop_year)).map_err(excel_err)?;
            sheet
                .write_number_with_format(row, 4, obs.area, &number_format)
                .map_err(excel_err)?;
            sheet
                .write_number_with_format(row, 5, obs.annual_rainfall, &number_format)
                .map_err(excel_err)?;
            sheet
                .write_number_with_format(row, 6, obs.fertilizer, &number_format)
                .map_err(excel_err)?;
            sheet
                .write_number_with_format(row, 7, obs.pesticide, &number_format)
                .map_err(excel_err)?;

            if let Some(rec) = entry.recommendations.get(line) {
                sheet.write_number(row, 8, (line + 1) as f64).map_err(excel_err)?;
                sheet.write_string(row, 9, &rec.crop).map_err(excel_err)?;
                sheet
                    .write_number_with_format(row, 10, rec.predicted_yield, &number_format)
                    .map_err(excel_err)?;
                sheet
                    .write_number_with_format(row, 11, rec.probability, &percent_format)
                    .map_err(excel_err)?;
            }
            if let Some(ref error) = entry.error {
                sheet.write_string(row, 12, error).map_err(excel_err)?;
            }
            row += 1;
        }
    }

    sheet.set_column_width(9, 20).map_err(excel_err)?;
    sheet.set_column_width(12, 40).map_err(excel_err)?;
    Ok(())
}
