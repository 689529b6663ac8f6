//! Export projections
//!
//! Each export sees the filtered and sorted rows (not just the current page)
//! over the data columns only; the actions column is never exported.

use super::{ColumnDescriptor, Row};
use crate::error::Result;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fmt::Write as _;

/// File name for CSV downloads
pub const CSV_FILE_NAME: &str = "table_data.csv";

/// CSV text: a header of labels, then one fully quoted line per row.
///
/// Lines are separated by `\n` with no trailing newline. Embedded quotes are
/// doubled.
pub fn to_csv(rows: &[&Row], columns: &[ColumnDescriptor]) -> Result<String> {
    let columns: Vec<&ColumnDescriptor> = columns.iter().filter(|c| !c.is_actions()).collect();
    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut out = Vec::new();
    {
        let mut header = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Necessary)
            .from_writer(&mut out);
        header.write_record(columns.iter().map(|c| c.label.as_str()))?;
        header.flush()?;
    }
    {
        let mut body = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Always)
            .from_writer(&mut out);
        for row in rows {
            body.write_record(columns.iter().map(|c| row.display(&c.key).into_owned()))?;
        }
        body.flush()?;
    }

    let mut text = String::from_utf8_lossy(&out).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Visual theme of an HTML report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportStyle {
    /// Plain table for the print dialog
    Print,
    /// Letter-style layout meant for "print to PDF"
    Pdf,
}

impl ReportStyle {
    fn page_title(self) -> &'static str {
        match self {
            ReportStyle::Print => "Imprimir Tabla",
            ReportStyle::Pdf => "Exportar a PDF",
        }
    }

    fn button_label(self) -> &'static str {
        match self {
            ReportStyle::Print => "Imprimir",
            ReportStyle::Pdf => "Imprimir PDF",
        }
    }

    fn stylesheet(self) -> &'static str {
        match self {
            ReportStyle::Print => PRINT_CSS,
            ReportStyle::Pdf => PDF_CSS,
        }
    }

    /// File name used when the report is written to disk
    pub fn file_name(self) -> &'static str {
        match self {
            ReportStyle::Print => "table_print.html",
            ReportStyle::Pdf => "table_pdf.html",
        }
    }
}

const PRINT_CSS: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #333; }
table { border-collapse: collapse; width: 100%; margin-top: 20px; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #f2f2f2; font-weight: bold; }
.print-btn { margin-top: 20px; padding: 10px 20px; background: #007bff; color: white; border: none; cursor: pointer; }
@media print { .print-btn { display: none; } }
";

const PDF_CSS: &str = "\
body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }
.pdf-container { max-width: 800px; margin: 0 auto; }
.header { text-align: center; margin-bottom: 30px; }
.header h1 { color: #2c3e50; margin-bottom: 5px; }
table { border-collapse: collapse; width: 100%; font-size: 12px; }
th, td { border: 1px solid #bdc3c7; padding: 8px; text-align: left; }
th { background-color: #34495e; color: white; }
tr:nth-child(even) { background-color: #f8f9fa; }
.footer { margin-top: 30px; text-align: center; font-size: 10px; color: #7f8c8d; }
.print-btn { display: block; margin: 20px auto; padding: 10px 20px; background: #e74c3c; color: white; border: none; cursor: pointer; }
@media print { .print-btn { display: none; } }
";

/// Full HTML document for the print or PDF view.
///
/// `date` is printed as given, so callers pick the locale format.
pub fn to_html(
    rows: &[&Row],
    columns: &[ColumnDescriptor],
    style: ReportStyle,
    date: &str,
) -> String {
    let columns: Vec<&ColumnDescriptor> = columns.iter().filter(|c| !c.is_actions()).collect();

    let mut table = String::from("<table>\n<thead>\n<tr>");
    for column in &columns {
        let _ = write!(table, "<th>{}</th>", escape_html(&column.label));
    }
    table.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in rows {
        table.push_str("<tr>");
        for column in &columns {
            let _ = write!(table, "<td>{}</td>", escape_html(&row.display(&column.key)));
        }
        table.push_str("</tr>\n");
    }
    table.push_str("</tbody>\n</table>");

    let count = rows.len();
    let body = match style {
        ReportStyle::Print => format!(
            "<h1>Reporte de Datos</h1>\n\
             <p>Fecha: {date}</p>\n\
             {table}\n\
             <p>Total de registros: {count}</p>\n",
            date = escape_html(date),
        ),
        ReportStyle::Pdf => format!(
            "<div class=\"pdf-container\">\n\
             <div class=\"header\">\n<h1>Reporte de Datos</h1>\n<p>Fecha: {date}</p>\n</div>\n\
             {table}\n\
             <div class=\"footer\">\n<p>Total de registros: {count}</p>\n\
             <p>Documento generado automáticamente</p>\n</div>\n\
             </div>\n",
            date = escape_html(date),
        ),
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n{css}</style>\n</head>\n<body>\n{body}\
         <button class=\"print-btn\" onclick=\"window.print(); window.close();\">{button}</button>\n\
         </body>\n</html>\n",
        title = style.page_title(),
        css = style.stylesheet(),
        button = style.button_label(),
    )
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableSchema;

    fn sample() -> (Vec<Row>, Vec<ColumnDescriptor>) {
        let rows = vec![
            Row::new().with("nombre", "A").with("estado", "Pendiente"),
            Row::new().with("nombre", "B").with("estado", "Completado"),
        ];
        let columns = TableSchema::infer(&rows[0]).columns(true);
        (rows, columns)
    }

    #[test]
    fn test_csv_literal_output() {
        let (rows, columns) = sample();
        let refs: Vec<&Row> = rows.iter().collect();
        let csv = to_csv(&refs, &columns).expect("csv");
        assert_eq!(csv, "Nombre,Estado\n\"A\",\"Pendiente\"\n\"B\",\"Completado\"");
    }

    #[test]
    fn test_csv_doubles_embedded_quotes() {
        let rows = vec![Row::new().with("nombre", "say \"hi\", ok")];
        let refs: Vec<&Row> = rows.iter().collect();
        let columns = TableSchema::infer(&rows[0]).data_columns();
        let csv = to_csv(&refs, &columns).expect("csv");
        assert_eq!(csv, "Nombre\n\"say \"\"hi\"\", ok\"");
    }

    #[test]
    fn test_csv_header_only_for_no_rows() {
        let (_, columns) = sample();
        assert_eq!(to_csv(&[], &columns).expect("csv"), "Nombre,Estado");
    }

    #[test]
    fn test_print_html_contents() {
        let (rows, columns) = sample();
        let refs: Vec<&Row> = rows.iter().collect();
        let html = to_html(&refs, &columns, ReportStyle::Print, "18/10/2026");
        assert!(html.contains("<title>Imprimir Tabla</title>"));
        assert!(html.contains("<h1>Reporte de Datos</h1>"));
        assert!(html.contains("Fecha: 18/10/2026"));
        assert!(html.contains("<th>Nombre</th><th>Estado</th></tr>"));
        assert!(html.contains("<td>B</td><td>Completado</td>"));
        assert!(html.contains("Total de registros: 2"));
        assert!(html.contains("window.print()"));
        assert!(!html.contains("Acciones"));
    }

    #[test]
    fn test_pdf_html_theme() {
        let (rows, columns) = sample();
        let refs: Vec<&Row> = rows.iter().collect();
        let html = to_html(&refs, &columns, ReportStyle::Pdf, "01/02/2026");
        assert!(html.contains("<title>Exportar a PDF</title>"));
        assert!(html.contains("pdf-container"));
        assert!(html.contains("Documento generado automáticamente"));
        assert!(html.contains(">Imprimir PDF</button>"));
    }

    #[test]
    fn test_html_escapes_values() {
        let rows = vec![Row::new().with("nombre", "<b>x</b> & y")];
        let refs: Vec<&Row> = rows.iter().collect();
        let columns = TableSchema::infer(&rows[0]).data_columns();
        let html = to_html(&refs, &columns, ReportStyle::Print, "hoy");
        assert!(html.contains("<td>&lt;b&gt;x&lt;/b&gt; &amp; y</td>"));
    }
}
