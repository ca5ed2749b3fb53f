use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use gistx_model::{Column, Issue, Severity};
use gistx_output::xml_file_name;

use gistx_cli::types::RunOutcome;

pub fn print_summary(outcome: &RunOutcome) {
    println!("Workbook: {}", outcome.workbook.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Worksheet"),
        header_cell("Checks"),
        header_cell("Questions"),
        header_cell("XML"),
        header_cell("Errors"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    align_column(&mut table, 3, CellAlignment::Center);

    let mut total_questions = 0usize;
    for report in &outcome.validation.worksheets {
        total_questions += report.questions.len();
        let xml = outcome.artifacts.as_ref().and_then(|artifacts| {
            let name = xml_file_name(&report.worksheet);
            artifacts
                .xml_files
                .iter()
                .any(|path| path.ends_with(&name))
                .then_some(name)
        });
        table.add_row(vec![
            Cell::new(&report.worksheet)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(report.checks.len()),
            Cell::new(report.questions.len()),
            output_cell(xml.as_deref()),
            count_cell(report.error_count(), Color::Red),
            count_cell(report.warning_count(), Color::Yellow),
        ]);
    }
    if let Some(crfs) = &outcome.validation.crfs {
        let errors = crfs.issues.iter().filter(|issue| issue.is_error()).count();
        table.add_row(vec![
            Cell::new("crfs").fg(Color::DarkGrey),
            dim_cell(crfs.entries.len()),
            dim_cell("-"),
            dim_cell("-"),
            count_cell(errors, Color::Red),
            count_cell(crfs.issues.len() - errors, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_questions).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(outcome.validation.error_count(), Color::Red).add_attribute(Attribute::Bold),
        count_cell(outcome.validation.warning_count(), Color::Yellow)
            .add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_issue_table(outcome);
    if let Some(artifacts) = &outcome.artifacts {
        println!("Manifest: {}", artifacts.manifest.display());
        println!("Package: {}", artifacts.package.zip_path.display());
    } else if outcome.has_errors() {
        eprintln!("Validation failed; no files were generated.");
    }
    if let Some(path) = &outcome.log_file {
        println!("Run log: {}", path.display());
    }
}

/// Every issue, errors first, then in worksheet and row order.
fn print_issue_table(outcome: &RunOutcome) {
    let mut issues: Vec<&Issue> = outcome.validation.issues().collect();
    if issues.is_empty() {
        return;
    }
    issues.sort_by_key(|issue| severity_rank(issue.severity));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Kind"),
        header_cell("Worksheet"),
        header_cell("Row"),
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    for issue in issues {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(issue.kind.label()),
            Cell::new(&issue.worksheet),
            issue.row.map_or_else(|| dim_cell("-"), Cell::new),
            issue
                .column
                .map_or_else(|| dim_cell("-"), |column| Cell::new(column.name())),
            issue
                .field
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

/// The schema table: column order, header text, and what the cell holds.
pub fn print_columns() {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Column"),
        header_cell("Content"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for column in Column::ALL {
        table.add_row(vec![
            Cell::new(column.index() + 1),
            Cell::new(column.name())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(column.language().label()),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(80);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::UpperBoundary(Width::Fixed(20)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn output_cell(name: Option<&str>) -> Cell {
    match name {
        Some(_) => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 0,
        Severity::Warning => 1,
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
