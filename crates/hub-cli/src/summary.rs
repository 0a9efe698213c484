use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use hub_model::{ConfigIssue, IssueSeverity, format_iso_date};

use hub_cli::types::{BuildResult, CheckResult, PeriodSummary};

pub fn print_check_summary(result: &CheckResult) {
    println!("Configuration: {}", result.config_path.display());
    if result.issues.is_empty() {
        println!("No findings.");
    } else {
        print_issue_table(&result.issues);
    }
    let errors = result.issues.iter().filter(|issue| issue.is_error()).count();
    let warnings = result.issues.len() - errors;
    if result.has_errors {
        eprintln!("Configuration is invalid: {errors} error(s), {warnings} warning(s).");
    } else {
        println!("Configuration is valid ({warnings} warning(s)).");
    }
}

pub fn print_build_summary(result: &BuildResult) {
    println!("Project: {}", result.root.display());
    println!("Configuration: {}", result.config_path.display());
    println!(
        "Target data: {} rows; model output: {} long rows -> {} wide rows",
        result.target_rows, result.model_rows, result.wide_rows
    );
    if !result.quantile_levels.is_empty() {
        println!("Quantile levels: {}", result.quantile_levels.join(", "));
    }
    if let Some(snapshot) = &result.snapshot {
        println!(
            "Target data as_of: {} (latest of {}, {} older rows dropped)",
            snapshot.latest_as_of, snapshot.snapshot_count, snapshot.dropped_rows
        );
    }
    if let Some(date) = &result.metadata.default_selected_date {
        println!("Default selected date: {date}");
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Period"),
        header_cell("Kind"),
        header_cell("Start"),
        header_cell("End"),
        header_cell("Target rows"),
        header_cell("Model rows"),
        header_cell("By target"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);

    let mut total_target = 0usize;
    let mut total_model = 0usize;
    for period in &result.periods {
        total_target += period.target_rows;
        total_model += period.model_rows;
        table.add_row(vec![
            Cell::new(&period.period_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            kind_cell(period.is_dynamic),
            Cell::new(format_iso_date(period.range.start)),
            Cell::new(format_iso_date(period.range.end)),
            count_cell(period.target_rows),
            count_cell(period.model_rows),
            targets_cell(period),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_target).add_attribute(Attribute::Bold),
        Cell::new(total_model).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");

    println!(
        "Locations: {}; models: {}",
        result.metadata.locations.len(),
        result.metadata.model_names.join(", ")
    );
    if !result.warnings.is_empty() {
        print_issue_table(&result.warnings);
    }
}

fn print_issue_table(issues: &[ConfigIssue]) {
    let mut ordered: Vec<&ConfigIssue> = issues.iter().collect();
    // Errors first; rule order is kept within a severity.
    ordered.sort_by_key(|issue| severity_rank(issue.severity));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in ordered {
        table.add_row(vec![
            severity_cell(issue.severity),
            Cell::new(&issue.field),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Findings:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_rank(severity: IssueSeverity) -> u8 {
    match severity {
        IssueSeverity::Error => 0,
        IssueSeverity::Warning => 1,
    }
}

fn severity_cell(severity: IssueSeverity) -> Cell {
    match severity {
        IssueSeverity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        IssueSeverity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn kind_cell(is_dynamic: bool) -> Cell {
    if is_dynamic {
        Cell::new("dynamic").fg(Color::Magenta)
    } else {
        Cell::new("static")
    }
}

fn targets_cell(period: &PeriodSummary) -> Cell {
    if period.targets.is_empty() {
        return dim_cell("-");
    }
    let lines: Vec<String> = period
        .targets
        .iter()
        .map(|(target, rows)| format!("{target}: {rows}"))
        .collect();
    Cell::new(lines.join("\n"))
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        Cell::new(count).fg(Color::Yellow)
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
