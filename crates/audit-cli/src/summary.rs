use std::cmp::Ordering;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use audit_model::{AuditFlag, AuditSummary, Severity, ValidationReport};

use crate::types::RunOutcome;

pub fn print_summary(outcome: &RunOutcome) {
    let summary = &outcome.summary;
    println!(
        "Audit: {} pricebook vs {} (tolerance {}%)",
        summary.current_year,
        summary.prior_year,
        summary.tolerance * 100.0
    );
    if outcome.dry_run {
        println!("Output: none (dry run)");
    } else {
        println!("Output: {}", outcome.out_dir.display());
    }
    if summary.row_errors > 0 {
        println!(
            "Row errors: {} billing rows excluded (see row_errors.csv)",
            summary.row_errors
        );
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Flag"),
        header_cell("Rows"),
        header_cell("% Rows"),
        header_cell("Net Total"),
        header_cell("Net Avg"),
    ]);
    apply_grid_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for stat in &summary.flags {
        table.add_row(vec![
            flag_cell(stat.flag, stat.rows),
            count_cell(stat.rows, family_color(stat.flag)),
            stat_cell(format!("{:.1}", stat.percent), stat.rows),
            stat_cell(format!("{:.2}", stat.net_total), stat.rows),
            stat_cell(format!("{:.2}", stat.net_avg), stat.rows),
        ]);
    }
    let percent_total = if summary.audited_rows > 0 { 100.0 } else { 0.0 };
    let net_avg = if summary.audited_rows > 0 {
        summary.total_net_value / summary.audited_rows as f64
    } else {
        0.0
    };
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.audited_rows).add_attribute(Attribute::Bold),
        Cell::new(format!("{percent_total:.1}")).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.2}", summary.total_net_value)).add_attribute(Attribute::Bold),
        Cell::new(format!("{net_avg:.2}")).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_section_table(summary);
    print_issue_table(&outcome.validation);
    if let Some(reports) = &outcome.reports {
        println!();
        println!("Artifacts:");
        for path in reports.paths() {
            println!("- {}", path.display());
        }
    }
    if !outcome.errors.is_empty() {
        eprintln!("Errors:");
        for error in &outcome.errors {
            eprintln!("- {error}");
        }
    }
}

fn print_section_table(summary: &AuditSummary) {
    if summary.sections.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Section"),
        header_cell("Entries"),
        header_cell("Skipped Rows"),
        header_cell("Note"),
    ]);
    apply_grid_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for section in &summary.sections {
        let name_cell = if section.skip_reason.is_some() {
            dim_cell(section.name.clone())
        } else {
            Cell::new(section.name.clone())
        };
        let note_cell = match &section.skip_reason {
            Some(reason) => Cell::new(reason.clone()).fg(Color::Yellow),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            name_cell,
            count_cell(section.entries, Color::Green),
            count_cell(section.skipped_rows, Color::Yellow),
            note_cell,
        ]);
    }
    println!();
    println!("Pricebook sections:");
    println!("{table}");
}

fn print_issue_table(reports: &[ValidationReport]) {
    let mut issues = Vec::new();
    for report in reports {
        for issue in &report.issues {
            issues.push((report.stage.clone(), issue.clone()));
        }
    }
    if issues.is_empty() {
        return;
    }
    issues.sort_by(|a, b| {
        let severity = severity_rank(b.1.severity).cmp(&severity_rank(a.1.severity));
        if severity != Ordering::Equal {
            return severity;
        }
        let stage = a.0.cmp(&b.0);
        if stage != Ordering::Equal {
            return stage;
        }
        a.1.check.cmp(&b.1.check)
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Severity"),
        header_cell("Check"),
        header_cell("Message"),
    ]);
    apply_grid_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for (stage, issue) in issues {
        table.add_row(vec![
            Cell::new(stage),
            severity_cell(issue.severity),
            Cell::new(issue.check),
            Cell::new(issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn apply_grid_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(110);
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn flag_cell(flag: AuditFlag, rows: usize) -> Cell {
    if rows == 0 {
        return dim_cell(flag.as_str());
    }
    if flag.needs_review() {
        Cell::new(flag.as_str())
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(flag.as_str()).fg(Color::Green)
    }
}

fn family_color(flag: AuditFlag) -> Color {
    if flag.needs_review() {
        Color::Yellow
    } else {
        Color::Green
    }
}

fn count_cell(value: usize, color: Color) -> Cell {
    if value > 0 {
        Cell::new(value).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(value)
    }
}

fn stat_cell(text: String, rows: usize) -> Cell {
    if rows > 0 {
        Cell::new(text)
    } else {
        dim_cell(text)
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR").fg(Color::Red),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 2,
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
