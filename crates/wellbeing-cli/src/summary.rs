use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use wellbeing_cli::harness::{
    DatasetSummary, InspectReport, MetricInfo, StepOutcome, StepStatus, data_kind, describe,
};
use wellbeing_core::DerivedData;
use wellbeing_core::views::RadarData;

pub fn print_metrics(catalog: &[MetricInfo]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Metric"),
        header_cell("Label"),
        header_cell("Bin width"),
        header_cell("Ranking"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for info in catalog {
        let name = if info.axis {
            Cell::new(format!("{} (axis)", info.name)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(info.name)
        };
        let ranking = if info.inverted {
            Cell::new("lower is better").fg(Color::Yellow)
        } else {
            dim_cell("higher is better")
        };
        table.add_row(vec![
            name,
            Cell::new(info.label),
            Cell::new(info.default_bin_width),
            ranking,
        ]);
    }
    println!("{table}");
}

pub fn print_dataset_summary(summary: &DatasetSummary) {
    println!("Records: {}", summary.records);
    println!("Countries with data: {}", summary.countries);
    println!("Boundary ids: {}", summary.boundaries);
    match summary.year_range {
        Some((min, max)) => println!("Years: {min} to {max}"),
        None => println!("Years: none"),
    }

    let mut years = Table::new();
    years.set_header(vec![header_cell("Year"), header_cell("Countries")]);
    apply_table_style(&mut years);
    align_column(&mut years, 1, CellAlignment::Right);
    for (year, count) in &summary.countries_per_year {
        years.add_row(vec![Cell::new(year), Cell::new(count)]);
    }
    println!("{years}");

    if summary.classifications.is_empty() {
        println!("No region classifications.");
        return;
    }
    let mut classes = Table::new();
    classes.set_header(vec![header_cell("Classification"), header_cell("Values")]);
    apply_table_style(&mut classes);
    align_column(&mut classes, 1, CellAlignment::Right);
    for (column, values) in &summary.classifications {
        classes.add_row(vec![Cell::new(column), Cell::new(values)]);
    }
    println!("{classes}");
}

pub fn print_inspect(report: &InspectReport) {
    println!("Year: {}", report.year);
    println!("Compared metric: {}", report.metric);
    if let Some(primary) = report.primary {
        println!("Primary country: {primary}");
    }
    if let Some(region) = &report.region {
        println!("Region: {region}");
    }
    if !report.steps.is_empty() {
        print_steps(&report.steps);
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("View"),
        header_cell("Kind"),
        header_cell("Derived data"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (idx, snapshot) in report.views.iter().enumerate() {
        table.add_row(vec![
            dim_cell(idx + 1),
            Cell::new(&snapshot.view)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(data_kind(&snapshot.data)),
            Cell::new(describe(&snapshot.data)),
        ]);
    }
    println!("{table}");

    for snapshot in &report.views {
        if let DerivedData::Radar(radar) = &snapshot.data
            && !radar.series.is_empty()
        {
            print_radar(radar);
        }
    }
}

pub fn print_steps(steps: &[StepOutcome]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Step"),
        header_cell("Event"),
        header_cell("Outcome"),
        header_cell("Pass"),
        header_cell("Views"),
        header_cell("Message"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for step in steps {
        table.add_row(vec![
            Cell::new(step.step),
            Cell::new(step.event),
            status_cell(step.status),
            step.pass.map_or_else(|| dim_cell("-"), Cell::new),
            count_cell(step.views),
            step.message
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

/// Percentile table: one row per radar series, one column per axis.
fn print_radar(radar: &RadarData) {
    let mut header = vec![header_cell("Series")];
    header.extend(radar.axes.iter().map(|metric| header_cell(metric.label())));
    let mut table = Table::new();
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for idx in 1..=radar.axes.len() {
        align_column(&mut table, idx, CellAlignment::Right);
    }
    for series in &radar.series {
        let mut row = vec![Cell::new(&series.label).add_attribute(Attribute::Bold)];
        row.extend(radar.axes.iter().map(|&metric| {
            let value = *series.values.get(metric);
            if value.is_finite() {
                Cell::new(format!("{value:.1}"))
            } else {
                dim_cell("-")
            }
        }));
        table.add_row(row);
    }
    println!();
    println!("Percentiles ({}):", radar.year);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: StepStatus) -> Cell {
    match status {
        StepStatus::Refreshed => Cell::new(status.as_str()).fg(Color::Green),
        StepStatus::Unchanged => dim_cell(status.as_str()),
        StepStatus::Rejected => Cell::new(status.as_str())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
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
