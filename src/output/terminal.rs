//! Terminal table output.
//!
//! One row per subnet, the visible data columns first, then one column per
//! hierarchy level, coarsest on the right. A level cell marks the first row
//! of each ancestor group; `[/n]` means the group is one exact sibling pair
//! and can be joined with `joinat`.

use crate::config::DisplayOptions;
use crate::models::SubnetDescriptor;
use crate::processing::{HierarchyCell, HierarchyIndex};
use colored::Colorize;

/// Left-align `value` in a field of at least `width` characters.
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    format!("{value_str:<width$}")
}

struct Column {
    header: String,
    cells: Vec<String>,
}

impl Column {
    fn new(header: &str, cells: Vec<String>) -> Column {
        Column {
            header: header.to_string(),
            cells,
        }
    }

    fn width(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.chars().count())
            .chain(std::iter::once(self.header.chars().count()))
            .max()
            .unwrap_or(0)
    }
}

fn level_cell(index: &HierarchyIndex, level: u8, row: usize) -> String {
    match index.cell(level, row) {
        HierarchyCell::Start { pair: Some(_), .. } => format!("[/{level}]"),
        HierarchyCell::Start { pair: None, .. } => format!("/{level}"),
        HierarchyCell::Inside => "|".to_string(),
        HierarchyCell::Empty => String::new(),
    }
}

fn paint(cell: &str, padded: String) -> String {
    if cell.starts_with('[') {
        padded.green().bold().to_string()
    } else if cell.starts_with('/') || cell == "|" {
        padded.dimmed().to_string()
    } else {
        padded
    }
}

/// Render the subnets as an aligned text table.
pub fn render_table(
    subnets: &[SubnetDescriptor],
    index: &HierarchyIndex,
    options: &DisplayOptions,
) -> String {
    if subnets.is_empty() {
        return "No subnets.".to_string();
    }

    let mut columns = vec![Column::new(
        "#",
        (1..=subnets.len()).map(|i| i.to_string()).collect(),
    )];
    if options.show_subnet_name {
        columns.push(Column::new(
            "Subnet Name",
            subnets
                .iter()
                .map(|s| s.name().unwrap_or("").to_string())
                .collect(),
        ));
    }
    columns.push(Column::new(
        "Subnet Address",
        subnets.iter().map(|s| s.cidr().to_string()).collect(),
    ));
    if options.show_netmask {
        columns.push(Column::new(
            "Netmask",
            subnets.iter().map(|s| s.subnet_mask().to_string()).collect(),
        ));
    }
    if options.show_range {
        columns.push(Column::new(
            "Range",
            subnets.iter().map(|s| s.host_address_range()).collect(),
        ));
    }
    if options.show_usable_ips {
        columns.push(Column::new(
            "Useable IPs",
            subnets.iter().map(|s| s.usable_host_range()).collect(),
        ));
    }
    if options.show_hosts {
        columns.push(Column::new(
            "Hosts",
            subnets.iter().map(|s| s.usable_hosts().to_string()).collect(),
        ));
    }
    if options.show_join {
        for &level in index.levels() {
            columns.push(Column::new(
                &format!("/{level}"),
                (0..subnets.len())
                    .map(|row| level_cell(index, level, row))
                    .collect(),
            ));
        }
    }

    let widths: Vec<usize> = columns.iter().map(Column::width).collect();
    let mut out = Vec::with_capacity(subnets.len() + 2);
    out.push(
        columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format_field(&c.header, *w).bold().to_string())
            .collect::<Vec<_>>()
            .join("  "),
    );
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in 0..subnets.len() {
        out.push(
            columns
                .iter()
                .zip(&widths)
                .map(|(c, w)| paint(&c.cells[row], format_field(&c.cells[row], *w)))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string(),
        );
    }
    out.join("\n")
}
