//! Rendering of dataset statistics.

use crate::{
    common::*,
    config::Classes,
    stats::{DatasetStats, SplitStats},
};
use prettytable::{Cell, Row, Table};

/// The output format of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Text,
    Table,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self::Text
    }
}

impl FromStr for ReportFormat {
    type Err = OptionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "text" => Ok(Self::Text),
            "table" => Ok(Self::Table),
            _ => Err(OptionError {
                kind: "report format",
                value: text.to_owned(),
                expected: "text, table",
            }),
        }
    }
}

fn class_name(classes: &Classes, id: usize) -> String {
    match classes.name(id) {
        Some(name) => name.to_owned(),
        None => id.to_string(),
    }
}

/// The plain text report, one block per record.
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    pub stats: &'a DatasetStats,
    pub classes: &'a Classes,
}

impl<'a> TextReport<'a> {
    pub fn new(stats: &'a DatasetStats, classes: &'a Classes) -> Self {
        Self { stats, classes }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset statistics:")?;

        for (name, stats) in self.stats.iter() {
            let SplitStats {
                mean_width,
                mean_height,
                image_count,
                ref class_counts,
                total_individuals,
            } = *stats;

            writeln!(f)?;
            writeln!(f, "{} set:", name.title())?;
            writeln!(f, "  Mean image size: {} x {}", mean_width, mean_height)?;
            writeln!(f, "  Total images: {}", image_count)?;
            writeln!(
                f,
                "  Total individuals across all classes: {}",
                total_individuals
            )?;
            writeln!(f, "  Individuals per class:")?;
            for (id, count) in class_counts.iter() {
                writeln!(f, "    Class {}: {}", class_name(self.classes, id), count)?;
            }
        }

        Ok(())
    }
}

/// The tabular report, one row per record and one column per class.
#[derive(Debug, Clone, Copy)]
pub struct TableReport<'a> {
    pub stats: &'a DatasetStats,
    pub classes: &'a Classes,
}

impl<'a> TableReport<'a> {
    pub fn new(stats: &'a DatasetStats, classes: &'a Classes) -> Self {
        Self { stats, classes }
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();

        let titles: Vec<_> = ["split", "mean width", "mean height", "images", "individuals"]
            .into_iter()
            .map(Cell::new)
            .chain(self.classes.iter().map(|(_, name)| Cell::new(name)))
            .collect();
        table.set_titles(Row::new(titles));

        for (name, stats) in self.stats.iter() {
            let cells: Vec<_> = [
                name.to_string(),
                format!("{:.2}", stats.mean_width),
                format!("{:.2}", stats.mean_height),
                stats.image_count.to_string(),
                stats.total_individuals.to_string(),
            ]
            .into_iter()
            .chain(stats.class_counts.iter().map(|(_, count)| count.to_string()))
            .map(|text| Cell::new(&text))
            .collect();
            table.add_row(Row::new(cells));
        }

        table
    }
}

impl fmt::Display for TableReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.table())
    }
}
