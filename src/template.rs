//! Spec Template
//!
//! The rate card: which constituents exist, which spec levels each one
//! offers, and the per-unit rate of each level. Loaded from a CSV file
//! with `Constituent,Spec,Rate,Inclusion,Specification` columns, where
//! the inclusion and specification cells hold newline-separated lists.

use std::{fs::File, io, path::Path};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template Parsing Errors
#[derive(Debug, Error)]
pub enum TemplateError {
    /// IO error reading the template file
    #[error("Failed to read template file: {0}")]
    Io(#[from] io::Error),

    /// CSV parsing error
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// No valid rows survived filtering
    #[error("Template contains no valid rows")]
    Empty,
}

/// One spec level offered by a constituent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecEntry {
    /// Spec level, a single digit 1–9
    pub level: u8,

    /// Per-unit rate for this level
    pub rate: f64,

    /// What choosing this level includes
    pub inclusion: Vec<String>,

    /// Technical specification lines for this level
    pub specification: Vec<String>,
}

/// Raw CSV row before validation.
#[derive(Debug, Deserialize)]
struct TemplateRow {
    #[serde(rename = "Constituent", default)]
    constituent: String,

    #[serde(rename = "Spec", default)]
    spec: String,

    #[serde(rename = "Rate", default)]
    rate: String,

    #[serde(rename = "Inclusion", default)]
    inclusion: String,

    #[serde(rename = "Specification", default)]
    specification: String,
}

impl TemplateRow {
    /// Validates the row per the template conventions: non-empty
    /// constituent, spec level a single digit 1–9, rate a positive
    /// integer. Invalid rows are skipped rather than fatal.
    fn into_entry(self) -> Option<(String, SpecEntry)> {
        let constituent = self.constituent.trim();

        if constituent.is_empty() {
            return None;
        }

        let level = parse_spec_level(self.spec.trim())?;
        let rate = parse_rate(self.rate.trim())?;

        Some((
            constituent.to_string(),
            SpecEntry {
                level,
                rate,
                inclusion: split_lines(&self.inclusion),
                specification: split_lines(&self.specification),
            },
        ))
    }
}

/// The parsed rate card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    constituent_list: Vec<String>,
    constituents: FxHashMap<String, Vec<SpecEntry>>,
}

impl Template {
    /// Loads and parses a template CSV file.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::Io`]: the file could not be read.
    /// - [`TemplateError::Csv`]: a record was malformed beyond row-level
    ///   filtering.
    /// - [`TemplateError::Empty`]: no valid rows survived filtering.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        Self::from_reader(File::open(path)?)
    }

    /// Parses a template from any CSV reader.
    ///
    /// # Errors
    ///
    /// As for [`Template::from_path`], minus the file IO.
    pub fn from_reader(reader: impl io::Read) -> Result<Self, TemplateError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .flexible(true)
            .from_reader(reader);

        let mut constituent_list: Vec<String> = Vec::new();
        let mut constituents: FxHashMap<String, Vec<SpecEntry>> = FxHashMap::default();

        for record in csv_reader.deserialize::<TemplateRow>() {
            let Some((constituent, entry)) = record?.into_entry() else {
                continue;
            };

            if !constituents.contains_key(&constituent) {
                constituent_list.push(constituent.clone());
            }

            constituents.entry(constituent).or_default().push(entry);
        }

        if constituent_list.is_empty() {
            return Err(TemplateError::Empty);
        }

        for specs in constituents.values_mut() {
            specs.sort_by_key(|entry| entry.level);
        }

        Ok(Self {
            constituent_list,
            constituents,
        })
    }

    /// Constituent names in first-appearance order.
    ///
    /// This order defines the category order for every downstream
    /// structure, including the solver's choice list.
    #[must_use]
    pub fn constituent_list(&self) -> &[String] {
        &self.constituent_list
    }

    /// Spec entries for a constituent, sorted ascending by level.
    #[must_use]
    pub fn specs(&self, constituent: &str) -> Option<&[SpecEntry]> {
        self.constituents
            .get(constituent)
            .map(Vec::as_slice)
    }

    /// Per-unit rate of one spec level of a constituent.
    #[must_use]
    pub fn rate_for(&self, constituent: &str, level: u8) -> Option<f64> {
        self.specs(constituent)?
            .iter()
            .find(|entry| entry.level == level)
            .map(|entry| entry.rate)
    }

    /// Number of constituents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.constituent_list.len()
    }

    /// Whether the template has no constituents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constituent_list.is_empty()
    }
}

/// A spec level is valid if it is a single digit 1–9.
fn parse_spec_level(spec: &str) -> Option<u8> {
    let mut chars = spec.chars();
    let digit = chars.next()?;

    if chars.next().is_some() {
        return None;
    }

    let level = digit.to_digit(10)?;

    (level >= 1).then_some(u8::try_from(level).ok()?)
}

/// A rate is valid if it is a positive integer.
fn parse_rate(rate: &str) -> Option<f64> {
    let value: f64 = rate.parse().ok()?;

    (value > 0.0 && value.fract().abs() < f64::EPSILON).then_some(value)
}

/// Splits a newline-separated cell into trimmed, non-empty lines.
fn split_lines(cell: &str) -> Vec<String> {
    cell.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
