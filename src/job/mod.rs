use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::color::GroupPalette;
use crate::data::clean::{clean, CleanOptions};
use crate::data::derive::percent_of_key_total;
use crate::data::loader::load_file;
use crate::data::model::{ColumnMap, Dataset, Table};
use crate::error::{LoadError, PipelineError};
use crate::export::{Exporter, ImageFormat};
use crate::figure::{compose, FigureStyle};
use crate::stats::{Comparison, ComparisonResult, GroupSummary, GroupedValues, SignificanceLetters};

pub mod presets;

// ---------------------------------------------------------------------------
// Job configuration
// ---------------------------------------------------------------------------

/// Where the rows come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    File(PathBuf),
    Inline(Table),
}

impl DataSource {
    pub fn load(&self) -> Result<Table, LoadError> {
        match self {
            DataSource::File(path) => load_file(path),
            DataSource::Inline(table) => Table::from_literal(table.columns.clone(), table.rows.clone()),
        }
    }
}

/// One plotted group, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub label: String,
    /// `#rrggbb`; generated when absent.
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub letter: Option<String>,
}

impl GroupSpec {
    pub fn new(label: &str, color: &str, letter: &str) -> Self {
        GroupSpec {
            label: label.to_string(),
            color: Some(color.to_string()),
            letter: Some(letter.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSpec {
    pub dir: PathBuf,
    pub formats: Vec<ImageFormat>,
    pub dpi: f64,
}

impl Default for OutputSpec {
    fn default() -> Self {
        OutputSpec {
            dir: PathBuf::from("."),
            formats: vec![ImageFormat::Svg, ImageFormat::Tiff, ImageFormat::Png],
            dpi: 600.0,
        }
    }
}

/// A complete figure: data source, cleaning, statistic, styling and output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Base name of the written files.
    pub name: String,
    pub source: DataSource,
    pub columns: ColumnMap,
    #[serde(default)]
    pub clean: CleanOptions,
    /// Convert values to percent of their key's total after cleaning.
    #[serde(default)]
    pub percent_of_key_total: bool,
    pub groups: Vec<GroupSpec>,
    pub comparison: Comparison,
    #[serde(default)]
    pub style: FigureStyle,
    #[serde(default)]
    pub output: OutputSpec,
}

impl JobConfig {
    /// Read a JSON job file. A relative data file path is taken relative to
    /// the job file's directory.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut job: JobConfig = serde_json::from_str(&text)?;

        if let DataSource::File(data) = &mut job.source {
            if data.is_relative() {
                if let Some(parent) = path.parent() {
                    *data = parent.join(&*data);
                }
            }
        }
        Ok(job)
    }

    pub fn group_order(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.label.clone()).collect()
    }

    /// Letters for every group that has one; `None` when no group does.
    pub fn letters(&self) -> Option<SignificanceLetters> {
        if self.groups.iter().all(|g| g.letter.is_none()) {
            return None;
        }
        Some(
            self.groups
                .iter()
                .filter_map(|g| g.letter.as_ref().map(|l| (g.label.clone(), l.clone())))
                .collect(),
        )
    }

    pub fn colors(&self) -> BTreeMap<String, String> {
        self.groups
            .iter()
            .filter_map(|g| g.color.as_ref().map(|c| (g.label.clone(), c.clone())))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Running a job
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct JobReport {
    pub name: String,
    pub rows: usize,
    pub summaries: Vec<GroupSummary>,
    pub comparison: ComparisonResult,
    pub files: Vec<PathBuf>,
}

/// Load, clean and (optionally) derive the dataset of a job.
pub fn prepare(job: &JobConfig) -> Result<Dataset, PipelineError> {
    let table = job.source.load()?;
    let raw = Dataset::from_table(&table, &job.columns)?;
    let dataset = clean(&raw, &job.clean);
    info!("{}: {} of {} rows kept after cleaning", job.name, dataset.len(), raw.len());

    if job.percent_of_key_total {
        return Ok(percent_of_key_total(&dataset)?);
    }
    Ok(dataset)
}

/// Run the whole pipeline for one job and write its figures.
pub fn run_job(job: &JobConfig) -> Result<JobReport, PipelineError> {
    let dataset = prepare(job)?;

    let order = job.group_order();
    let grouped = GroupedValues::partition(&dataset, &order);
    let comparison = job.comparison.evaluate(&grouped)?;
    info!("{}: {:?} p = {:.6}", job.name, comparison.method, comparison.p_value);

    let letters = job.letters();
    let palette = GroupPalette::new(&order, &job.colors())?;
    let figure = compose(&grouped, &comparison, letters.as_ref(), &palette, &job.style)?;

    let exporter = Exporter::new(job.output.dpi, job.style.width_in, job.style.height_in);
    let files = exporter.export(&figure, &job.output.dir, &job.name, &job.output.formats)?;

    Ok(JobReport {
        name: job.name.clone(),
        rows: dataset.len(),
        summaries: figure.groups.into_iter().map(|g| g.summary).collect(),
        comparison,
        files,
    })
}
