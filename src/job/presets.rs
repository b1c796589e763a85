//! The planulae figures, as ready-made jobs.

use std::path::PathBuf;

use super::{DataSource, GroupSpec, JobConfig, OutputSpec};
use crate::color::{HF_GREEN, NF_RED, PF_ORANGE};
use crate::data::clean::CleanOptions;
use crate::data::model::{CellValue, ColumnMap, Table};
use crate::figure::{FigureStyle, LetterOffset, YAxis};
use crate::stats::{Comparison, Variance};

pub const PRESET_NAMES: [&str; 4] = ["release", "volume", "gfp", "respiration"];

pub fn by_name(name: &str) -> Option<JobConfig> {
    match name {
        "release" => Some(release_by_morph()),
        "volume" => Some(volume_by_morph(PathBuf::from("Planulae size.csv"))),
        "gfp" => Some(gfp_intensity(PathBuf::from("GFP_raw_sum_normalized.csv"))),
        "respiration" => Some(respiration_rate(PathBuf::from("respiration.csv"))),
        _ => None,
    }
}

fn two_morphs(hf_letter: &str, nf_letter: &str) -> Vec<GroupSpec> {
    vec![
        GroupSpec::new("HF", HF_GREEN, hf_letter),
        GroupSpec::new("NF", NF_RED, nf_letter),
    ]
}

fn hf_vs_nf() -> Comparison {
    Comparison::TTest {
        groups: [String::from("HF"), String::from("NF")],
        variance: Variance::Equal,
    }
}

// ---------------------------------------------------------------------------
// Release by morph: 8 colonies × 3 morphs, counts per colony turned into %.
// ---------------------------------------------------------------------------

static COLONIES: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

static RELEASE_COUNTS: [(&str, [i64; 8]); 3] = [
    ("HF", [199, 23, 621, 57, 5, 16, 9, 5]),
    ("PF", [164, 22, 950, 39, 4, 10, 2, 4]),
    ("NF", [30, 13, 505, 15, 6, 8, 4, 2]),
];

pub fn release_table() -> Table {
    let rows = RELEASE_COUNTS
        .iter()
        .flat_map(|(morph, counts)| {
            COLONIES.iter().zip(counts).map(move |(colony, count)| {
                vec![
                    CellValue::String(colony.to_string()),
                    CellValue::String(morph.to_string()),
                    CellValue::Integer(*count),
                ]
            })
        })
        .collect();

    Table {
        columns: vec!["Colony".into(), "Morph".into(), "Total Release".into()],
        rows,
    }
}

/// Letters and p-value come from a one-way ANOVA run in JMP.
pub fn release_by_morph() -> JobConfig {
    JobConfig {
        name: "Planulae_Release_by_morph".into(),
        source: DataSource::Inline(release_table()),
        columns: ColumnMap {
            value: "Total Release".into(),
            group: "Morph".into(),
            key: Some("Colony".into()),
        },
        clean: CleanOptions::default(),
        percent_of_key_total: true,
        groups: vec![
            GroupSpec::new("HF", HF_GREEN, "a"),
            GroupSpec::new("PF", PF_ORANGE, "ab"),
            GroupSpec::new("NF", NF_RED, "b"),
        ],
        comparison: Comparison::External { p_value: 0.0028 },
        style: FigureStyle {
            title: "Planulae released by morph\n(Ambient Conditions)".into(),
            y_label: "Release (%)".into(),
            width_in: 5.0,
            box_width: 0.7,
            point_size: 6.0,
            point_alpha: 0.7,
            mean_marker_size: 6.3,
            letter_offset: LetterOffset::Absolute(5.0),
            y_axis: YAxis {
                max: Some(85.0),
                tick_step: Some(20.0),
                ..YAxis::default()
            },
            ..FigureStyle::default()
        },
        output: OutputSpec::default(),
    }
}

// ---------------------------------------------------------------------------
// Two-morph t-test figures read from files
// ---------------------------------------------------------------------------

/// Samples 135 and 148 are excluded from the volume analysis.
pub fn volume_by_morph(path: PathBuf) -> JobConfig {
    JobConfig {
        name: "Volume_by_morph".into(),
        source: DataSource::File(path),
        columns: ColumnMap {
            value: "Volume mm³".into(),
            group: "morph".into(),
            key: Some("no".into()),
        },
        clean: CleanOptions::excluding([CellValue::Integer(135), CellValue::Integer(148)]),
        percent_of_key_total: false,
        groups: two_morphs("a", "b"),
        comparison: hf_vs_nf(),
        style: FigureStyle {
            title: "Volume distribution of different planulae morphs".into(),
            y_label: "Volume (mm³)".into(),
            p_value_position: (1.0, -0.1),
            y_axis: YAxis {
                min: Some(0.1),
                tick_step: Some(0.3),
                tick_start: Some(0.1),
                ..YAxis::default()
            },
            ..FigureStyle::default()
        },
        output: OutputSpec::default(),
    }
}

pub fn gfp_intensity(path: PathBuf) -> JobConfig {
    JobConfig {
        name: "GFP Intensity by Morph".into(),
        source: DataSource::File(path),
        columns: ColumnMap {
            value: "Intensity_per_µm2".into(),
            group: "Variant".into(),
            key: None,
        },
        clean: CleanOptions::default(),
        percent_of_key_total: false,
        groups: two_morphs("a", "b"),
        comparison: hf_vs_nf(),
        style: FigureStyle {
            title: "GFP Intensity by Morph".into(),
            y_label: "Intensity per µm²".into(),
            box_width: 0.6,
            y_axis: YAxis {
                tick_step: Some(100.0),
                ..YAxis::default()
            },
            ..FigureStyle::default()
        },
        output: OutputSpec::default(),
    }
}

/// Same letter for both morphs: the rates do not differ.
pub fn respiration_rate(path: PathBuf) -> JobConfig {
    JobConfig {
        name: "Respiration_Rate_by_Morph".into(),
        source: DataSource::File(path),
        columns: ColumnMap {
            value: "rate umol/mm3/min".into(),
            group: "morph".into(),
            key: None,
        },
        clean: CleanOptions::default(),
        percent_of_key_total: false,
        groups: two_morphs("a", "a"),
        comparison: hf_vs_nf(),
        style: FigureStyle {
            title: "Respiration rate distribution of different planulae morphs".into(),
            y_label: "Respiration rate (µmol/mm³/min)".into(),
            p_value_position: (1.0, -0.1),
            y_axis: YAxis {
                tick_step: Some(1.0),
                ..YAxis::default()
            },
            ..FigureStyle::default()
        },
        output: OutputSpec::default(),
    }
}
