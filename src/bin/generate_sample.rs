//! Writes synthetic input files for the `volume`, `gfp` and `respiration`
//! presets into the given directory (default: the working directory).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Box-Muller transform for a normal deviate.
fn gauss(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-15);
    let u2: f64 = rng.random();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + std_dev * z
}

fn write_csv(path: &Path, header: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)?;
    let mut rng = StdRng::seed_from_u64(42);

    // Volumes per planula; 135 and 148 are measurement failures.
    let mut rows = Vec::new();
    for no in 100..160 {
        let (morph, mean, sd) = if no % 2 == 0 { ("HF", 0.85, 0.18) } else { ("NF", 0.55, 0.15) };
        let volume = match no {
            135 | 148 => 4.2,
            _ => gauss(&mut rng, mean, sd).max(0.12),
        };
        // Stray whitespace and a missing measurement, as in hand-kept sheets.
        let label = if no % 11 == 0 { format!("{morph} ") } else { morph.to_string() };
        let cell = if no == 151 { String::new() } else { format!("{volume:.4}") };
        rows.push(vec![no.to_string(), label, cell]);
    }
    write_csv(&dir.join("Planulae size.csv"), &["no", "morph", "Volume mm³"], rows)?;

    let rows = (0..24)
        .map(|i| {
            let (variant, mean) = if i < 12 { ("HF", 420.0) } else { ("NF", 310.0) };
            vec![variant.to_string(), format!("{:.2}", gauss(&mut rng, mean, 60.0).max(1.0))]
        })
        .collect();
    write_csv(&dir.join("GFP_raw_sum_normalized.csv"), &["Variant", "Intensity_per_µm2"], rows)?;

    let rows = (0..20)
        .map(|i| {
            let morph = if i % 2 == 0 { "HF" } else { "NF" };
            vec![morph.to_string(), format!("{:.3}", gauss(&mut rng, 2.4, 0.6).max(0.1))]
        })
        .collect();
    write_csv(&dir.join("respiration.csv"), &["morph", "rate umol/mm3/min"], rows)?;

    Ok(())
}
