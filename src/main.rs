use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use morph_plot::job::{presets, run_job, JobConfig};

/// Each argument is a preset name or a JSON job file. Without arguments the
/// release-by-morph figure is written to the working directory.
fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let jobs = if args.is_empty() {
        vec![presets::release_by_morph()]
    } else {
        args.iter().map(|a| resolve(a)).collect::<Result<Vec<_>>>()?
    };

    for job in &jobs {
        info!("running job '{}'", job.name);
        let report = run_job(job).with_context(|| format!("job '{}' failed", job.name))?;

        println!("{} ({} rows)", report.name, report.rows);
        for s in &report.summaries {
            println!(
                "  {:<4} n = {:<3} mean = {:<10.4} max = {:.4}",
                s.label, s.count, s.mean, s.max
            );
        }
        match report.comparison.statistic {
            Some(t) => println!(
                "  {:?}: t = {t:.4}, p = {:.6}",
                report.comparison.method, report.comparison.p_value
            ),
            None => println!("  external p = {}", report.comparison.p_value),
        }
        for file in &report.files {
            println!("  wrote {}", file.display());
        }
    }
    Ok(())
}

fn resolve(arg: &str) -> Result<JobConfig> {
    if let Some(job) = presets::by_name(arg) {
        return Ok(job);
    }
    JobConfig::load(Path::new(arg)).with_context(|| {
        format!(
            "'{arg}' is neither a preset ({}) nor a readable job file",
            presets::PRESET_NAMES.join(", ")
        )
    })
}
