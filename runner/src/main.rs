use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use processor::{format_logs, parse_input, Error, Processor};

mod config;
mod logger;

use config::Config;

fn input_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn simulate_file(config: &Config, path: &Path) -> Result<PathBuf, Error> {
    let workload = parse_input(&fs::read_to_string(path)?)?;
    info!(
        "{}: {} processes, quantum {}",
        path.display(),
        workload.processes.len(),
        workload.quantum
    );

    let logs = Processor::run(&workload, config.priority)?;

    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let output = config.output_dir.join(format!("{stem}_timeline.log"));
    fs::write(&output, format_logs(&logs))?;
    Ok(output)
}

fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    logger::init(config.log_level);

    fs::create_dir_all(&config.output_dir)?;
    let files = input_files(&config.input_dir)?;
    if files.is_empty() {
        warn!("no .txt inputs in {}", config.input_dir.display());
    }

    for path in files {
        let output = simulate_file(&config, &path)?;
        info!("timeline written to {}", output.display());
    }

    Ok(())
}

// Do not delete this line
#[cfg(test)]
mod tests;
