//! Run command - every path of a menu over every event of a file

use anyhow::{Context as _, Result};
use clap::Args;
use jetmet_core::{BulkExecutor, BulkResult, Context, PathExecutor};
use jetmet_trigger::{default_registry, read_events_file};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args)]
pub struct RunCommand {
    /// Menu YAML file
    #[arg(long)]
    menu: PathBuf,

    /// Events, one JSON object per line
    #[arg(long)]
    events: PathBuf,

    /// Worker threads (default: all CPUs)
    #[arg(long)]
    threads: Option<usize>,

    /// Write per-event results as JSON lines
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log every module result and keep produced collections in the output
    #[arg(long)]
    debug: bool,
}

impl RunCommand {
    pub fn execute(self) -> Result<()> {
        let mut registry = default_registry();
        registry
            .load_menu_file(&self.menu)
            .with_context(|| format!("Failed to load menu {}", self.menu.display()))?;

        let events = read_events_file(&self.events)
            .with_context(|| format!("Failed to read events {}", self.events.display()))?;

        let context = if self.debug {
            Context::debug()
        } else {
            Context::bulk()
        };
        let executor = PathExecutor::new(&registry).with_context(context);

        let mut bulk = BulkExecutor::new();
        if let Some(threads) = self.threads {
            bulk = bulk.with_threads(threads);
        }

        info!(
            "Running {} path(s) over {} event(s) on {} thread(s)",
            registry.paths().len(),
            events.len(),
            bulk.threads()
        );
        let result = bulk.run(&executor, &events)?;

        if let Some(output) = &self.output {
            write_results(output, &result)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            info!("Results written to {}", output.display());
        }

        print_summary(&result);
        Ok(())
    }
}

fn write_results(path: &Path, result: &BulkResult) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for event in &result.results {
        serde_json::to_writer(&mut writer, event)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_summary(result: &BulkResult) {
    println!("{:<32} {:>10} {:>10} {:>8}", "PATH", "EVENTS", "ACCEPTED", "EFF");
    for path in &result.summary {
        println!(
            "{:<32} {:>10} {:>10} {:>7.1}%",
            path.name,
            path.events,
            path.accepted,
            path.efficiency() * 100.0
        );
    }
    println!(
        "\n{} event(s) in {:.2?}",
        result.results.len(),
        result.duration
    );
}
