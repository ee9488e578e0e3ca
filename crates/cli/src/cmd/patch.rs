//! Implementation of the patch run.
//!
//! Runs the reconciliation and reports what it did: the patch feature-packs it
//! created, the artifact directories merged in from the repository patch, the
//! files removed from the original repository, and the written `patches.xml`.

use std::time::Instant;

use anyhow::Result;
use tracing::debug;

use repatch_lib::config::RunConfig;
use repatch_lib::run::run;
use repatch_lib::summary::RunSummary;

use crate::output::{
  OutputFormat, format_duration, print_info, print_item, print_json, print_section, print_stat,
  print_success, symbols,
};

pub fn cmd_patch(config: &RunConfig, output: OutputFormat) -> Result<()> {
  let start = Instant::now();
  debug!(packages = config.packages.len(), work_dir = %config.work_dir.display(), "starting run");

  let summary = run(config).map_err(|err| {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("Patching aborted ({kind})"))
  })?;

  if output.is_json() {
    return print_json(&summary);
  }

  print_summary(&summary);

  println!();
  print_success(&format!("Patched repository written to {}", summary.output.display()));
  print_stat("Patches created", &summary.patches.len().to_string());
  print_stat("Artifacts replaced", &summary.replacement_count().to_string());
  print_stat("Duration", &format_duration(start.elapsed()));

  Ok(())
}

fn print_summary(summary: &RunSummary) {
  print_section("Created patches");
  for patch in &summary.patches {
    print_item(symbols::ADD, &format!("patch {} for {}", patch.id, patch.source_archive));
    for replacement in &patch.replacements {
      println!("      {} {} {}", replacement.old, symbols::ARROW, replacement.new);
    }
  }

  print_section("Added artifacts");
  for dir in &summary.added {
    print_item(symbols::ADD, &format!("{}/*", dir.display()));
  }

  print_section("Deleted artifacts");
  if summary.deleted.dirs_removed.is_empty() && summary.deleted.files_removed.is_empty() {
    print_info("nothing deleted");
  }
  for dir in &summary.deleted.dirs_removed {
    print_item(symbols::REMOVE, &format!("{}/*", dir.display()));
  }
  for file in &summary.deleted.files_removed {
    print_item(symbols::REMOVE, &file.display().to_string());
  }

  print_section("Content of patches.xml");
  println!("{}", summary.manifest.trim_end());
}
