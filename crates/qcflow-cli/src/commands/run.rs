use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use qcflow::core::methods;
use qcflow::core::models::geometry::Geometry;
use qcflow::engine::config::EngineConfig;
use qcflow::engine::job::JobResult;
use qcflow::engine::progress::{Progress, ProgressReporter};
use qcflow::engine::runner::Runner;
use qcflow::workflows::batch;
use tracing::{info, warn};

pub fn run(args: RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_toml_file(path)?,
        None => EngineConfig::default(),
    };
    methods::validate_basis_set(&args.basis_set)
        .map_err(|e| CliError::Argument(e.to_string()))?;
    let selected = super::selected_methods(&args.methods)?;

    let mut systems = Vec::new();
    for path in super::files_with_extension(&args.geometries, "xyz")? {
        let geometry = Geometry::from_xyz_file(&path).map_err(|source| CliError::FileParsing {
            path: path.clone(),
            source,
        })?;
        systems.push((super::job_name(&path), geometry));
    }
    let jobs = batch::single_point_jobs(
        &systems,
        &selected,
        &args.basis_set,
        &config,
        args.work_dir.as_deref(),
    )?;

    let mut runner = Runner::with_config(config);
    runner.enqueue_many(jobs);
    info!("running {} jobs", runner.queued());

    let bar = ProgressBar::new(runner.queued() as u64);
    bar.set_style(
        ProgressStyle::with_template("{msg:<35} [{bar:40.cyan/blue}] {pos}/{len}")
            .map_err(|e| CliError::Argument(e.to_string()))?
            .progress_chars("━╸ "),
    );
    let events = bar.clone();
    runner.set_reporter(ProgressReporter::with_callback(Box::new(move |event| {
        match event {
            Progress::JobStart { name } => events.set_message(name),
            Progress::JobFinish { .. } => events.inc(1),
            Progress::Message(msg) => {
                events.println(msg);
            }
            Progress::QueueStart { .. } | Progress::QueueFinish => {}
        }
    })));

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    for (job, success) in runner.run() {
        if success {
            succeeded += 1;
            match job.result().and_then(JobResult::energy) {
                Some(energy) => {
                    bar.println(format!("{}  {energy:.10}", job.default_basename()))
                }
                None => info!("job '{}' finished without a scalar energy", job.name()),
            }
        } else {
            failed += 1;
            match job.failure() {
                Some(e) => warn!("job '{}' failed: {}", job.name(), e),
                None => warn!("job '{}' exited with a nonzero status", job.name()),
            }
        }
    }
    bar.finish_and_clear();

    println!("{succeeded} succeeded, {failed} failed");
    Ok(())
}
