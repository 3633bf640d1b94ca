//! Building batches of single-point jobs.

use crate::core::methods::Method;
use crate::core::models::geometry::Geometry;
use crate::engine::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::job::Job;
use std::path::Path;

/// Builds one single-point job per system and method, ready to enqueue.
///
/// Jobs inherit the engine executable and file extensions from the
/// configuration. With a working directory given, every job runs there and
/// the directory is created on demand. Fails fast on the first invalid
/// method or basis-set combination, before anything is queued.
pub fn single_point_jobs(
    systems: &[(String, Geometry)],
    methods: &[&'static Method],
    basis_set: &str,
    config: &EngineConfig,
    work_dir: Option<&Path>,
) -> Result<Vec<Job>, EngineError> {
    let mut jobs = Vec::with_capacity(systems.len() * methods.len());
    for (name, geometry) in systems {
        for &method in methods {
            let mut builder = Job::builder(name)
                .method(method.name)
                .basis_set(basis_set)
                .geometry(geometry.clone())
                .executable(&config.executable)
                .extensions(&config.input_extension, &config.output_extension);
            if let Some(dir) = work_dir {
                builder = builder.working_directory(dir).create_working_directory(true);
            }
            jobs.push(builder.build()?);
        }
    }
    Ok(jobs)
}
