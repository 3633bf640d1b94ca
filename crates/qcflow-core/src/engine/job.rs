//! The unit of work handed to the runner.
//!
//! A [`Job`] is a single record composed of optional capabilities rather
//! than a class hierarchy: boolean flags fixed at construction decide which
//! lifecycle steps run, and the steps that vary per engine (input rendering,
//! output reading) are injected strategy objects. Method and basis-set names
//! are validated when the job is built, before any I/O.

use super::error::EngineError;
use super::template::{InputRenderer, RenderContext, SinglePointDeck};
use crate::core::io::log::{LogFile, SpinComponents};
use crate::core::methods::{self, Method, MethodCategory};
use crate::core::models::geometry::Geometry;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a job is in its lifecycle. `Failed` is reachable from every
/// transition; the two optional states are skipped when the corresponding
/// capability flag is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Created,
    DependenciesResolved,
    Executed,
    PostProcessed,
    Done,
    Failed,
}

/// The extracted result of a finished job. Method-dependent: a scalar
/// energy for most methods, the spin-component table when the caller wants
/// to derive scaled variants from an MP2 run.
#[derive(Debug, Clone, PartialEq)]
pub enum JobResult {
    Energy(f64),
    SpinComponents(SpinComponents),
}

impl JobResult {
    /// The scalar energy, when this result is one.
    pub fn energy(&self) -> Option<f64> {
        match self {
            JobResult::Energy(e) => Some(*e),
            JobResult::SpinComponents(_) => None,
        }
    }
}

/// The injected output-reading strategy used during post-processing.
pub trait OutputReader {
    fn read(&self, path: &Path, method: &'static Method) -> Result<JobResult, EngineError>;
}

/// Default reader: the primary energy of the log. Correlated ab-initio
/// methods read their archive keyword; everything else reads the SCF marker.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnergyReader;

impl OutputReader for EnergyReader {
    fn read(&self, path: &Path, method: &'static Method) -> Result<JobResult, EngineError> {
        let log = LogFile::open(path)?;
        let energy = if method.category == MethodCategory::AbInitio && method.keywords != "HF" {
            log.correlated_energy(method.keywords)?
        } else {
            log.scf_energy()?
        };
        Ok(JobResult::Energy(energy))
    }
}

/// Reader for parent MP2 jobs whose spin components feed derived methods.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpinComponentReader;

impl OutputReader for SpinComponentReader {
    fn read(&self, path: &Path, _method: &'static Method) -> Result<JobResult, EngineError> {
        let log = LogFile::open(path)?;
        Ok(JobResult::SpinComponents(log.spin_components()?))
    }
}

/// A stateful unit of work: one external-engine invocation plus its
/// optional dependency-resolution and post-processing steps.
///
/// Mutated only by the runner during execution; once the caller receives it
/// back from [`super::runner::Runner::run`] it is inspected and discarded.
pub struct Job {
    name: String,
    method: &'static Method,
    basis_set: String,
    geometry: Option<Geometry>,
    executable: PathBuf,
    argv: Option<Vec<String>>,
    working_directory: Option<PathBuf>,
    create_working_directory: bool,

    has_dependencies: bool,
    requires_postprocessing: bool,
    capture_stdout: bool,
    requires_shell: bool,

    renderer: Box<dyn InputRenderer>,
    reader: Box<dyn OutputReader>,
    input_extension: String,
    output_extension: String,

    input_file: Option<String>,
    output_file: Option<String>,
    stdout: Option<String>,
    result: Option<JobResult>,
    state: JobState,
    success: bool,
    failure: Option<EngineError>,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("name", &self.name)
            .field("method", &self.method.name)
            .field("basis_set", &self.basis_set)
            .field("state", &self.state)
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}

impl Job {
    /// Starts building a job with the given name.
    pub fn builder(name: impl Into<String>) -> JobBuilder {
        JobBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the job. The name seeds the canonical input/output filenames,
    /// so renaming after dependency resolution has no effect on them.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn method(&self) -> &'static Method {
        self.method
    }

    pub fn basis_set(&self) -> &str {
        &self.basis_set
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Whether the job ran to completion successfully.
    pub fn success(&self) -> bool {
        self.success
    }

    /// The extracted result. Undefined (i.e. `None`) until the job succeeded
    /// and post-processing has run.
    pub fn result(&self) -> Option<&JobResult> {
        self.result.as_ref()
    }

    /// Standard output captured during execution, when the capability flag
    /// asked for it.
    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    /// The error that failed this job, if any.
    pub fn failure(&self) -> Option<&EngineError> {
        self.failure.as_ref()
    }

    pub fn has_dependencies(&self) -> bool {
        self.has_dependencies
    }

    pub fn requires_postprocessing(&self) -> bool {
        self.requires_postprocessing
    }

    pub fn capture_stdout(&self) -> bool {
        self.capture_stdout
    }

    pub fn requires_shell(&self) -> bool {
        self.requires_shell
    }

    pub fn working_directory(&self) -> Option<&Path> {
        self.working_directory.as_deref()
    }

    pub fn create_working_directory(&self) -> bool {
        self.create_working_directory
    }

    pub fn input_file(&self) -> Option<&str> {
        self.input_file.as_deref()
    }

    pub fn output_file(&self) -> Option<&str> {
        self.output_file.as_deref()
    }

    /// The canonical basename filenames are derived from, e.g.
    /// `h2o_b3lyp_cc-pVDZ`.
    pub fn default_basename(&self) -> String {
        format!("{}_{}_{}", self.name, self.method.name, self.basis_set)
    }

    /// The argument vector handed to the subprocess.
    pub fn command(&self) -> Vec<String> {
        if let Some(argv) = &self.argv {
            return argv.clone();
        }
        let mut argv = vec![self.executable.display().to_string()];
        if let Some(input) = &self.input_file {
            argv.push(input.clone());
        }
        argv
    }

    /// Derives the canonical filenames and writes the input deck through the
    /// injected renderer. Called at most once per run, by the runner, inside
    /// the job's working directory.
    pub(crate) fn resolve_dependencies(&mut self) -> Result<(), EngineError> {
        let base = self.default_basename();
        let input = format!("{base}{}", self.input_extension);
        let context = RenderContext {
            name: &self.name,
            method: self.method,
            basis_set: &self.basis_set,
            geometry: self.geometry.as_ref(),
        };
        let deck = self.renderer.render(&context)?;
        fs::write(&input, deck)?;
        self.input_file = Some(input);
        self.output_file = Some(format!("{base}{}", self.output_extension));
        self.state = JobState::DependenciesResolved;
        Ok(())
    }

    /// Reads the output file through the injected reader and stores the
    /// result. A missing file or missing marker fails this job only.
    pub(crate) fn post_process(&mut self) -> Result<(), EngineError> {
        let output = self
            .output_file
            .clone()
            .ok_or_else(|| EngineError::MissingOutput {
                name: self.name.clone(),
            })?;
        let result = self.reader.read(Path::new(&output), self.method)?;
        self.result = Some(result);
        self.state = JobState::PostProcessed;
        Ok(())
    }

    pub(crate) fn record_execution(&mut self, stdout: Option<String>) {
        self.stdout = stdout;
        self.state = JobState::Executed;
    }

    pub(crate) fn finish(&mut self, success: bool) {
        self.success = success;
        self.state = if success {
            JobState::Done
        } else {
            JobState::Failed
        };
    }

    pub(crate) fn fail(&mut self, error: EngineError) {
        self.failure = Some(error);
        self.success = false;
        self.state = JobState::Failed;
    }
}

/// Builder for [`Job`]; validates the method and basis set when building.
pub struct JobBuilder {
    name: String,
    method: String,
    basis_set: String,
    geometry: Option<Geometry>,
    executable: PathBuf,
    argv: Option<Vec<String>>,
    working_directory: Option<PathBuf>,
    create_working_directory: bool,
    has_dependencies: bool,
    requires_postprocessing: bool,
    capture_stdout: bool,
    requires_shell: bool,
    renderer: Box<dyn InputRenderer>,
    reader: Box<dyn OutputReader>,
    input_extension: String,
    output_extension: String,
}

impl JobBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method: "hf".to_string(),
            basis_set: "6-31G".to_string(),
            geometry: None,
            executable: PathBuf::from("g09"),
            argv: None,
            working_directory: None,
            create_working_directory: false,
            has_dependencies: true,
            requires_postprocessing: true,
            capture_stdout: false,
            requires_shell: false,
            renderer: Box::new(SinglePointDeck),
            reader: Box::new(EnergyReader),
            input_extension: ".gjf".to_string(),
            output_extension: ".log".to_string(),
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn basis_set(mut self, basis_set: impl Into<String>) -> Self {
        self.basis_set = basis_set.into();
        self
    }

    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    /// Overrides the full argument vector, for jobs that run an arbitrary
    /// command instead of the engine.
    pub fn raw_command(mut self, argv: Vec<String>) -> Self {
        self.argv = Some(argv);
        self
    }

    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn create_working_directory(mut self, create: bool) -> Self {
        self.create_working_directory = create;
        self
    }

    pub fn has_dependencies(mut self, value: bool) -> Self {
        self.has_dependencies = value;
        self
    }

    pub fn requires_postprocessing(mut self, value: bool) -> Self {
        self.requires_postprocessing = value;
        self
    }

    pub fn capture_stdout(mut self, value: bool) -> Self {
        self.capture_stdout = value;
        self
    }

    pub fn requires_shell(mut self, value: bool) -> Self {
        self.requires_shell = value;
        self
    }

    pub fn renderer(mut self, renderer: Box<dyn InputRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn reader(mut self, reader: Box<dyn OutputReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn extensions(
        mut self,
        input_extension: impl Into<String>,
        output_extension: impl Into<String>,
    ) -> Self {
        self.input_extension = input_extension.into();
        self.output_extension = output_extension.into();
        self
    }

    /// Validates the configuration and builds the job. Fails fast on an
    /// unknown method, an invalid basis-set name, or a derived method that
    /// must not run on its own.
    pub fn build(self) -> Result<Job, EngineError> {
        let method = Method::lookup(&self.method)?;
        if let Some(parent) = method.redundancy {
            return Err(EngineError::RedundantMethod {
                name: method.name.to_string(),
                parent: parent.to_string(),
            });
        }
        methods::validate_basis_set(&self.basis_set)?;
        if let Some(argv) = &self.argv
            && argv.is_empty()
        {
            return Err(EngineError::EmptyCommand {
                name: self.name.clone(),
            });
        }
        Ok(Job {
            name: self.name,
            method,
            basis_set: self.basis_set,
            geometry: self.geometry,
            executable: self.executable,
            argv: self.argv,
            working_directory: self.working_directory,
            create_working_directory: self.create_working_directory,
            has_dependencies: self.has_dependencies,
            requires_postprocessing: self.requires_postprocessing,
            capture_stdout: self.capture_stdout,
            requires_shell: self.requires_shell,
            renderer: self.renderer,
            reader: self.reader,
            input_extension: self.input_extension,
            output_extension: self.output_extension,
            input_file: None,
            output_file: None,
            stdout: None,
            result: None,
            state: JobState::default(),
            success: false,
            failure: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::methods::MethodError;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;
    use serial_test::serial;

    fn water() -> Geometry {
        Geometry::new(
            vec![
                Atom::from_symbol("O", Point3::new(0.0, 0.0, 0.11779)).unwrap(),
                Atom::from_symbol("H", Point3::new(0.0, 0.75545, -0.47116)).unwrap(),
                Atom::from_symbol("H", Point3::new(0.0, -0.75545, -0.47116)).unwrap(),
            ],
            0,
            1,
        )
    }

    #[test]
    fn builder_validates_before_any_io() {
        let err = Job::builder("x").method("mp17").build().unwrap_err();
        assert!(matches!(
            err,
            EngineError::Method(MethodError::UnknownMethod(_))
        ));

        let err = Job::builder("x").basis_set("nonsense").build().unwrap_err();
        assert!(matches!(
            err,
            EngineError::Method(MethodError::InvalidBasisSet(_))
        ));
    }

    #[test]
    fn redundant_methods_cannot_be_submitted() {
        let err = Job::builder("x").method("scs-mp2").build().unwrap_err();
        match err {
            EngineError::RedundantMethod { name, parent } => {
                assert_eq!(name, "scs-mp2");
                assert_eq!(parent, "mp2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_raw_command_is_rejected() {
        let err = Job::builder("x").raw_command(Vec::new()).build().unwrap_err();
        assert!(matches!(err, EngineError::EmptyCommand { .. }));
    }

    #[test]
    fn default_basename_combines_name_method_basis() {
        let job = Job::builder("h2o")
            .method("b3lyp")
            .basis_set("cc-pVDZ")
            .geometry(water())
            .build()
            .unwrap();
        assert_eq!(job.default_basename(), "h2o_b3lyp_cc-pVDZ");
        assert_eq!(job.state(), JobState::Created);
        assert!(!job.success());
        assert!(job.result().is_none());
    }

    #[test]
    #[serial]
    fn resolve_dependencies_writes_the_deck() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = Job::builder("h2o")
            .geometry(water())
            .build()
            .unwrap();

        let deck_path = dir.path().join("h2o_hf_6-31G.gjf");
        // resolve in a scratch directory without going through the runner
        let before = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let resolved = job.resolve_dependencies();
        std::env::set_current_dir(before).unwrap();
        resolved.unwrap();

        assert_eq!(job.input_file(), Some("h2o_hf_6-31G.gjf"));
        assert_eq!(job.output_file(), Some("h2o_hf_6-31G.log"));
        assert_eq!(job.state(), JobState::DependenciesResolved);
        let deck = std::fs::read_to_string(deck_path).unwrap();
        assert!(deck.starts_with("#P HF/6-31G"));
    }

    #[test]
    fn command_uses_executable_and_input_file() {
        let mut job = Job::builder("h2o")
            .executable("/opt/g09/g09")
            .geometry(water())
            .build()
            .unwrap();
        assert_eq!(job.command(), vec!["/opt/g09/g09".to_string()]);
        job.input_file = Some("h2o_hf_6-31G.gjf".to_string());
        assert_eq!(
            job.command(),
            vec!["/opt/g09/g09".to_string(), "h2o_hf_6-31G.gjf".to_string()]
        );

        let raw = Job::builder("check")
            .raw_command(vec!["echo".into(), "ok".into()])
            .build()
            .unwrap();
        assert_eq!(raw.command(), vec!["echo".to_string(), "ok".to_string()]);
    }

    #[test]
    fn post_process_without_output_file_fails() {
        let mut job = Job::builder("h2o").geometry(water()).build().unwrap();
        let err = job.post_process().unwrap_err();
        assert!(matches!(err, EngineError::MissingOutput { .. }));
    }

    #[test]
    #[serial]
    fn renaming_does_not_change_resolved_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = Job::builder("first").geometry(water()).build().unwrap();
        let before = std::env::current_dir().unwrap();
        std::env::set_current_dir(dir.path()).unwrap();
        let resolved = job.resolve_dependencies();
        std::env::set_current_dir(before).unwrap();
        resolved.unwrap();

        job.set_name("second");
        assert_eq!(job.name(), "second");
        assert_eq!(job.input_file(), Some("first_hf_6-31G.gjf"));
    }
}
