//! Strictly sequential job scheduling.
//!
//! The [`Runner`] owns a FIFO queue of jobs and executes them one at a time.
//! The process-wide current directory is the one shared mutable resource: it
//! is acquired for exactly one job's execution window through an RAII scope
//! that restores the previous directory on every exit path, including error
//! returns from dependency resolution and post-processing.
//!
//! Failures are isolated per job: a job whose dependency resolution, external
//! command, or post-processing fails is yielded with `success = false` and
//! the error attached, and the rest of the queue still runs.

use super::config::EngineConfig;
use super::error::EngineError;
use super::job::Job;
use super::progress::{Progress, ProgressReporter};
use std::collections::VecDeque;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use std::{env, fs, io, thread};

/// How often a timed subprocess is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Scoped acquisition of the process-wide working directory. Restores the
/// previous directory on drop.
#[derive(Debug)]
struct WorkingDirectory {
    previous: PathBuf,
}

impl WorkingDirectory {
    fn enter(directory: Option<&Path>, create: bool) -> io::Result<Self> {
        let previous = env::current_dir()?;
        if let Some(dir) = directory {
            if create && !dir.exists() {
                fs::create_dir_all(dir)?;
            }
            env::set_current_dir(dir)?;
        }
        Ok(Self { previous })
    }
}

impl Drop for WorkingDirectory {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Single-worker scheduler over an ordered queue of jobs.
pub struct Runner<'a> {
    queue: VecDeque<Job>,
    config: EngineConfig,
    reporter: ProgressReporter<'a>,
}

impl Default for Runner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Runner<'a> {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        // the queue is owned per instance; independent runners never share
        // state
        Self {
            queue: VecDeque::new(),
            config,
            reporter: ProgressReporter::new(),
        }
    }

    pub fn set_reporter(&mut self, reporter: ProgressReporter<'a>) {
        self.reporter = reporter;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Appends a job at the tail of the queue. Names need not be unique.
    pub fn enqueue(&mut self, job: Job) {
        self.queue.push_back(job);
    }

    pub fn enqueue_many(&mut self, jobs: impl IntoIterator<Item = Job>) {
        for job in jobs {
            self.enqueue(job);
        }
    }

    /// The number of jobs still waiting to run.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Drains the queue, yielding one `(job, success)` pair per queued job in
    /// strict enqueue order. The sequence is lazy and not restartable;
    /// dropping it early leaves the remaining jobs queued and untouched.
    pub fn run(&mut self) -> Run<'_, 'a> {
        self.reporter.report(Progress::QueueStart {
            total: self.queue.len() as u64,
        });
        Run {
            runner: self,
            finished: false,
        }
    }

    /// Runs a single job inside its working-directory scope. Every failure
    /// path marks the job failed and returns; the guard restores the
    /// previous directory regardless.
    fn execute(&self, job: &mut Job) -> bool {
        let _scope = match WorkingDirectory::enter(
            job.working_directory(),
            job.create_working_directory(),
        ) {
            Ok(scope) => scope,
            Err(e) => {
                job.fail(EngineError::Io(e));
                return false;
            }
        };

        if job.has_dependencies()
            && let Err(e) = job.resolve_dependencies()
        {
            job.fail(e);
            return false;
        }

        let (success, stdout) = match invoke(job, &self.config) {
            Ok(outcome) => outcome,
            Err(e) => {
                job.fail(e);
                return false;
            }
        };
        job.record_execution(stdout);

        if success
            && job.requires_postprocessing()
            && let Err(e) = job.post_process()
        {
            job.fail(e);
            return false;
        }

        job.finish(success);
        success
    }
}

/// The lazy result sequence produced by [`Runner::run`].
pub struct Run<'r, 'a> {
    runner: &'r mut Runner<'a>,
    finished: bool,
}

impl Iterator for Run<'_, '_> {
    type Item = (Job, bool);

    fn next(&mut self) -> Option<Self::Item> {
        let Some(mut job) = self.runner.queue.pop_front() else {
            if !self.finished {
                self.finished = true;
                self.runner.reporter.report(Progress::QueueFinish);
            }
            return None;
        };
        self.runner.reporter.report(Progress::JobStart {
            name: job.name().to_string(),
        });
        let success = self.runner.execute(&mut job);
        self.runner.reporter.report(Progress::JobFinish {
            name: job.name().to_string(),
            success,
        });
        Some((job, success))
    }
}

/// Synchronously runs the job's command, optionally through a shell and
/// optionally capturing stdout. Returns whether the exit code was zero.
fn invoke(job: &Job, config: &EngineConfig) -> Result<(bool, Option<String>), EngineError> {
    let argv = job.command();
    let mut command = if job.requires_shell() {
        let mut c = Command::new("sh");
        c.arg("-c").arg(argv.join(" "));
        c
    } else {
        let mut c = Command::new(&argv[0]);
        c.args(&argv[1..]);
        c
    };
    if job.capture_stdout() {
        command.stdout(Stdio::piped());
    }

    let mut child = command.spawn().map_err(|source| EngineError::Spawn {
        command: argv.join(" "),
        source,
    })?;

    // the pipe is drained on its own thread; a chatty child must never be
    // able to fill it and block while we wait or poll for the deadline
    let reader = child.stdout.take().map(|mut pipe| {
        thread::spawn(move || -> io::Result<String> {
            let mut buffer = String::new();
            pipe.read_to_string(&mut buffer)?;
            Ok(buffer)
        })
    });

    let status = match config.timeout() {
        None => child.wait()?,
        Some(limit) => {
            let deadline = Instant::now() + limit;
            loop {
                if let Some(status) = child.try_wait()? {
                    break status;
                }
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(EngineError::Timeout {
                        seconds: limit.as_secs(),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    let stdout = match reader {
        Some(handle) => match handle.join() {
            Ok(buffer) => Some(buffer?),
            Err(_) => {
                return Err(EngineError::Io(io::Error::other(
                    "stdout reader thread panicked",
                )));
            }
        },
        None => None,
    };
    Ok((status.success(), stdout))
}
