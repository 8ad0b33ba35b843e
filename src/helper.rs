use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus};
use std::time::Duration;

use crossbeam_channel::{bounded, RecvTimeoutError};
use revision_bisect::{
    BuildArtifact, BuildConfig, BuildError, BuildOracle, ExecutionError, ReproductionOracle,
    Signal,
};

/// Default build invocation, run from the OSS-Fuzz checkout.
pub const DEFAULT_BUILD_CMD: &str = "python3 infra/helper.py build_fuzzers \
    --engine {engine} --sanitizer {sanitizer} --architecture {architecture} {project}";

/// Default reproduction invocation. Exit status 0 means the target ran the
/// testcase without crashing.
pub const DEFAULT_REPRO_CMD: &str = "python3 infra/helper.py reproduce {project} {fuzzer} {testcase}";

/// Infrastructure failures are retried this many times before giving up.
const REPRO_ATTEMPTS: usize = 3;

/// Expands `{name}` placeholders in a command template.
fn expand(template: &str, vars: &[(&str, &str)]) -> String {
    let mut cmd = template.to_string();
    for (name, value) in vars {
        cmd = cmd.replace(&format!("{{{name}}}"), value);
    }
    cmd
}

/// Build oracle shelling out to the helper tooling (or an override template).
pub struct HelperBuild {
    project: String,
    fuzzer: String,
    workdir: PathBuf,
    template: String,
}

impl HelperBuild {
    pub fn new(project: String, fuzzer: String, workdir: PathBuf, template: String) -> Self {
        HelperBuild {
            project,
            fuzzer,
            workdir,
            template,
        }
    }
}

impl BuildOracle for HelperBuild {
    fn build(&mut self, revision: &str, config: &BuildConfig) -> Result<BuildArtifact, BuildError> {
        let cmd = expand(
            &self.template,
            &[
                ("project", &self.project),
                ("fuzzer", &self.fuzzer),
                ("engine", &config.engine),
                ("sanitizer", &config.sanitizer),
                ("architecture", &config.architecture),
                ("revision", revision),
            ],
        );
        let status = Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .current_dir(&self.workdir)
            .status()
            .map_err(|e| BuildError {
                revision: revision.to_string(),
                reason: format!("failed to spawn `{cmd}`: {e}"),
            })?;
        if !status.success() {
            return Err(BuildError {
                revision: revision.to_string(),
                reason: format!("`{cmd}` exited with {status}"),
            });
        }
        Ok(BuildArtifact {
            project: self.project.clone(),
            fuzzer: self.fuzzer.clone(),
            revision: revision.to_string(),
        })
    }
}

/// Reproduction oracle shelling out to the helper tooling.
///
/// The target's exit status is the signal: 0 is a clean run, anything else a
/// crash classification. An optional wall-clock budget turns a hung run into
/// "no crash within budget" rather than an error.
pub struct HelperRepro {
    workdir: PathBuf,
    template: String,
    timeout: Option<Duration>,
}

impl HelperRepro {
    pub fn new(workdir: PathBuf, template: String, timeout: Option<Duration>) -> Self {
        HelperRepro {
            workdir,
            template,
            timeout,
        }
    }

    fn run_once(&self, artifact: &BuildArtifact, testcase: &Path) -> Result<Signal, ExecutionError> {
        let cmd = expand(
            &self.template,
            &[
                ("project", &artifact.project),
                ("fuzzer", &artifact.fuzzer),
                ("testcase", &testcase.to_string_lossy()),
                ("revision", &artifact.revision),
            ],
        );
        let child = Command::new("sh")
            .arg("-c")
            .arg(&cmd)
            .current_dir(&self.workdir)
            .spawn()
            .map_err(|e| ExecutionError {
                reason: format!("failed to spawn `{cmd}`: {e}"),
            })?;

        let status = match self.timeout {
            None => wait(child)?,
            Some(limit) => match wait_with_timeout(child, limit)? {
                Some(status) => status,
                // No crash within budget.
                None => return Ok(Signal::Clean),
            },
        };
        Ok(signal_from_status(status))
    }
}

impl ReproductionOracle for HelperRepro {
    fn run(&mut self, artifact: &BuildArtifact, testcase: &Path) -> Result<Signal, ExecutionError> {
        let mut last_err = None;
        for _ in 0..REPRO_ATTEMPTS {
            match self.run_once(artifact, testcase) {
                Ok(signal) => return Ok(signal),
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.expect("at least one reproduction attempt"))
    }
}

fn wait(mut child: Child) -> Result<ExitStatus, ExecutionError> {
    child.wait().map_err(|e| ExecutionError {
        reason: format!("failed to wait for reproduction: {e}"),
    })
}

/// Waits for the child, killing it once `limit` elapses. `None` = timed out.
fn wait_with_timeout(
    mut child: Child,
    limit: Duration,
) -> Result<Option<ExitStatus>, ExecutionError> {
    let pid = child.id();
    let (tx, rx) = bounded(1);
    std::thread::spawn(move || {
        let _ = tx.send(child.wait());
    });
    match rx.recv_timeout(limit) {
        Ok(result) => {
            let status = result.map_err(|e| ExecutionError {
                reason: format!("failed to wait for reproduction: {e}"),
            })?;
            Ok(Some(status))
        }
        Err(RecvTimeoutError::Timeout) => {
            let _ = Command::new("kill").arg("-KILL").arg(pid.to_string()).status();
            // Let the waiter thread reap the killed child.
            let _ = rx.recv_timeout(Duration::from_secs(5));
            Ok(None)
        }
        Err(RecvTimeoutError::Disconnected) => Err(ExecutionError {
            reason: "reproduction watcher thread died".to_string(),
        }),
    }
}

/// Exit code of the run; a target killed by a signal classifies as
/// 128+signo, the shell convention.
#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

fn signal_from_status(status: ExitStatus) -> Signal {
    match exit_code(status) {
        0 => Signal::Clean,
        code => Signal::Crashed { code },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn repro(template: &str, timeout: Option<Duration>) -> HelperRepro {
        HelperRepro::new(PathBuf::from("."), template.to_string(), timeout)
    }

    fn artifact() -> BuildArtifact {
        BuildArtifact {
            project: "demo".to_string(),
            fuzzer: "demo_fuzzer".to_string(),
            revision: "r0".to_string(),
        }
    }

    #[test]
    fn test_expand_placeholders() {
        let cmd = expand(
            "run {fuzzer} on {testcase} at {revision}",
            &[
                ("fuzzer", "demo_fuzzer"),
                ("testcase", "crash-abc"),
                ("revision", "r9"),
            ],
        );
        assert_eq!(cmd, "run demo_fuzzer on crash-abc at r9");
    }

    #[test]
    fn test_expand_leaves_plain_commands_alone() {
        assert_eq!(expand("true", &[("project", "demo")]), "true");
    }

    #[test]
    fn test_clean_exit_is_clean_signal() {
        let mut oracle = repro("exit 0", None);
        let signal = oracle.run(&artifact(), Path::new("t")).unwrap();
        assert_eq!(signal, Signal::Clean);
    }

    #[test]
    fn test_crash_code_preserved() {
        let mut oracle = repro("exit 77", None);
        let signal = oracle.run(&artifact(), Path::new("t")).unwrap();
        assert_eq!(signal, Signal::Crashed { code: 77 });
    }

    #[test]
    fn test_timeout_reports_no_crash() {
        let mut oracle = repro("sleep 30", Some(Duration::from_millis(200)));
        let start = Instant::now();
        let signal = oracle.run(&artifact(), Path::new("t")).unwrap();
        assert_eq!(signal, Signal::Clean);
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_fast_crash_beats_timeout() {
        let mut oracle = repro("exit 42", Some(Duration::from_secs(30)));
        let signal = oracle.run(&artifact(), Path::new("t")).unwrap();
        assert_eq!(signal, Signal::Crashed { code: 42 });
    }

    #[test]
    fn test_build_failure_carries_revision_and_command() {
        let mut oracle = HelperBuild::new(
            "demo".to_string(),
            "demo_fuzzer".to_string(),
            PathBuf::from("."),
            "exit 3".to_string(),
        );
        let err = oracle.build("r5", &BuildConfig::default()).unwrap_err();
        assert_eq!(err.revision, "r5");
        assert!(err.reason.contains("exit 3"));
    }

    #[test]
    fn test_build_success_yields_artifact() {
        let mut oracle = HelperBuild::new(
            "demo".to_string(),
            "demo_fuzzer".to_string(),
            PathBuf::from("."),
            "true".to_string(),
        );
        let artifact = oracle.build("r5", &BuildConfig::default()).unwrap();
        assert_eq!(artifact.fuzzer, "demo_fuzzer");
        assert_eq!(artifact.revision, "r5");
    }
}
