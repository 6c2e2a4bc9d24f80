//! Oracle backed by external prover and model-finder executables
//!
//! The query text is piped to the executable's stdin; stdout and stderr are
//! collected and scanned for the success markers. The child is killed when
//! the timeout expires.

use super::{wire, Oracle, OracleResponse, ProofVerdict, Satisfiability};
use crate::logic::{ClauseSet, Literal};
use log::{debug, warn};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone)]
pub struct ProcessOracle {
    prover: Program,
    model_finder: Program,
}

#[derive(Debug, Clone)]
struct Program {
    path: PathBuf,
    args: Vec<String>,
}

/// How a child process run ended
#[derive(Debug)]
enum RunOutcome {
    Finished(String),
    TimedOut(String),
    /// Could not be started at all
    Unavailable(String),
    Failed(String),
}

impl ProcessOracle {
    pub fn new(prover: impl Into<PathBuf>, model_finder: impl Into<PathBuf>) -> Self {
        Self {
            prover: Program { path: prover.into(), args: Vec::new() },
            model_finder: Program { path: model_finder.into(), args: Vec::new() },
        }
    }

    /// Extra command line arguments for each executable
    pub fn with_args(mut self, prover_args: Vec<String>, model_finder_args: Vec<String>) -> Self {
        self.prover.args = prover_args;
        self.model_finder.args = model_finder_args;
        self
    }
}

impl Oracle for ProcessOracle {
    fn name(&self) -> &'static str {
        "process"
    }

    fn prove_goal(&self, clauses: &ClauseSet, goal: Literal, timeout: Duration) -> OracleResponse<ProofVerdict> {
        let input = wire::proof_input(clauses, goal);

        match run_with_timeout(&self.prover, &input, timeout) {
            RunOutcome::Finished(output) => {
                let verdict = if wire::proof_found(&output) {
                    ProofVerdict::Proved
                } else {
                    ProofVerdict::NotProved
                };
                OracleResponse::new(verdict, output)
            }
            RunOutcome::TimedOut(output) => {
                debug!("prover timed out on goal {}", goal);
                OracleResponse::new(ProofVerdict::NotProved, format!("timed out after {:?}\n{}", timeout, output))
            }
            RunOutcome::Unavailable(reason) => {
                warn!("prover {} unavailable: {}", self.prover.path.display(), reason);
                OracleResponse::new(ProofVerdict::OracleUnavailable, reason)
            }
            RunOutcome::Failed(reason) => OracleResponse::new(ProofVerdict::NotProved, reason),
        }
    }

    fn check_satisfiable(&self, clauses: &ClauseSet, timeout: Duration) -> OracleResponse<Satisfiability> {
        let input = wire::model_input(clauses);

        match run_with_timeout(&self.model_finder, &input, timeout) {
            RunOutcome::Finished(output) => {
                let verdict = if wire::model_found(&output) {
                    Satisfiability::Satisfiable
                } else {
                    Satisfiability::NotSatisfiable
                };
                OracleResponse::new(verdict, output)
            }
            RunOutcome::TimedOut(output) => {
                debug!("model finder timed out");
                OracleResponse::new(Satisfiability::Unknown, format!("timed out after {:?}\n{}", timeout, output))
            }
            RunOutcome::Unavailable(reason) => {
                warn!("model finder {} unavailable: {}", self.model_finder.path.display(), reason);
                OracleResponse::new(Satisfiability::OracleUnavailable, reason)
            }
            RunOutcome::Failed(reason) => OracleResponse::new(Satisfiability::Unknown, reason),
        }
    }
}

fn run_with_timeout(program: &Program, input: &str, timeout: Duration) -> RunOutcome {
    let mut child = match Command::new(&program.path)
        .args(&program.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return RunOutcome::Unavailable(format!("{}: {}", program.path.display(), e)),
    };

    // The child may exit without reading its input; a broken pipe is not an error here
    let writer = child.stdin.take().map(|mut stdin| {
        let input = input.to_string();
        thread::spawn(move || {
            let _ = stdin.write_all(input.as_bytes());
        })
    });
    let stdout_reader = child.stdout.take().map(spawn_reader);
    let stderr_reader = child.stderr.take().map(spawn_reader);

    let deadline = Instant::now() + timeout;
    let mut timed_out = false;

    loop {
        match child.try_wait() {
            Ok(Some(_status)) => break,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                timed_out = true;
                break;
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return RunOutcome::Failed(format!("failed waiting for {}: {}", program.path.display(), e));
            }
        }
    }

    if let Some(writer) = writer {
        let _ = writer.join();
    }

    let mut output = join_reader(stdout_reader);
    output.push('\n');
    output.push_str(&join_reader(stderr_reader));

    if timed_out {
        RunOutcome::TimedOut(output)
    } else {
        RunOutcome::Finished(output)
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut source: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = String::new();
        let _ = source.read_to_string(&mut buffer);
        buffer
    })
}

fn join_reader(reader: Option<thread::JoinHandle<String>>) -> String {
    reader.and_then(|handle| handle.join().ok()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::logic::Clause;

    fn clauses() -> ClauseSet {
        vec![Clause::unit(Literal::safe(Cell::new(0, 0)))].into_iter().collect()
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let oracle = ProcessOracle::new("/nonexistent/prover9", "/nonexistent/mace4");

        let proof = oracle.prove_goal(&clauses(), Literal::safe(Cell::new(0, 0)), Duration::from_secs(1));
        assert_eq!(proof.verdict, ProofVerdict::OracleUnavailable);
        assert!(proof.diagnostic.contains("/nonexistent/prover9"));

        let sat = oracle.check_satisfiable(&clauses(), Duration::from_secs(1));
        assert_eq!(sat.verdict, Satisfiability::OracleUnavailable);
    }

    #[cfg(unix)]
    #[test]
    fn test_marker_detection() {
        let oracle = ProcessOracle::new("sh", "sh").with_args(
            vec!["-c".to_string(), "cat >/dev/null; echo 'THEOREM PROVED'".to_string()],
            vec!["-c".to_string(), "cat >/dev/null; echo 'Exiting with 1 model.'".to_string()],
        );

        let proof = oracle.prove_goal(&clauses(), Literal::safe(Cell::new(0, 0)), Duration::from_secs(5));
        assert_eq!(proof.verdict, ProofVerdict::Proved);

        let sat = oracle.check_satisfiable(&clauses(), Duration::from_secs(5));
        assert_eq!(sat.verdict, Satisfiability::Satisfiable);
    }

    #[cfg(unix)]
    #[test]
    fn test_unexpected_output_is_not_proved() {
        // `cat` echoes the query back: no marker, so no proof
        let oracle = ProcessOracle::new("cat", "cat");

        let proof = oracle.prove_goal(&clauses(), Literal::safe(Cell::new(0, 0)), Duration::from_secs(5));
        assert_eq!(proof.verdict, ProofVerdict::NotProved);
        assert!(proof.diagnostic.contains("formulas(goals)."));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_is_not_proved() {
        let oracle = ProcessOracle::new("sh", "sh").with_args(
            vec!["-c".to_string(), "exec sleep 5".to_string()],
            vec!["-c".to_string(), "exec sleep 5".to_string()],
        );

        let start = Instant::now();
        let proof = oracle.prove_goal(&clauses(), Literal::safe(Cell::new(0, 0)), Duration::from_millis(200));
        assert_eq!(proof.verdict, ProofVerdict::NotProved);
        assert!(proof.diagnostic.starts_with("timed out"));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_is_unknown_satisfiability() {
        let oracle = ProcessOracle::new("sh", "sh").with_args(
            vec!["-c".to_string(), "exec sleep 5".to_string()],
            vec!["-c".to_string(), "exec sleep 5".to_string()],
        );

        let start = Instant::now();
        let sat = oracle.check_satisfiable(&clauses(), Duration::from_millis(200));
        assert_eq!(sat.verdict, Satisfiability::Unknown);
        assert!(sat.diagnostic.starts_with("timed out"));
        assert!(start.elapsed() < Duration::from_secs(4));
    }
}
