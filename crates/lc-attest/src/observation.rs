//! Probe execution: run the underlying action once, produce an observation.

use crate::error::ProbeError;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Maximum number of body/output bytes rendered in an observation
/// description.
const DESCRIBE_LIMIT: usize = 256;

/// What a single probe execution saw.
///
/// Expected failure modes are observations too: a 503, a non-zero exit and
/// a refused connection are all valid data for a predicate to evaluate,
/// never engine errors.
#[derive(Debug, Clone)]
pub enum Observation {
    /// An HTTP response was received.
    Response {
        status: u16,
        headers: Vec<(String, String)>,
        body: Vec<u8>,
    },

    /// The HTTP request was sent but no response came back
    /// (connection refused, reset, client-side timeout).
    ConnectionFailed { detail: String },

    /// The CLI command ran to completion.
    Exit {
        /// `None` when the process was terminated by a signal.
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observation::Response { status, body, .. } => {
                let body = String::from_utf8_lossy(body);
                if body.is_empty() {
                    write!(f, "HTTP {status} with empty body")
                } else {
                    write!(f, "HTTP {status}, body: {}", truncate(&body))
                }
            }
            Observation::ConnectionFailed { detail } => {
                write!(f, "connection failed: {detail}")
            }
            Observation::Exit {
                code,
                stdout,
                stderr,
            } => {
                match code {
                    Some(code) => write!(f, "exit code {code}")?,
                    None => write!(f, "terminated by signal")?,
                }
                if !stdout.is_empty() {
                    write!(f, ", stdout: {}", truncate(stdout))?;
                }
                if !stderr.is_empty() {
                    write!(f, ", stderr: {}", truncate(stderr))?;
                }
                Ok(())
            }
        }
    }
}

fn truncate(text: &str) -> String {
    let trimmed = text.trim_end_matches('\n');
    if trimmed.len() <= DESCRIBE_LIMIT {
        format!("{trimmed:?}")
    } else {
        let cut: String = trimmed.chars().take(DESCRIBE_LIMIT).collect();
        format!("{cut:?}... ({} bytes total)", trimmed.len())
    }
}

/// The probe behind a finalized plan: one HTTP request or one CLI
/// invocation, executable any number of times.
#[derive(Debug, Clone)]
pub(crate) enum Probe {
    Http {
        client: reqwest::Client,
        method: reqwest::Method,
        url: String,
        headers: BTreeMap<String, String>,
        body: Vec<u8>,
    },
    Cli {
        program: String,
        args: Vec<String>,
        current_dir: Option<PathBuf>,
        envs: Vec<(String, String)>,
    },
}

impl Probe {
    /// Execute the probe once.
    pub(crate) async fn run_once(&self) -> Result<Observation, ProbeError> {
        match self {
            Probe::Http {
                client,
                method,
                url,
                headers,
                body,
            } => run_http(client, method, url, headers, body).await,
            Probe::Cli {
                program,
                args,
                current_dir,
                envs,
            } => run_cli(program, args, current_dir.as_deref(), envs).await,
        }
    }
}

async fn run_http(
    client: &reqwest::Client,
    method: &reqwest::Method,
    url: &str,
    headers: &BTreeMap<String, String>,
    body: &[u8],
) -> Result<Observation, ProbeError> {
    let mut builder = client.request(method.clone(), url);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    if !body.is_empty() {
        builder = builder.body(body.to_vec());
    }
    let request = builder
        .build()
        .map_err(|e| ProbeError::InvalidRequest(e.to_string()))?;

    match client.execute(request).await {
        Ok(response) => {
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            match response.bytes().await {
                Ok(body) => Ok(Observation::Response {
                    status,
                    headers,
                    body: body.to_vec(),
                }),
                // The connection dropped mid-body.
                Err(e) => Ok(Observation::ConnectionFailed {
                    detail: e.to_string(),
                }),
            }
        }
        Err(e) if e.is_builder() => Err(ProbeError::InvalidRequest(e.to_string())),
        Err(e) => {
            debug!(url, error = %e, "HTTP probe could not reach the target");
            Ok(Observation::ConnectionFailed {
                detail: e.to_string(),
            })
        }
    }
}

async fn run_cli(
    program: &str,
    args: &[String],
    current_dir: Option<&std::path::Path>,
    envs: &[(String, String)],
) -> Result<Observation, ProbeError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = current_dir {
        command.current_dir(dir);
    }
    for (key, value) in envs {
        command.env(key, value);
    }

    let output = command.output().await.map_err(|source| ProbeError::Spawn {
        command: program.to_string(),
        source,
    })?;

    Ok(Observation::Exit {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}
