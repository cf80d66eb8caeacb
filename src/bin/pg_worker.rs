//! Runs embedded `PostgreSQL` lifecycle steps as an unprivileged user.
//!
//! ```text
//! pg_worker <setup|start|stop> <payload-path>
//! ```
//!
//! The payload is the JSON `WorkerPayload` written by
//! `pg-embed-setup-unpriv`: cluster settings plus environment overrides.
//! When launched as root the worker switches to `nobody` before touching the
//! data directory, which lets the `PostgreSQL` integration tests run inside
//! root-only containers.

#[cfg(unix)]
use camino::{Utf8Path, Utf8PathBuf};
#[cfg(unix)]
use nix::unistd::{Uid, User, initgroups, setgid, setuid};
#[cfg(unix)]
use pg_embedded_setup_unpriv::ambient_dir_and_path;
#[cfg(unix)]
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
#[cfg(unix)]
use postgresql_embedded::{PostgreSQL, Status};
#[cfg(unix)]
use std::ffi::{CString, OsString};
#[cfg(unix)]
use std::io::Read;
#[cfg(unix)]
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[cfg(unix)]
const UNPRIVILEGED_USER: &str = "nobody";

#[cfg(unix)]
#[derive(Debug, Error)]
enum WorkerError {
    #[error("usage: pg_worker <setup|start|stop> <payload-path>: {0}")]
    Usage(String),
    #[error("failed to read payload {path}: {source}")]
    Payload {
        path: Utf8PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("invalid cluster settings: {0}")]
    Settings(String),
    #[error("failed to switch to an unprivileged user: {0}")]
    Privileges(String),
    #[error("failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("{operation} failed: {source}")]
    Lifecycle {
        operation: &'static str,
        #[source]
        source: postgresql_embedded::Error,
    },
}

#[cfg(unix)]
#[derive(Debug, Clone, Copy)]
enum Step {
    Setup,
    Start,
    Stop,
}

#[cfg(unix)]
impl Step {
    fn parse(raw: &str) -> Result<Self, WorkerError> {
        match raw {
            "setup" => Ok(Self::Setup),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            other => Err(WorkerError::Usage(format!("unknown step '{other}'"))),
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        }
    }
}

#[cfg(unix)]
fn main() -> Result<(), BoxError> {
    let (step, payload_path) = parse_args(std::env::args_os())?;
    let payload = read_payload(&payload_path)?;
    switch_to_unprivileged_user()?;

    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| WorkerError::Settings(err.to_string()))?;
    apply_environment(&payload.environment);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(WorkerError::Runtime)?;
    runtime.block_on(run_step(step, PostgreSQL::new(settings)))?;
    Ok(())
}

#[cfg(unix)]
fn parse_args(args: impl Iterator<Item = OsString>) -> Result<(Step, Utf8PathBuf), WorkerError> {
    let mut args = args.skip(1).map(|arg| {
        arg.into_string()
            .map_err(|_| WorkerError::Usage("arguments must be UTF-8".to_owned()))
    });
    let step = args
        .next()
        .ok_or_else(|| WorkerError::Usage("missing step".to_owned()))?
        .and_then(|raw| Step::parse(&raw))?;
    let path = args
        .next()
        .ok_or_else(|| WorkerError::Usage("missing payload path".to_owned()))??;
    if args.next().is_some() {
        return Err(WorkerError::Usage("too many arguments".to_owned()));
    }
    Ok((step, Utf8PathBuf::from(path)))
}

#[cfg(unix)]
fn read_payload(path: &Utf8Path) -> Result<WorkerPayload, WorkerError> {
    let payload_error = |source: BoxError| WorkerError::Payload {
        path: path.to_path_buf(),
        source,
    };
    let (dir, relative) = ambient_dir_and_path(path).map_err(|err| payload_error(err.into()))?;
    let mut file = dir
        .open(relative.as_std_path())
        .map_err(|err| payload_error(err.into()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|err| payload_error(err.into()))?;
    serde_json::from_slice(&bytes).map_err(|err| payload_error(err.into()))
}

#[cfg(unix)]
fn switch_to_unprivileged_user() -> Result<(), WorkerError> {
    if !Uid::effective().is_root() {
        return Ok(());
    }

    let user = User::from_name(UNPRIVILEGED_USER)
        .map_err(privileges)?
        .ok_or_else(|| privileges("no such user"))?;
    let name = CString::new(user.name.as_str()).map_err(privileges)?;
    initgroups(&name, user.gid).map_err(privileges)?;
    setgid(user.gid).map_err(privileges)?;
    setuid(user.uid).map_err(privileges)?;

    // SAFETY: the worker is single-threaded until the runtime is built.
    unsafe {
        std::env::set_var("HOME", &user.dir);
        std::env::set_var("USER", &user.name);
        std::env::set_var("LOGNAME", &user.name);
    }
    Ok(())
}

#[cfg(unix)]
fn privileges(err: impl std::fmt::Display) -> WorkerError {
    WorkerError::Privileges(err.to_string())
}

#[cfg(unix)]
fn apply_environment(environment: &[(String, Option<PlainSecret>)]) {
    for (key, value) in environment {
        // SAFETY: the worker is single-threaded until the runtime is built.
        unsafe {
            match value {
                Some(secret) => std::env::set_var(key, secret.expose()),
                None => std::env::remove_var(key),
            }
        }
    }
}

#[cfg(unix)]
async fn run_step(step: Step, mut postgres: PostgreSQL) -> Result<(), WorkerError> {
    let lifecycle = |source| WorkerError::Lifecycle {
        operation: step.name(),
        source,
    };
    match step {
        Step::Setup => {
            postgres.setup().await.map_err(lifecycle)?;
            start_if_stopped(&mut postgres).await.map_err(lifecycle)
        }
        Step::Start => {
            start_if_stopped(&mut postgres).await.map_err(lifecycle)?;
            // The server must outlive this process.
            std::mem::forget(postgres);
            Ok(())
        }
        Step::Stop => postgres.stop().await.map_err(lifecycle),
    }
}

#[cfg(unix)]
async fn start_if_stopped(postgres: &mut PostgreSQL) -> Result<(), postgresql_embedded::Error> {
    if matches!(postgres.status(), Status::Started) {
        return Ok(());
    }
    postgres.start().await
}

#[cfg(not(unix))]
fn main() -> Result<(), BoxError> {
    Err("pg_worker only runs on Unix platforms".into())
}
