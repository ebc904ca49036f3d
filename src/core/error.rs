//! Error types for monorel with contextual messages and exit codes
//!
//! A unified error type that categorizes failures by origin (configuration,
//! git, version data) and carries the underlying tool diagnostic so the final
//! report can show it verbatim.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Exit codes for monorel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, network, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for monorel
#[derive(Debug)]
pub enum AlignError {
  /// Configuration errors
  Config(ConfigError),

  /// Git operation errors
  Git(GitError),

  /// Version data errors
  Version(VersionError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl AlignError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    AlignError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    AlignError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      AlignError::Message { message, context, help } => AlignError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      other => AlignError::Message {
        message: other.to_string(),
        context: Some(ctx_str),
        help: other.help_message(),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      AlignError::Config(_) => ExitCode::User,
      AlignError::Git(_) => ExitCode::System,
      AlignError::Version(_) => ExitCode::User,
      AlignError::Io(_) => ExitCode::System,
      AlignError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      AlignError::Config(e) => e.help_message(),
      AlignError::Git(e) => e.help_message(),
      AlignError::Version(e) => e.help_message(),
      AlignError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for AlignError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AlignError::Config(e) => write!(f, "{}", e),
      AlignError::Git(e) => write!(f, "{}", e),
      AlignError::Version(e) => write!(f, "{}", e),
      AlignError::Io(e) => write!(f, "I/O error: {}", e),
      AlignError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for AlignError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      AlignError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for AlignError {
  fn from(err: io::Error) -> Self {
    AlignError::Io(err)
  }
}

impl From<String> for AlignError {
  fn from(msg: String) -> Self {
    AlignError::message(msg)
  }
}

impl From<&str> for AlignError {
  fn from(msg: &str) -> Self {
    AlignError::message(msg)
  }
}

impl From<ConfigError> for AlignError {
  fn from(err: ConfigError) -> Self {
    AlignError::Config(err)
  }
}

impl From<GitError> for AlignError {
  fn from(err: GitError) -> Self {
    AlignError::Git(err)
  }
}

impl From<VersionError> for AlignError {
  fn from(err: VersionError) -> Self {
    AlignError::Version(err)
  }
}

impl From<toml_edit::TomlError> for AlignError {
  fn from(err: toml_edit::TomlError) -> Self {
    AlignError::message(format!("TOML parse error: {}", err))
  }
}

impl From<toml_edit::de::Error> for AlignError {
  fn from(err: toml_edit::de::Error) -> Self {
    AlignError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for AlignError {
  fn from(err: serde_json::Error) -> Self {
    AlignError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for AlignError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    AlignError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<std::env::VarError> for AlignError {
  fn from(err: std::env::VarError) -> Self {
    AlignError::message(format!("Environment variable error: {}", err))
  }
}

/// Convert anyhow::Error to AlignError (test helpers cross this boundary)
impl From<anyhow::Error> for AlignError {
  fn from(err: anyhow::Error) -> Self {
    AlignError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// monorel.toml not found
  NotFound { search_root: PathBuf },

  /// Requested repository set is not configured
  SetNotFound { name: String, available: Vec<String> },

  /// A repository set has no repositories
  EmptySet { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create a monorel.toml with [settings] and at least one [[sets]] table.".to_string())
      }
      ConfigError::SetNotFound { available, .. } => Some(format!(
        "Configured sets: {}. Pass one of them to `monorel align`.",
        if available.is_empty() {
          "(none)".to_string()
        } else {
          available.join(", ")
        }
      )),
      ConfigError::EmptySet { name } => Some(format!(
        "Add at least one [[sets.repos]] entry with name and path under set '{}'.",
        name
      )),
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { search_root } => {
        write!(
          f,
          "No monorel configuration found.\nSearched from: {}",
          search_root.display()
        )
      }
      ConfigError::SetNotFound { name, .. } => {
        write!(f, "Repository set '{}' not found in configuration", name)
      }
      ConfigError::EmptySet { name } => {
        write!(f, "Repository set '{}' contains no repositories", name)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed {
    remote: String,
    branch: String,
    reason: String,
  },

  /// Command exceeded its time budget
  Timeout { command: String, limit: Duration },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::PushFailed { reason, .. } => {
        if reason.contains("stale info") || reason.contains("force-with-lease") {
          Some("The remote branch moved since it was last fetched. Re-run after the concurrent run finishes.".to_string())
        } else if reason.contains("permission denied") || reason.contains("403") {
          Some("Check your SSH key permissions and hosting access for this remote.".to_string())
        } else {
          None
        }
      }
      GitError::RepoNotFound { path } => Some(format!(
        "Check the working-copy path in monorel.toml: {}",
        path.display()
      )),
      GitError::Timeout { .. } => {
        Some("Raise settings.git_timeout_secs if this remote is legitimately slow.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::PushFailed { remote, branch, reason } => {
        write!(f, "Push to {}/{} failed: {}", remote, branch, reason)
      }
      GitError::Timeout { command, limit } => {
        write!(f, "Git command timed out after {}s: {}", limit.as_secs(), command)
      }
    }
  }
}

/// Version data errors
#[derive(Debug)]
pub enum VersionError {
  /// Version string is not MAJOR.MINOR.PATCH
  Malformed { input: String },
}

impl VersionError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionError::Malformed { .. } => Some(
        "The version marker must contain exactly three dot-separated non-negative integers, e.g. 1.4.0.".to_string(),
      ),
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::Malformed { input } => {
        write!(f, "Malformed version '{}': expected MAJOR.MINOR.PATCH", input)
      }
    }
  }
}

/// Result type alias for monorel
pub type AlignResult<T> = Result<T, AlignError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> AlignResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> AlignResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<AlignError>,
{
  fn context(self, ctx: impl Into<String>) -> AlignResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> AlignResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &AlignError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
