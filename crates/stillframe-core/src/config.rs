//! Process-wide configuration, resolved once at startup.
//!
//! The handler runs either inside its managed runtime (where ffmpeg ships as
//! a bundled binary and scratch space lives under `/tmp`) or on a developer
//! machine. The two variants are resolved into an [`ExecutionContext`] once
//! and passed explicitly into collaborators; nothing re-reads the environment
//! after startup.

use std::path::PathBuf;

/// Where the process is running. Selects the staging root and the location
/// of the ffmpeg/ffprobe binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Hosted runtime: fixed scratch directory, tools from the bundled layer.
    Managed,
    /// Developer machine: OS temp directory, tools resolved from `PATH`.
    Local,
}

impl ExecutionContext {
    pub fn default_staging_root(&self) -> PathBuf {
        match self {
            ExecutionContext::Managed => PathBuf::from("/tmp/stillframe"),
            ExecutionContext::Local => std::env::temp_dir().join("stillframe"),
        }
    }

    pub fn default_ffmpeg_path(&self) -> String {
        match self {
            ExecutionContext::Managed => "/opt/bin/ffmpeg".to_string(),
            ExecutionContext::Local => "ffmpeg".to_string(),
        }
    }

    pub fn default_ffprobe_path(&self) -> String {
        match self {
            ExecutionContext::Managed => "/opt/bin/ffprobe".to_string(),
            ExecutionContext::Local => "ffprobe".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub execution: ExecutionContext,
    pub staging_root: PathBuf,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub aws_region: String,
    pub s3_endpoint_url: Option<String>,
    pub port: u16,
}

impl Config {
    /// Build a configuration with the defaults of the given execution context.
    pub fn for_context(execution: ExecutionContext) -> Self {
        Self {
            execution,
            staging_root: execution.default_staging_root(),
            ffmpeg_path: execution.default_ffmpeg_path(),
            ffprobe_path: execution.default_ffprobe_path(),
            aws_region: "us-east-1".to_string(),
            s3_endpoint_url: None,
            port: 8080,
        }
    }

    /// Load configuration from the environment. `STILLFRAME_ENV=managed`
    /// selects the hosted-runtime defaults; everything else falls back to
    /// local defaults. Individual paths can be overridden.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let execution = match std::env::var("STILLFRAME_ENV").as_deref() {
            Ok("managed") => ExecutionContext::Managed,
            _ => ExecutionContext::Local,
        };

        let mut config = Self::for_context(execution);

        if let Ok(root) = std::env::var("STILLFRAME_STAGING_ROOT") {
            config.staging_root = PathBuf::from(root);
        }
        if let Ok(path) = std::env::var("STILLFRAME_FFMPEG_PATH") {
            config.ffmpeg_path = path;
        }
        if let Ok(path) = std::env::var("STILLFRAME_FFPROBE_PATH") {
            config.ffprobe_path = path;
        }
        if let Ok(region) = std::env::var("AWS_REGION") {
            config.aws_region = region;
        }
        if let Ok(endpoint) = std::env::var("S3_ENDPOINT_URL") {
            if !endpoint.is_empty() {
                config.s3_endpoint_url = Some(endpoint);
            }
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }

        config
    }
}
