//! Run configuration
//!
//! Everything the pipeline needs is read from the process environment once,
//! validated in one pass, and handed to the pipeline as a [`NormalizeConfig`].
//! Every problem found is reported together rather than stopping at the first.

use crate::error::{Error, Result};
use crate::types::{InputFormat, OUTPUT_FILE_NAME};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Existing local directory that receives `normalized.parquet`
pub const NORMALIZED_DATA_DIR: &str = "NORMALIZED_DATA_DIR";
/// Storage region
pub const AWS_REGION: &str = "AWS_REGION";
/// Access key id
pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Secret access key
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Bucket holding the input files
pub const BUCKET_NAME: &str = "BUCKET_NAME";
/// Path, prefix or glob inside the bucket
pub const S3_INPUT_DATA_PATH: &str = "S3_INPUT_DATA_PATH";
/// Optional S3-compatible endpoint (MinIO, R2, ...)
pub const AWS_ENDPOINT: &str = "AWS_ENDPOINT";
/// Optional local input directory; selects local mode when set
pub const INPUT_DATA_DIR: &str = "INPUT_DATA_DIR";
/// Optional input file type (`parquet` or `csv`)
pub const INPUT_DATA_TYPE: &str = "INPUT_DATA_TYPE";

/// Variables required when reading from S3, in the order they are checked
pub const S3_REQUIRED_VARS: [&str; 5] = [
    AWS_REGION,
    AWS_ACCESS_KEY_ID,
    AWS_SECRET_ACCESS_KEY,
    BUCKET_NAME,
    S3_INPUT_DATA_PATH,
];

const GLOB_CHARS: [char; 3] = ['*', '?', '['];

// ============================================================================
// Input Source
// ============================================================================

/// Connection settings for S3 input
#[derive(Clone, Serialize)]
pub struct S3Settings {
    pub region: String,
    pub access_key_id: String,
    #[serde(skip_serializing)]
    pub secret_access_key: String,
    pub bucket: String,
    /// Path, prefix or glob inside the bucket (no leading slash)
    pub input_path: String,
    pub endpoint: Option<String>,
}

impl fmt::Debug for S3Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Settings")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"****")
            .field("bucket", &self.bucket)
            .field("input_path", &self.input_path)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Where the input files live
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputSource {
    /// Files in an S3 bucket
    S3(S3Settings),
    /// Files in a local directory
    Local { dir: PathBuf },
}

impl InputSource {
    /// URI handed to the DuckDB reader function
    ///
    /// A location that already names files (glob or matching extension) is
    /// used verbatim, otherwise every file with the format's extension
    /// directly under it is selected.
    pub fn source_uri(&self, format: InputFormat) -> String {
        let base = match self {
            InputSource::S3(s3) => format!("s3://{}/{}", s3.bucket, s3.input_path),
            InputSource::Local { dir } => dir.display().to_string(),
        };
        with_file_glob(&base, format)
    }

    /// Glob selecting the input files, relative to the bucket or directory
    ///
    /// Selects the same files as [`InputSource::source_uri`].
    pub fn file_pattern(&self, format: InputFormat) -> String {
        match self {
            InputSource::S3(s3) => with_file_glob(&s3.input_path, format)
                .trim_start_matches('/')
                .to_string(),
            InputSource::Local { .. } => format!("*.{}", format.extension()),
        }
    }

    /// Whether reading this source needs the httpfs extension
    pub fn is_remote(&self) -> bool {
        matches!(self, InputSource::S3(_))
    }
}

fn with_file_glob(base: &str, format: InputFormat) -> String {
    let suffix = format!(".{}", format.extension());
    if base.contains(&GLOB_CHARS[..]) || base.to_ascii_lowercase().ends_with(&suffix) {
        base.to_string()
    } else {
        format!("{}/*{suffix}", base.trim_end_matches('/'))
    }
}

// ============================================================================
// Normalize Config
// ============================================================================

/// Validated configuration for one normalization run
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeConfig {
    pub input: InputSource,
    pub input_format: InputFormat,
    pub output_dir: PathBuf,
}

impl NormalizeConfig {
    /// Read and validate the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read and validate the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut env = EnvReader::new(lookup);

        let output_dir = env
            .required(NORMALIZED_DATA_DIR)
            .and_then(|raw| env.directory(NORMALIZED_DATA_DIR, &raw));

        let input = match env.optional(INPUT_DATA_DIR) {
            Some(raw) => env
                .directory(INPUT_DATA_DIR, &raw)
                .map(|dir| InputSource::Local { dir }),
            None => env.s3_settings().map(InputSource::S3),
        };

        let input_format = match env.optional(INPUT_DATA_TYPE) {
            Some(raw) => match raw.parse::<InputFormat>() {
                Ok(format) => Some(format),
                Err(message) => {
                    env.problem(Error::invalid_env(INPUT_DATA_TYPE, message));
                    None
                }
            },
            None => Some(InputFormat::default()),
        };

        match (input, input_format, output_dir) {
            (Some(input), Some(input_format), Some(output_dir)) if env.problems.is_empty() => {
                Ok(Self {
                    input,
                    input_format,
                    output_dir,
                })
            }
            _ => Err(Error::InvalidConfig {
                problems: env.problems,
            }),
        }
    }

    /// Configuration reading local files, used for development and tests
    pub fn local(input_dir: impl AsRef<Path>, output_dir: impl AsRef<Path>) -> Result<Self> {
        let check = |name: &str, path: &Path| -> Result<PathBuf> {
            if path.is_dir() {
                Ok(path.to_path_buf())
            } else {
                Err(Error::invalid_env(name, not_a_directory(path)))
            }
        };

        Ok(Self {
            input: InputSource::Local {
                dir: check(INPUT_DATA_DIR, input_dir.as_ref())?,
            },
            input_format: InputFormat::default(),
            output_dir: check(NORMALIZED_DATA_DIR, output_dir.as_ref())?,
        })
    }

    /// Override the input format
    #[must_use]
    pub fn with_input_format(mut self, format: InputFormat) -> Self {
        self.input_format = format;
        self
    }

    /// Full path of the output file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(OUTPUT_FILE_NAME)
    }

    /// URI of the input files as seen by the query engine
    pub fn source_uri(&self) -> String {
        self.input.source_uri(self.input_format)
    }
}

fn not_a_directory(path: &Path) -> String {
    format!("{} does not exist or is not a directory", path.display())
}

/// Environment lookup that records problems instead of failing on the first
struct EnvReader<F> {
    lookup: F,
    problems: Vec<String>,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            problems: Vec::new(),
        }
    }

    fn problem(&mut self, error: Error) {
        self.problems.push(error.to_string());
    }

    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&mut self, name: &str) -> Option<String> {
        let value = self.optional(name);
        if value.is_none() {
            self.problem(Error::missing_env(name));
        }
        value
    }

    fn directory(&mut self, name: &str, raw: &str) -> Option<PathBuf> {
        let path = PathBuf::from(raw);
        if path.is_dir() {
            Some(std::fs::canonicalize(&path).unwrap_or(path))
        } else {
            self.problem(Error::invalid_env(name, not_a_directory(&path)));
            None
        }
    }

    fn s3_settings(&mut self) -> Option<S3Settings> {
        let [region, access_key_id, secret_access_key, bucket, input_path] =
            S3_REQUIRED_VARS.map(|name| self.required(name));
        let endpoint = self.optional(AWS_ENDPOINT);

        Some(S3Settings {
            region: region?,
            access_key_id: access_key_id?,
            secret_access_key: secret_access_key?,
            bucket: bucket?,
            input_path: input_path?.trim_start_matches('/').to_string(),
            endpoint,
        })
    }
}
