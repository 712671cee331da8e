//! Input location backed by an object store (S3 or local filesystem)

use crate::config::{InputSource, S3Settings};
use crate::error::{Error, Result};
use crate::types::InputFormat;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

/// Directory-like prefix to list for an input path
///
/// Globs are cut back to the last `/` before the first wildcard and a path
/// naming a single file is cut back to its parent.
///
/// Examples:
/// - `exports/data/` → `exports/data`
/// - `exports/*/part-*.parquet` → `exports`
/// - `exports/2024/cur.parquet` → `exports/2024`
pub fn listing_prefix(path: &str, extension: &str) -> String {
    let path = path.trim_start_matches('/');

    let cut = match path.find(&['*', '?', '['][..]) {
        Some(idx) => &path[..idx],
        None if path
            .to_ascii_lowercase()
            .ends_with(&format!(".{extension}")) =>
        {
            path
        }
        None => return path.trim_end_matches('/').to_string(),
    };

    match cut.rfind('/') {
        Some(idx) => cut[..idx].to_string(),
        None => String::new(),
    }
}

/// Translate a file glob into an anchored regex over store paths
///
/// `*` and `?` stay within one path segment, `**` spans segments and
/// `[...]` is a character class (`[!...]` negated).
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => out.push_str("[^/]*"),
            '?' => out.push_str("[^/]"),
            '[' => match chars[i + 1..].iter().position(|&c| c == ']') {
                Some(len) => {
                    let class: String = chars[i + 1..i + 1 + len].iter().collect();
                    let class = match class.strip_prefix('!') {
                        Some(rest) => format!("^{rest}"),
                        None => class,
                    };
                    out.push('[');
                    out.push_str(&class.replace('\\', "\\\\"));
                    out.push(']');
                    i += len + 2;
                    continue;
                }
                None => out.push_str("\\["),
            },
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
        i += 1;
    }
    out.push('$');

    Regex::new(&out)
        .map_err(|e| Error::config(format!("Invalid input file pattern '{pattern}': {e}")))
}

/// Input location resolved to an object store
#[derive(Debug, Clone)]
pub struct InputLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Prefix to list within the bucket/directory
    prefix: String,
    /// Human-readable location for messages
    url: String,
    /// Glob selecting the input files, relative to the store root
    pattern: String,
    matcher: Regex,
}

impl InputLocation {
    /// Resolve the configured input source
    pub fn from_source(source: &InputSource, format: InputFormat) -> Result<Self> {
        let pattern = source.file_pattern(format);
        let matcher = glob_to_regex(&pattern)?;
        let prefix = listing_prefix(&pattern, format.extension());

        let (store, url) = match source {
            InputSource::S3(s3) => Self::s3(s3, &prefix)?,
            InputSource::Local { dir } => Self::local(dir)?,
        };

        Ok(Self {
            store,
            prefix,
            url,
            pattern,
            matcher,
        })
    }

    fn s3(s3: &S3Settings, prefix: &str) -> Result<(Arc<dyn ObjectStore>, String)> {
        let mut builder = AmazonS3Builder::new()
            .with_region(&s3.region)
            .with_access_key_id(&s3.access_key_id)
            .with_secret_access_key(&s3.secret_access_key)
            .with_bucket_name(&s3.bucket);

        if let Some(endpoint) = &s3.endpoint {
            builder = builder
                .with_endpoint(endpoint)
                .with_allow_http(endpoint.starts_with("http://"));
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create S3 client: {e}")))?;

        Ok((Arc::new(store), format!("s3://{}/{prefix}", s3.bucket)))
    }

    fn local(dir: &Path) -> Result<(Arc<dyn ObjectStore>, String)> {
        let store = LocalFileSystem::new_with_prefix(dir)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok((Arc::new(store), dir.display().to_string()))
    }

    /// Location for display
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Prefix listed within the store
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Glob the query engine reads, relative to the store root
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the query engine would read this object
    pub fn matches(&self, meta: &ObjectMeta) -> bool {
        self.matcher.is_match(meta.location.as_ref())
    }

    /// List every object under the prefix, at any depth
    pub async fn list(&self) -> Result<Vec<ObjectMeta>> {
        let prefix = (!self.prefix.is_empty()).then(|| ObjectPath::from(self.prefix.as_str()));
        let objects: Vec<ObjectMeta> = self.store.list(prefix.as_ref()).try_collect().await?;
        Ok(objects)
    }
}
