//! JSON Schema checks against schema files kept under a resource root.

use std::fs;
use std::path::{Path, PathBuf};

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;

/// Resource directory used when none is given
pub const DEFAULT_RESOURCE_ROOT: &str = "resources";
const SCHEMA_DIR: &str = "schemas";
const DEFAULT_EXTENSION: &str = ".json";

/// Where a schema file lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLocator {
    /// `<root>/schemas/<dir>/<name><extension>`
    Parts {
        dir: String,
        name: String,
        extension: Option<String>,
    },
    /// Path relative to the resource root, extension included
    Path(PathBuf),
}

impl SchemaLocator {
    /// Schema under `schemas/<dir>` with the default `.json` extension
    pub fn named(dir: impl Into<String>, name: impl Into<String>) -> Self {
        SchemaLocator::Parts {
            dir: dir.into(),
            name: name.into(),
            extension: None,
        }
    }

    pub fn with_extension(
        dir: impl Into<String>,
        name: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        SchemaLocator::Parts {
            dir: dir.into(),
            name: name.into(),
            extension: Some(extension.into()),
        }
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        SchemaLocator::Path(path.into())
    }

    fn resolve(&self, root: &Path) -> PathBuf {
        match self {
            SchemaLocator::Parts {
                dir,
                name,
                extension,
            } => {
                let extension = match extension.as_deref().map(str::trim) {
                    None | Some("") => DEFAULT_EXTENSION.to_string(),
                    Some(ext) if ext.starts_with('.') => ext.to_string(),
                    Some(ext) => format!(".{ext}"),
                };
                root.join(SCHEMA_DIR)
                    .join(dir.trim_matches('/'))
                    .join(format!("{name}{extension}"))
            }
            SchemaLocator::Path(path) => root.join(path),
        }
    }
}

/// Outcome of one validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    pub schema: PathBuf,
    pub errors: Vec<String>,
}

impl SchemaReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates JSON bodies against schema files.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    root: PathBuf,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new(DEFAULT_RESOURCE_ROOT)
    }
}

impl SchemaValidator {
    pub fn new(resource_root: impl Into<PathBuf>) -> Self {
        Self {
            root: resource_root.into(),
        }
    }

    pub fn resource_root(&self) -> &Path {
        &self.root
    }

    /// Full path a locator resolves to
    pub fn schema_path(&self, locator: &SchemaLocator) -> PathBuf {
        locator.resolve(&self.root)
    }

    /// Validate a response body.
    ///
    /// A missing schema file is an error. A body that does not parse or does
    /// not match is reported as an invalid [`SchemaReport`].
    pub fn validate_str(&self, locator: &SchemaLocator, body: &str) -> ApiResult<SchemaReport> {
        let path = self.schema_path(locator);
        let schema = load_schema(&path)?;

        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema)
            .map_err(|e| ApiError::InvalidSchema {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let errors = match serde_json::from_str::<Value>(body) {
            Ok(instance) => match compiled.validate(&instance) {
                Ok(()) => Vec::new(),
                Err(errors) => errors
                    .map(|e| {
                        let pointer = e.instance_path.to_string();
                        if pointer.is_empty() {
                            e.to_string()
                        } else {
                            format!("{pointer}: {e}")
                        }
                    })
                    .collect(),
            },
            Err(e) => vec![format!("response body is not JSON: {e}")],
        };

        if errors.is_empty() {
            debug!(schema = %path.display(), "Schema validation passed");
        } else {
            error!(schema = %path.display(), errors = ?errors, "Schema validation failed");
        }

        Ok(SchemaReport {
            schema: path,
            errors,
        })
    }

    pub fn validate_response(
        &self,
        locator: &SchemaLocator,
        response: &ApiResponse,
    ) -> ApiResult<SchemaReport> {
        self.validate_str(locator, response.body())
    }
}

fn load_schema(path: &Path) -> ApiResult<Value> {
    if !path.is_file() {
        return Err(ApiError::SchemaNotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| ApiError::InvalidSchema {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&text).map_err(|e| ApiError::InvalidSchema {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
