use certsuite_core_types::RunId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and the warnings attached to a comparison outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    // Comparison run
    /// One input artifact could not be unpacked or parsed
    MalformedArtifact,
    /// A required informative section is entirely absent
    IncompleteRun,
    /// The probing/collection step failed before comparison could start
    InfrastructureError,

    // Configuration/Input
    InvalidConfig,
    InvalidInput,

    // Integration/IO
    Io,
    Serialization,

    // Output
    /// The result document did not survive a serialization round-trip
    DeterminismViolation,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::MalformedArtifact => "ERR_MALFORMED_ARTIFACT",
            ExErrorKind::IncompleteRun => "ERR_INCOMPLETE_RUN",
            ExErrorKind::InfrastructureError => "ERR_INFRASTRUCTURE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::DeterminismViolation => "ERR_DETERMINISM_VIOLATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether this kind is recorded as a warning rather than failing a run
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ExErrorKind::MalformedArtifact | ExErrorKind::IncompleteRun
        )
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and context for
/// debugging: the failing operation, the artifact handle, the privilege
/// context and the result section involved.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    artifact: Option<String>,
    context: Option<String>,
    section: Option<String>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            artifact: None,
            context: None,
            section: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the artifact handle (path or logical name)
    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    /// Add the privilege context name
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add the result section name
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the artifact handle, if any
    pub fn artifact(&self) -> Option<&str> {
        self.artifact.as_deref()
    }

    /// Get the privilege context, if any
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Get the result section, if any
    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(artifact) = &self.artifact {
            write!(f, " (artifact: {})", artifact)?;
        }
        if let Some(context) = &self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(section) = &self.section {
            write!(f, " (section: {})", section)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Typed failure sites raised by the artifact loaders and configuration layer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CertError {
    /// WebIDL source could not be parsed
    #[error("WebIDL syntax error in {source_name} at line {line}: {message}")]
    WebIdlSyntax {
        source_name: String,
        line: usize,
        message: String,
    },

    /// Archive could not be opened or an entry could not be read
    #[error("Archive {artifact} could not be unpacked: {reason}")]
    ArchiveUnreadable { artifact: String, reason: String },

    /// The same path appears twice in one bundle
    #[error("Duplicate path {path} in bundle {artifact}")]
    DuplicateBundlePath { artifact: String, path: String },

    /// Observed-interface probe document is not in the expected shape
    #[error("Invalid probe document {artifact}: {reason}")]
    InvalidProbeDocument { artifact: String, reason: String },

    /// Global-object document is not in the expected shape
    #[error("Invalid global-object document {artifact}: {reason}")]
    InvalidGlobalObjectDocument { artifact: String, reason: String },

    /// The device-side collection step produced nothing usable
    #[error("Collection of {artifact} failed: {reason}")]
    CollectionFailed { artifact: String, reason: String },

    /// Context name outside {web, privileged, certified}
    #[error("Unknown context: {name}")]
    UnknownContext { name: String },

    /// Logging profile name not recognised
    #[error("Unknown logging profile: {name}")]
    UnknownProfile { name: String },

    /// Run configuration could not be parsed
    #[error("Invalid run configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A required informative section has no data
    #[error("Required informative section missing: {section}")]
    MissingInformativeSection { section: String },

    /// File could not be read
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },

    /// Serialization failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<CertError> for ExError {
    fn from(err: CertError) -> Self {
        match err {
            CertError::WebIdlSyntax {
                source_name,
                line,
                message,
            } => ExError::new(ExErrorKind::MalformedArtifact)
                .with_op("parse_webidl")
                .with_artifact(source_name)
                .with_message(format!("line {}: {}", line, message)),

            CertError::ArchiveUnreadable { artifact, reason } => {
                ExError::new(ExErrorKind::MalformedArtifact)
                    .with_op("load_bundle")
                    .with_artifact(artifact)
                    .with_message(reason)
            }

            CertError::DuplicateBundlePath { artifact, path } => {
                ExError::new(ExErrorKind::MalformedArtifact)
                    .with_op("load_bundle")
                    .with_artifact(artifact)
                    .with_message(format!("duplicate path {}", path))
            }

            CertError::InvalidProbeDocument { artifact, reason } => {
                ExError::new(ExErrorKind::MalformedArtifact)
                    .with_op("load_observed_interfaces")
                    .with_artifact(artifact)
                    .with_message(reason)
            }

            CertError::InvalidGlobalObjectDocument { artifact, reason } => {
                ExError::new(ExErrorKind::MalformedArtifact)
                    .with_op("load_global_objects")
                    .with_artifact(artifact)
                    .with_message(reason)
            }

            CertError::CollectionFailed { artifact, reason } => {
                ExError::new(ExErrorKind::InfrastructureError)
                    .with_artifact(artifact)
                    .with_message(reason)
            }

            CertError::UnknownContext { name } => ExError::new(ExErrorKind::InvalidConfig)
                .with_context(name.clone())
                .with_message(format!("unknown context '{}'", name)),

            CertError::UnknownProfile { name } => ExError::new(ExErrorKind::InvalidConfig)
                .with_message(format!("unknown logging profile '{}'", name)),

            CertError::InvalidConfig { reason } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(reason)
            }

            CertError::MissingInformativeSection { section } => {
                ExError::new(ExErrorKind::IncompleteRun)
                    .with_op("aggregate")
                    .with_section(section)
                    .with_message("required informative section is absent")
            }

            CertError::Io { path, message } => ExError::new(ExErrorKind::Io)
                .with_artifact(path)
                .with_message(message),

            CertError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to CertError
impl From<serde_json::Error> for CertError {
    fn from(err: serde_json::Error) -> Self {
        CertError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Create an IO error for the given path
pub fn io_error(path: &std::path::Path, err: std::io::Error) -> ExError {
    CertError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_error_kind_codes() {
        let cases = [
            (ExErrorKind::MalformedArtifact, "ERR_MALFORMED_ARTIFACT"),
            (ExErrorKind::IncompleteRun, "ERR_INCOMPLETE_RUN"),
            (ExErrorKind::InfrastructureError, "ERR_INFRASTRUCTURE"),
            (ExErrorKind::InvalidConfig, "ERR_INVALID_CONFIG"),
            (ExErrorKind::DeterminismViolation, "ERR_DETERMINISM_VIOLATION"),
        ];
        for (kind, expected_code) in cases {
            assert_eq!(kind.code(), expected_code, "Wrong code for {:?}", kind);
        }
    }

    #[test]
    fn test_only_artifact_and_incomplete_run_are_warnings() {
        assert!(ExErrorKind::MalformedArtifact.is_warning());
        assert!(ExErrorKind::IncompleteRun.is_warning());
        assert!(!ExErrorKind::InfrastructureError.is_warning());
        assert!(!ExErrorKind::Io.is_warning());
    }

    #[test]
    fn test_webidl_syntax_maps_to_malformed_artifact() {
        let err: ExError = CertError::WebIdlSyntax {
            source_name: "Navigator.webidl".into(),
            line: 12,
            message: "expected ';'".into(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::MalformedArtifact);
        assert_eq!(err.artifact(), Some("Navigator.webidl"));
        assert!(err.message().contains("line 12"));
    }

    #[test]
    fn test_collection_failure_is_infrastructure_error() {
        let err: ExError = CertError::CollectionFailed {
            artifact: "webidl_web.json".into(),
            reason: "marionette session lost".into(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InfrastructureError);
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::MalformedArtifact)
            .with_op("load_global_objects")
            .with_context("certified")
            .with_message("not an array");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_MALFORMED_ARTIFACT]"));
        assert!(rendered.contains("load_global_objects"));
        assert!(rendered.contains("(context: certified)"));
    }
}
