/// Error type for code emission.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CodegenError {
    /// A node reached the emitter without a component name.
    #[error("cannot emit a component without a type (at {path})")]
    MissingType { path: String },

    /// A prop value could not be rendered as a literal.
    #[error("failed to serialize prop '{key}': {message}")]
    PropValue { key: String, message: String },
}
