//! Seed rendering error types.

/// Seed rendering error.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Handlebars rendering error.
    #[error("Seed rendering error: {0}")]
    RenderError(#[from] handlebars::RenderError),

    /// Template registration error.
    #[error("Seed template registration error: {0}")]
    RegistrationError(#[from] Box<handlebars::TemplateError>),
}
