/// Errors raised while turning planner output into a [`crate::LayoutPlan`].
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The planner returned nothing to parse.
    #[error("planner returned an empty response")]
    Empty,

    /// The response was not a JSON plan object.
    #[error("failed to parse JSON response: {message}. Response was: {excerpt}")]
    Json { message: String, excerpt: String },
}
