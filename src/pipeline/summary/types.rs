use super::SummaryError;

/// Abstraction over the generative model that writes the records summary.
/// One prompt in, one block of Markdown-flavoured prose out.
pub trait SummaryClient {
    fn generate(&self, prompt: &str) -> Result<String, SummaryError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
