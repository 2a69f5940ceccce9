/// Tuning for [`crate::ReconParser`].
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Maximum number of simultaneously open attribute and record bodies.
    /// The nesting stack never grows beyond this; deeper input fails with
    /// `NestingTooDeep`.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}
