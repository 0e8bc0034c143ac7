/// Resource limits for one interpreter run.
#[derive(Debug, Clone)]
pub struct RunOption {
    /// Budget for interned string storage, counting every buffer the run
    /// owns (literals, global names, concat results).
    pub max_string_bytes: usize,
    /// Largest accepted source, in bytes.
    pub max_source_bytes: usize,
}

impl Default for RunOption {
    fn default() -> Self {
        RunOption {
            max_string_bytes: 64 * 1024 * 1024,
            max_source_bytes: 1024 * 1024,
        }
    }
}
