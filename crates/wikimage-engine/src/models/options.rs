/// Settings that shape how image embeds are rewritten.
///
/// Fixed for the whole run; every file sees the same options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Prefix bare relative paths with `./` so editors resolve them next to the note
    pub add_dot_slash_prefix: bool,
    /// Compute and report rewrites without touching any file
    pub dry_run: bool,
}

impl RewriteOptions {
    pub fn new(add_dot_slash_prefix: bool) -> Self {
        Self {
            add_dot_slash_prefix,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self::new(true)
    }
}
