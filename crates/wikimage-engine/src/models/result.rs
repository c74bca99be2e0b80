/// Outcome of rewriting one piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    pub original_text: String,
    pub new_text: String,
    /// Number of image embeds converted
    pub replacement_count: usize,
}

impl RewriteResult {
    /// Whether the rewrite produced text that differs from the input
    pub fn is_changed(&self) -> bool {
        self.new_text != self.original_text
    }

    /// A file only needs writing when images were converted and the text moved
    pub fn needs_write(&self) -> bool {
        self.replacement_count > 0 && self.is_changed()
    }
}
