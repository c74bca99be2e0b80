use std::ops::Range;

/// File extensions (without the dot) that mark an embed as an image
pub const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "svg", "webp"];

/// A `![[...]]` embed located in a piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    /// Byte range of the whole embed, markers included
    pub span: Range<usize>,
    /// Text between `![[` and `]]`, untrimmed
    pub inner: &'a str,
}

impl<'a> LinkMatch<'a> {
    pub fn new(span: Range<usize>, inner: &'a str) -> Self {
        Self { span, inner }
    }

    pub fn parse(&self) -> ParsedLink {
        ParsedLink::parse(self.inner)
    }
}

/// The meaningful part of an embed once display parameters are dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLink {
    pub path_part: String,
    pub has_image_extension: bool,
}

impl ParsedLink {
    /// Parse the inner content of an embed.
    ///
    /// Everything after the first `|` (sizes, alt text) is discarded.
    pub fn parse(inner: &str) -> Self {
        let inner = inner.trim();
        let path_part = inner
            .split_once('|')
            .map_or(inner, |(path, _params)| path)
            .trim();

        Self {
            path_part: path_part.to_string(),
            has_image_extension: has_image_extension(path_part),
        }
    }
}

fn has_image_extension(path: &str) -> bool {
    path.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
    })
}
