//! Page layout engine: fixed-size pages, top-to-bottom cursor, word wrap.

/// Page width in characters.
pub const PAGE_WIDTH: usize = 90;

/// Page height in lines.
pub const PAGE_HEIGHT: usize = 56;

/// Separator between pages in the rendered byte stream.
const PAGE_BREAK: char = '\u{0C}';

/// Builds a paginated document line by line.
///
/// The cursor advances top-to-bottom; when a page fills, the next line starts
/// a fresh page. Callers emit pre-wrapped lines via [`PageBuilder::wrapped`]
/// or fixed bands via the other helpers.
pub struct PageBuilder {
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    /// Emits one raw line, truncated to the page width.
    pub fn line(&mut self, text: &str) {
        if self.current.len() == PAGE_HEIGHT {
            self.break_page();
        }
        let mut line: String = text.chars().take(PAGE_WIDTH).collect();
        while line.ends_with(' ') {
            line.pop();
        }
        self.current.push(line);
    }

    pub fn blank(&mut self) {
        self.line("");
    }

    /// Horizontal rule across the full page width.
    pub fn rule(&mut self) {
        self.line(&"-".repeat(PAGE_WIDTH));
    }

    /// Double rule, used for band boundaries.
    pub fn heavy_rule(&mut self) {
        self.line(&"=".repeat(PAGE_WIDTH));
    }

    /// Centers text on the page.
    pub fn centered(&mut self, text: &str) {
        let len = text.chars().count().min(PAGE_WIDTH);
        let pad = (PAGE_WIDTH - len) / 2;
        self.line(&format!("{}{}", " ".repeat(pad), text));
    }

    /// Label/value pair in two fixed columns.
    pub fn field(&mut self, label: &str, value: &str) {
        self.line(&format!("{:<24}{}", label, value));
    }

    /// Word-wrapped paragraph with an optional hanging indent.
    pub fn wrapped(&mut self, text: &str, indent: usize) {
        let width = PAGE_WIDTH.saturating_sub(indent);
        let pad = " ".repeat(indent);
        for line in wrap(text, width) {
            self.line(&format!("{}{}", pad, line));
        }
    }

    /// Forces the next line onto a new page.
    pub fn break_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
    }

    /// Serializes all pages, form-feed separated, as document bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if !self.current.is_empty() {
            self.break_page();
        }
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push(PAGE_BREAK);
            }
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
        }
        out.into_bytes()
    }
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Breaks text into lines of at most `width` characters without splitting
/// words. A single word longer than `width` is hard-broken.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    assert!(width > 0, "wrap width must be positive");

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        for piece in hard_break(word, width) {
            let needed = if current.is_empty() {
                piece.chars().count()
            } else {
                current.chars().count() + 1 + piece.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&piece);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Splits a single word into chunks no longer than `width`.
fn hard_break(word: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    if chars.len() <= width {
        return vec![word.to_string()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
