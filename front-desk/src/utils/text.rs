//! Fixed-width plain text layout for tickets and invoices
//!
//! Widths are counted in characters. Common widths:
//! - 58mm paper: 32 characters
//! - 80mm paper: 48 characters

/// Character width of a string
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate to at most `max_width` characters
pub fn truncate(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad (or truncate) to exactly `width` characters
pub fn pad(s: &str, width: usize, align_right: bool) -> String {
    let current = text_width(s);
    if current >= width {
        return truncate(s, width);
    }
    let spaces = " ".repeat(width - current);
    if align_right {
        format!("{}{}", spaces, s)
    } else {
        format!("{}{}", s, spaces)
    }
}

/// Line-oriented text builder
#[derive(Debug, Clone)]
pub struct TextBuilder {
    buf: String,
    width: usize,
}

impl TextBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width: width.max(16),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Text followed by newline
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.buf.push_str(s);
        self.buf.push('\n');
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// Centered line (truncated to width)
    pub fn center(&mut self, s: &str) -> &mut Self {
        let s = truncate(s, self.width);
        let left = (self.width - text_width(&s)) / 2;
        let line = format!("{}{}", " ".repeat(left), s);
        self.line(line.trim_end())
    }

    /// Line of '=' characters
    pub fn sep_double(&mut self) -> &mut Self {
        self.line(&"=".repeat(self.width))
    }

    /// Line of '-' characters
    pub fn sep_single(&mut self) -> &mut Self {
        self.line(&"-".repeat(self.width))
    }

    /// Left and right text on the same line, gap filled with spaces
    pub fn line_lr(&mut self, left: &str, right: &str) -> &mut Self {
        let lw = text_width(left);
        let rw = text_width(right);
        if lw + rw >= self.width {
            // Too long, wrap the right side
            self.line(left);
            let padded = pad(right, self.width, true);
            self.line(&padded)
        } else {
            let line = format!("{}{}{}", left, " ".repeat(self.width - lw - rw), right);
            self.line(&line)
        }
    }

    /// Columns with fixed widths; the last column is right-aligned
    pub fn columns(&mut self, cells: &[(&str, usize)]) -> &mut Self {
        let last = cells.len().saturating_sub(1);
        let line: String = cells
            .iter()
            .enumerate()
            .map(|(i, (text, width))| pad(text, *width, i == last && i > 0))
            .collect::<Vec<_>>()
            .join(" ");
        self.line(line.trim_end())
    }

    pub fn build(self) -> String {
        self.buf
    }
}
