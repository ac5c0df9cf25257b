//! Helvetica advance widths, used to wrap text the way it will be drawn.

use textwrap::core::Fragment;
use unicode_width::UnicodeWidthChar;

/// Millimetres per PDF point
pub const MM_PER_PT: f32 = 25.4 / 72.0;

// Standard 14 font metrics for Helvetica, printable ASCII 0x20..=0x7E,
// in thousandths of an em.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0' .. '?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@' .. 'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P' .. '_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`' .. 'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p' .. '~'
];

/// Advance of `c` in thousandths of an em
pub fn glyph_units(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_ASCII[c as usize - 0x20],
        '•' => 350,
        '→' => 889,
        _ => match c.width() {
            Some(2) => 1000,
            Some(0) => 0,
            _ => 556,
        },
    }
}

/// Advance of `c` in millimetres at `font_size` points
pub fn advance_mm(c: char, font_size: f32) -> f32 {
    glyph_units(c) as f32 / 1000.0 * font_size * MM_PER_PT
}

/// Width of `text` in millimetres at `font_size` points
pub fn text_width_mm(text: &str, font_size: f32) -> f32 {
    text.chars().map(|c| advance_mm(c, font_size)).sum()
}

/// A run of text measured in millimetres, ready for line breaking
#[derive(Debug, Clone, PartialEq)]
pub struct Word<'a> {
    pub text: &'a str,
    width: f64,
    space: f64,
}

impl Fragment for Word<'_> {
    fn width(&self) -> f64 {
        self.width
    }

    fn whitespace_width(&self) -> f64 {
        self.space
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Split one line of text into measured words.
///
/// A word wider than `max_width` is cut into pieces that each fit; the
/// pieces carry no trailing space so a line break between them is silent.
pub fn measure_words(line: &str, font_size: f32, max_width: f64) -> Vec<Word<'_>> {
    let space = f64::from(advance_mm(' ', font_size));
    let mut words = Vec::new();

    for text in line.split_whitespace() {
        let width = f64::from(text_width_mm(text, font_size));
        if width <= max_width {
            words.push(Word { text, width, space });
            continue;
        }

        let mut start = 0;
        let mut piece_width = 0.0;
        for (idx, c) in text.char_indices() {
            let w = f64::from(advance_mm(c, font_size));
            if idx > start && piece_width + w > max_width {
                words.push(Word {
                    text: &text[start..idx],
                    width: piece_width,
                    space: 0.0,
                });
                start = idx;
                piece_width = 0.0;
            }
            piece_width += w;
        }
        words.push(Word {
            text: &text[start..],
            width: piece_width,
            space,
        });
    }

    words
}

/// Join the words of one broken line back into text
pub fn join_words(words: &[Word<'_>]) -> String {
    let mut line = String::new();
    for (i, word) in words.iter().enumerate() {
        line.push_str(word.text);
        if i + 1 < words.len() && word.space > 0.0 {
            line.push(' ');
        }
    }
    line
}
