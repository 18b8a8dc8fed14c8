//! Text measurement for the builtin Helvetica faces.
//!
//! Widths are the standard Helvetica AFM advance widths (1/1000 em) for
//! printable ASCII. Bold text is measured with the regular table scaled up,
//! which slightly overestimates and therefore wraps early rather than
//! overflowing a cell.

/// Millimetres per PostScript point.
pub const PT_TO_MM: f32 = 0.352_778;

const BOLD_SCALE: f32 = 1.07;

/// Fallback width for characters outside printable ASCII.
const DEFAULT_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // ' ' .. '/'
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // '0' .. '?'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // '@' .. 'O'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 'P' .. '_'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // '`' .. 'o'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 'p' .. '~'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Typeface used for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

fn char_width(ch: char) -> u16 {
    match ch {
        ' '..='~' => HELVETICA_WIDTHS[ch as usize - 0x20],
        _ => DEFAULT_WIDTH,
    }
}

/// Width of `text` in millimetres at `size` points.
pub fn text_width(text: &str, size: f32, face: Face) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    let width = units as f32 / 1000.0 * size * PT_TO_MM;
    match face {
        Face::Regular => width,
        Face::Bold => width * BOLD_SCALE,
    }
}

/// Greedy word wrap into lines no wider than `max_width` millimetres.
///
/// Explicit newlines are kept. Words wider than a full line are broken
/// between characters. Always returns at least one line.
pub fn wrap(text: &str, max_width: f32, size: f32, face: Face) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };
            if text_width(&candidate, size, face) <= max_width {
                line = candidate;
                continue;
            }
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if text_width(word, size, face) <= max_width {
                line = word.to_string();
            } else {
                for ch in word.chars() {
                    let mut next = line.clone();
                    next.push(ch);
                    if !line.is_empty() && text_width(&next, size, face) > max_width {
                        lines.push(std::mem::take(&mut line));
                        line.push(ch);
                    } else {
                        line = next;
                    }
                }
            }
        }
        lines.push(line);
    }
    lines
}

/// Whether a character can be shown with the builtin fonts (WinAnsi).
pub fn is_encodable(ch: char) -> bool {
    matches!(ch, ' '..='~' | '\u{A0}'..='\u{FF}')
        || matches!(
            ch,
            '€' | '‚' | 'ƒ' | '„' | '…' | '†' | '‡' | 'ˆ' | '‰' | 'Š' | '‹' | 'Œ' | 'Ž' | '‘'
                | '’' | '“' | '”' | '•' | '–' | '—' | '˜' | '™' | 'š' | '›' | 'œ' | 'ž' | 'Ÿ'
        )
}
