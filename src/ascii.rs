//! ASCII-art flag.
//!
//! The canton is drawn with alternating rows of 6 and 5 star characters; the rest of each
//! canton row and every row below it is filled with the stripe character:
//!
//! ```text
//! * * * * * * ==================================
//!  * * * * *  ==================================
//! ...
//! ==============================================
//! ```
//!
//! Every row, including the last, ends with `'\n'`.

use std::fmt;

/// Columns taken by the star block on each canton row.
pub const CANTON_COLUMNS: usize = 12;

/// Upper bound on `rows` and `width`.
pub const MAX_DIMENSION: usize = 4096;

/// Errors produced when building an ASCII flag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AsciiFlagError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Flag dimensions in character cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AsciiFlagOptions {
    /// Total number of rows (and line breaks).
    pub rows: usize,
    /// Leading rows that carry stars.
    pub canton_rows: usize,
    /// Characters per row, excluding the line break.
    pub width: usize,
}

impl Default for AsciiFlagOptions {
    fn default() -> Self {
        Self {
            rows: 15,
            canton_rows: 9,
            width: 46,
        }
    }
}

impl AsciiFlagOptions {
    fn validate(&self) -> Result<(), AsciiFlagError> {
        if self.rows == 0 {
            return Err(AsciiFlagError::InvalidArgument(
                "rows must be at least 1".to_string(),
            ));
        }
        if self.rows > MAX_DIMENSION || self.width > MAX_DIMENSION {
            return Err(AsciiFlagError::InvalidArgument(format!(
                "flag is {}x{} cells; rows and width are limited to {MAX_DIMENSION}",
                self.width, self.rows
            )));
        }
        if self.canton_rows > self.rows {
            return Err(AsciiFlagError::InvalidArgument(format!(
                "canton_rows ({}) cannot exceed rows ({})",
                self.canton_rows, self.rows
            )));
        }
        if self.canton_rows > 0 && self.width < CANTON_COLUMNS {
            return Err(AsciiFlagError::InvalidArgument(format!(
                "width ({}) must be at least {CANTON_COLUMNS} to fit the canton",
                self.width
            )));
        }
        Ok(())
    }
}

/// A validated ASCII flag description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiFlag {
    star: char,
    stripe: char,
    options: AsciiFlagOptions,
}

fn single_char(name: &str, value: &str) -> Result<char, AsciiFlagError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(AsciiFlagError::InvalidArgument(format!(
            "{name} must be exactly one character, got {value:?} ({} characters)",
            value.chars().count()
        ))),
    }
}

impl AsciiFlag {
    /// `star` and `stripe` must each be exactly one character.
    pub fn new(star: &str, stripe: &str) -> Result<Self, AsciiFlagError> {
        Ok(Self {
            star: single_char("star", star)?,
            stripe: single_char("stripe", stripe)?,
            options: AsciiFlagOptions::default(),
        })
    }

    pub fn with_options(mut self, options: AsciiFlagOptions) -> Result<Self, AsciiFlagError> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    #[inline]
    pub fn options(&self) -> &AsciiFlagOptions {
        &self.options
    }

    fn canton_cells(&self, row: usize) -> String {
        let mut cells = String::with_capacity(CANTON_COLUMNS * 4);
        let (stars, lead) = if row % 2 == 0 { (6, "") } else { (5, " ") };
        cells.push_str(lead);
        for _ in 0..stars {
            cells.push(self.star);
            cells.push(' ');
        }
        cells.push_str(lead);
        cells
    }

    /// Render to a string with exactly `options.rows` line breaks.
    pub fn render(&self) -> String {
        let AsciiFlagOptions {
            rows,
            canton_rows,
            width,
        } = self.options;
        let stripe_row: String = std::iter::repeat_n(self.stripe, width).collect();

        let cell_bytes = self.stripe.len_utf8().max(self.star.len_utf8());
        let row_bytes = (width + 1).saturating_mul(cell_bytes);
        let mut out = String::with_capacity(rows.saturating_mul(row_bytes));
        for row in 0..rows {
            if row < canton_rows {
                out.push_str(&self.canton_cells(row));
                out.extend(std::iter::repeat_n(self.stripe, width - CANTON_COLUMNS));
            } else {
                out.push_str(&stripe_row);
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for AsciiFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Build the default-size ASCII flag from one star and one stripe character.
pub fn create_flag(star: &str, stripe: &str) -> Result<String, AsciiFlagError> {
    Ok(AsciiFlag::new(star, stripe)?.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_breaks_match_row_count() {
        let s = create_flag("*", "=").unwrap();
        assert_eq!(s.matches('\n').count(), AsciiFlagOptions::default().rows);
        assert!(s.ends_with('\n'));
    }

    #[test]
    fn rows_have_uniform_width() {
        let s = create_flag("*", "=").unwrap();
        for line in s.lines() {
            assert_eq!(line.chars().count(), 46, "line {line:?}");
        }
    }

    #[test]
    fn canton_rows_alternate_six_and_five_stars() {
        let s = create_flag("*", "=").unwrap();
        let stars: Vec<usize> = s.lines().map(|l| l.matches('*').count()).collect();
        assert_eq!(stars, vec![6, 5, 6, 5, 6, 5, 6, 5, 6, 0, 0, 0, 0, 0, 0]);
        assert!(s.lines().next().unwrap().starts_with("* * * * * * ="));
        assert!(s.lines().nth(1).unwrap().starts_with(" * * * * *  ="));
    }

    #[test]
    fn multi_character_arguments_are_rejected() {
        let err = create_flag("**", "=").unwrap_err();
        assert!(matches!(err, AsciiFlagError::InvalidArgument(ref m) if m.contains("star")));

        let err = create_flag("*", "==").unwrap_err();
        assert!(matches!(err, AsciiFlagError::InvalidArgument(ref m) if m.contains("stripe")));

        assert!(create_flag("", "=").is_err());
    }

    #[test]
    fn non_ascii_single_characters_are_accepted() {
        let s = create_flag("★", "─").unwrap();
        assert_eq!(s.matches('★').count(), 50);
    }

    #[test]
    fn custom_options_are_validated() {
        let flag = AsciiFlag::new("*", "-").unwrap();
        let small = flag
            .clone()
            .with_options(AsciiFlagOptions {
                rows: 4,
                canton_rows: 2,
                width: 20,
            })
            .unwrap();
        let text = small.to_string();
        assert_eq!(text.matches('\n').count(), 4);
        assert_eq!(text.lines().last().unwrap(), "-".repeat(20));

        let err = flag
            .clone()
            .with_options(AsciiFlagOptions {
                rows: 3,
                canton_rows: 5,
                width: 20,
            })
            .unwrap_err();
        assert!(matches!(err, AsciiFlagError::InvalidArgument(_)));

        assert!(
            flag.with_options(AsciiFlagOptions {
                rows: 3,
                canton_rows: 1,
                width: 4,
            })
            .is_err()
        );
    }

    #[test]
    fn oversized_options_are_rejected() {
        let flag = AsciiFlag::new("*", "=").unwrap();
        for options in [
            AsciiFlagOptions {
                rows: usize::MAX,
                canton_rows: 0,
                width: usize::MAX,
            },
            AsciiFlagOptions {
                rows: 2,
                canton_rows: 0,
                width: MAX_DIMENSION + 1,
            },
            AsciiFlagOptions {
                rows: MAX_DIMENSION + 1,
                canton_rows: 9,
                width: 46,
            },
        ] {
            let err = flag.clone().with_options(options).unwrap_err();
            assert!(matches!(err, AsciiFlagError::InvalidArgument(ref m) if m.contains("limited")));
        }

        let largest = flag
            .with_options(AsciiFlagOptions {
                rows: 1,
                canton_rows: 1,
                width: MAX_DIMENSION,
            })
            .unwrap()
            .render();
        assert_eq!(largest.chars().count(), MAX_DIMENSION + 1);
    }
}
