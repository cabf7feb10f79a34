use std::fmt;
use std::ops::Range;

use thiserror::Error;

/// One end of a [`LineRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// A 1-indexed line number.
    Line(usize),
    /// The last line of the list (`$`).
    Last,
}

impl Address {
    fn parse(raw: &str) -> Result<Self, RangeError> {
        let raw = raw.trim();
        if raw == "$" {
            return Ok(Self::Last);
        }
        match raw.parse::<usize>() {
            Ok(0) => Err(RangeError::ZeroLine),
            Ok(line) => Ok(Self::Line(line)),
            Err(_) => Err(RangeError::InvalidAddress(raw.to_owned())),
        }
    }

    /// Zero-based index of this address in a list of `len` lines.
    const fn index(self, len: usize) -> usize {
        match self {
            Self::Line(line) => line - 1,
            Self::Last => len.saturating_sub(1),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "{line}"),
            Self::Last => f.write_str("$"),
        }
    }
}

/// Errors produced while parsing a range specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// An address that is neither a number nor `$`.
    #[error("invalid line address '{0}'")]
    InvalidAddress(String),
    /// Line numbers are 1-indexed.
    #[error("line numbers start at 1")]
    ZeroLine,
    /// The start address comes after the end address.
    #[error("range start {start} is after range end {end}")]
    Reversed {
        /// First line of the range.
        start: usize,
        /// Last line of the range.
        end: usize,
    },
}

/// Inclusive, 1-indexed line range such as `3`, `2,5`, `4,$` or `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    start: Address,
    end: Address,
}

impl LineRange {
    /// Range covering a single line.
    #[must_use]
    pub const fn line(line: usize) -> Self {
        Self {
            start: Address::Line(line),
            end: Address::Line(line),
        }
    }

    /// Range covering every line of a list.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: Address::Line(1),
            end: Address::Last,
        }
    }

    /// Build a range from two addresses.
    ///
    /// # Errors
    /// Returns [`RangeError::ZeroLine`] for a zero line number and
    /// [`RangeError::Reversed`] when both ends are numeric and out of order.
    pub const fn new(start: Address, end: Address) -> Result<Self, RangeError> {
        if matches!(start, Address::Line(0)) || matches!(end, Address::Line(0)) {
            return Err(RangeError::ZeroLine);
        }
        if let (Address::Line(s), Address::Line(e)) = (start, end)
            && s > e
        {
            return Err(RangeError::Reversed { start: s, end: e });
        }
        Ok(Self { start, end })
    }

    /// Parse a range specification.
    ///
    /// Blank input selects nothing and yields `Ok(None)`.
    ///
    /// # Errors
    /// Returns a [`RangeError`] when the specification is malformed.
    pub fn parse(input: &str) -> Result<Option<Self>, RangeError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(None);
        }
        if input == "," || input == "%" {
            return Ok(Some(Self::all()));
        }
        let range = match input.split_once(',') {
            Some((start, end)) => Self::new(Address::parse(start)?, Address::parse(end)?)?,
            None => {
                let address = Address::parse(input)?;
                Self::new(address, address)?
            }
        };
        Ok(Some(range))
    }

    /// First address of the range.
    #[must_use]
    pub const fn start(&self) -> Address {
        self.start
    }

    /// Last address of the range.
    #[must_use]
    pub const fn end(&self) -> Address {
        self.end
    }

    /// Zero-based, half-open index range selected in a list of `len` lines.
    ///
    /// Addresses past the end are clamped so only existing lines are selected;
    /// the result is empty when nothing remains.
    #[must_use]
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let start = self.start.index(len).min(len);
        let end = match self.end {
            Address::Line(line) => line.min(len),
            Address::Last => len,
        };
        start..end.max(start)
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{},{}", self.start, self.end)
        }
    }
}
