use std::fmt;
use std::str::FromStr;

use crate::error::Md2PdfError;

/// Named paper sizes understood by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperFormat {
    Letter,
    Legal,
    Tabloid,
    Ledger,
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
}

impl PaperFormat {
    /// Portrait width and height in inches. Chromium swaps them itself when
    /// printing in landscape.
    pub fn size_inches(self) -> (f64, f64) {
        match self {
            PaperFormat::Letter => (8.5, 11.0),
            PaperFormat::Legal => (8.5, 14.0),
            PaperFormat::Tabloid => (11.0, 17.0),
            PaperFormat::Ledger => (17.0, 11.0),
            PaperFormat::A0 => (33.1, 46.8),
            PaperFormat::A1 => (23.4, 33.1),
            PaperFormat::A2 => (16.54, 23.4),
            PaperFormat::A3 => (11.7, 16.54),
            PaperFormat::A4 => (8.27, 11.7),
            PaperFormat::A5 => (5.83, 8.27),
            PaperFormat::A6 => (4.13, 5.83),
        }
    }
}

impl FromStr for PaperFormat {
    type Err = Md2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = match s.trim().to_ascii_lowercase().as_str() {
            "letter" => PaperFormat::Letter,
            "legal" => PaperFormat::Legal,
            "tabloid" => PaperFormat::Tabloid,
            "ledger" => PaperFormat::Ledger,
            "a0" => PaperFormat::A0,
            "a1" => PaperFormat::A1,
            "a2" => PaperFormat::A2,
            "a3" => PaperFormat::A3,
            "a4" => PaperFormat::A4,
            "a5" => PaperFormat::A5,
            "a6" => PaperFormat::A6,
            _ => return Err(Md2PdfError::UnknownPaperFormat(s.to_string())),
        };
        Ok(format)
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A CSS length as accepted by the margin flags. A bare number means pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Length {
    raw: String,
    inches: f64,
}

impl Length {
    pub fn mm(value: f64) -> Self {
        Self {
            raw: format!("{}mm", value),
            inches: value / 25.4,
        }
    }

    pub fn inches(&self) -> f64 {
        self.inches
    }
}

impl FromStr for Length {
    type Err = Md2PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| Md2PdfError::InvalidLength(s.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(Md2PdfError::InvalidLength(s.to_string()));
        }

        let per_inch = match unit.to_ascii_lowercase().as_str() {
            "" | "px" => 96.0,
            "in" => 1.0,
            "cm" => 2.54,
            "mm" => 25.4,
            _ => return Err(Md2PdfError::InvalidLength(s.to_string())),
        };

        Ok(Self {
            raw: trimmed.to_string(),
            inches: value / per_inch,
        })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
