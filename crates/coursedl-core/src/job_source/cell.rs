//! A1-style cell references (`A2`, `AB17`).

use anyhow::{bail, Result};
use std::fmt;

/// Zero-based row/column of a worksheet cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: u32,
    pub col: u32,
}

impl CellRef {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse `"B12"` into row 11, col 1. Letters are case-insensitive.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);
        if letters.is_empty() || digits.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic())
        {
            bail!("invalid cell reference: {:?}", s);
        }

        let mut col: u32 = 0;
        for c in letters.chars() {
            let v = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
            col = col
                .checked_mul(26)
                .and_then(|n| n.checked_add(v))
                .ok_or_else(|| anyhow::anyhow!("cell column out of range: {:?}", s))?;
        }
        let row: u32 = digits
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid cell row: {:?}", s))?;
        if row == 0 {
            bail!("cell rows start at 1: {:?}", s);
        }
        Ok(Self {
            row: row - 1,
            col: col - 1,
        })
    }

    fn column_letters(&self) -> String {
        let mut n = self.col + 1;
        let mut out = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            out.push((b'A' + rem as u8) as char);
            n = (n - 1) / 26;
        }
        out.iter().rev().collect()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column_letters(), self.row + 1)
    }
}
