use crate::{Error, Result};
use std::fmt;

/// One input bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    /// Parse a `'0'`/`'1'` character found at `position` of the input.
    pub fn from_char(c: char, position: usize) -> Result<Self> {
        match c {
            '0' => Ok(Bit::Zero),
            '1' => Ok(Bit::One),
            found => Err(Error::InvalidInput { position, found }),
        }
    }

    #[inline(always)]
    pub fn level(self) -> u8 {
        self as u8
    }
}

/// A pair of half-bit potential levels emitted for one input bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Symbol {
    S00 = 0b00,
    S01 = 0b01,
    S10 = 0b10,
    S11 = 0b11,
}

impl Symbol {
    /// 2-bit code, first half-bit level in the high bit.
    #[inline(always)]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    pub fn levels(self) -> [u8; 2] {
        let code = self.code();
        [code >> 1, code & 1]
    }
}

impl TryFrom<u8> for Symbol {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0b00 => Ok(Symbol::S00),
            0b01 => Ok(Symbol::S01),
            0b10 => Ok(Symbol::S10),
            0b11 => Ok(Symbol::S11),
            _ => Err(Error::InvalidState(code)),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02b}", self.code())
    }
}

/// Output of one encoding run: exactly one symbol per input bit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Encoded {
    symbols: Vec<Symbol>,
}

impl Encoded {
    pub(crate) fn new(symbols: Vec<Symbol>) -> Self {
        Encoded { symbols }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Flattened signal, two levels per symbol.
    pub fn levels(&self) -> impl Iterator<Item = u8> + '_ {
        self.symbols.iter().flat_map(|s| s.levels())
    }

    /// Levels packed MSB first, the last byte zero padded.
    ///
    /// ```text
    ///         symbols: 00   01   11   10
    ///         packed:  0001 1110
    /// ```
    pub fn to_packed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.symbols.len() + 3) / 4);
        for chunk in self.symbols.chunks(4) {
            let byte = chunk
                .iter()
                .enumerate()
                .fold(0u8, |acc, (i, s)| acc | (s.code() << (6 - 2 * i)));
            out.push(byte);
        }
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_packed())
    }
}

impl fmt::Display for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.symbols.iter();
        if let Some(first) = iter.next() {
            write!(f, "{first}")?;
            for symbol in iter {
                write!(f, " {symbol}")?;
            }
        }
        Ok(())
    }
}
