//! # Miller Encoding Scheme
//!
//! Every input bit becomes one symbol made of two half-bit levels.
//!
//! ```text
//!   bit 1:  00 ──▶ 01 ◀──▶ 10 ◀── 11
//!
//!   bit 0:  00 ──▶ 11 ◀── 01
//!           11 ──▶ 00 ◀── 10
//! ```
//!
//! The first bit maps directly: `0 → 00`, `1 → 11`. After that:
//!
//! | previous | bit 1 | bit 0 |
//! |----------|-------|-------|
//! | 00       | 01    | 11    |
//! | 01       | 10    | 11    |
//! | 10       | 01    | 00    |
//! | 11       | 10    | 00    |
//!
//! A `0` preceded by the input bits `1 0 1` always emits `11`, but only from the
//! fifth bit onwards. That zero gets the 2T interval that earns Miller code its
//! "three-frequency" name.
//!
//! The encoder keeps nothing but the last symbol, the last three input bits and
//! the position, so separate calls to [`encode`] never share state.

#[macro_use]
extern crate log;

mod error;
mod miller;
mod symbol;
mod waveform;

pub use error::{Error, Result};
pub use miller::MillerEncoder;
pub use symbol::{Bit, Encoded, Symbol};
pub use waveform::{PlotConfig, Waveform};

/// Parse a `'0'`/`'1'` string, failing on the first other character.
pub fn parse_bits(input: &str) -> Result<Vec<Bit>> {
    input
        .chars()
        .enumerate()
        .map(|(position, c)| Bit::from_char(c, position))
        .collect()
}

/// Encode a `'0'`/`'1'` string. Empty input yields an empty sequence.
pub fn encode(input: &str) -> Result<Encoded> {
    let bits = parse_bits(input)?;
    Ok(encode_bits(&bits))
}

/// Encode already parsed bits.
pub fn encode_bits(bits: &[Bit]) -> Encoded {
    debug!("encode {} bits", bits.len());
    let mut encoder = MillerEncoder::with_capacity(bits.len());
    encoder.extend(bits.iter().copied());
    encoder.finalize()
}

#[cfg(test)]
const TEST_VECTOR: [(&str, &str); 12] = [
    (
        "0101000000011111100110",
        "00 01 11 10 11 00 11 00 11 00 11 10 01 10 01 10 01 11 00 01 10 00",
    ),
    ("0", "00"),
    ("1", "11"),
    ("000", "00 11 00"),
    ("111", "11 10 01"),
    ("1010", "11 00 01 11"),
    ("10100", "11 00 01 11 00"),
    ("01010", "00 01 11 10 11"),
    ("10101", "11 00 01 11 10"),
    ("11010", "11 10 00 01 11"),
    ("1101010", "11 10 00 01 11 10 11"),
    ("1111", "11 10 01 10"),
];

#[cfg(test)]
static INIT: std::sync::Once = std::sync::Once::new();

/// Setup function that is only run once, even if called multiple times.
#[cfg(test)]
fn setup() {
    INIT.call_once(|| {
        pretty_env_logger::init();
    });
}

#[cfg(test)]
mod tests {
    use crate::{encode, setup};

    #[test]
    fn test_packed_golden() {
        setup();
        let encoded = encode("0101000000011111100110").unwrap();
        assert_eq!(encoded.to_packed(), hex::decode("1eccce667180").unwrap());
        assert_eq!(encode("1111").unwrap().to_hex(), "e6");
    }

    #[test]
    fn test_independent_calls() {
        setup();
        let first = encode("0101").unwrap();
        encode("111111").unwrap();
        assert_eq!(encode("0101").unwrap(), first);
    }
}
