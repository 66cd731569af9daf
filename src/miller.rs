use crate::{Bit, Encoded, Symbol};
use std::fmt::{self, Debug};

/// Miller line code state machine.
///
/// Feed bits with [`MillerEncoder::update`], collect with [`MillerEncoder::finalize`].
pub struct MillerEncoder {
    status: MillerStatus,
    lookback: Lookback,
    symbols: Vec<Symbol>,
}

#[derive(Copy, Clone)]
enum MillerStatus {
    Wait,
    Emitted { last: Symbol },
}

/// The last three input bits, newest in the lowest bit, and how many bits
/// have been consumed so far.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub(crate) struct Lookback {
    bits: u8,
    position: usize,
}

impl Lookback {
    #[inline(always)]
    fn push(&mut self, bit: Bit) {
        self.bits = ((self.bits << 1) | bit.level()) & 0b111;
        self.position += 1;
    }

    /// `1, 0, 1` immediately before the current position, from the fifth bit on.
    #[inline(always)]
    fn follows_101(&self) -> bool {
        self.position > 3 && self.bits == 0b101
    }
}

impl Debug for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookback")
            .field("bits", &format!("{:03b}", self.bits))
            .field("position", &self.position)
            .finish()
    }
}

impl Default for MillerEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MillerEncoder {
    pub fn new() -> Self {
        MillerEncoder {
            status: MillerStatus::Wait,
            lookback: Lookback::default(),
            symbols: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MillerEncoder {
            symbols: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    /// Rebuild an encoder part way through an input.
    ///
    /// `last` is the 2-bit code of the previously emitted symbol, `recent` holds
    /// `input[i-3], input[i-2], input[i-1]` and `position` is `i`, the number of
    /// bits already consumed (clamped to at least one). Symbols emitted before
    /// `position` are not part of the finalized output.
    pub fn resume(last: u8, recent: [Bit; 3], position: usize) -> crate::Result<Self> {
        let last = Symbol::try_from(last)?;
        let bits = recent
            .iter()
            .fold(0u8, |acc, bit| (acc << 1) | bit.level());
        let lookback = Lookback {
            bits,
            position: position.max(1),
        };
        trace!("resume at {last} with {lookback:?}");
        Ok(MillerEncoder {
            status: MillerStatus::Emitted { last },
            lookback,
            symbols: Vec::new(),
        })
    }

    #[inline(always)]
    pub fn update(&mut self, bit: Bit) -> Symbol {
        trace!("update bit {:?}", bit);
        trace!("current status {:?}, {:?}", self.status, self.lookback);
        let next = match self.status {
            MillerStatus::Wait => match bit {
                Bit::Zero => Symbol::S00,
                Bit::One => Symbol::S11,
            },
            MillerStatus::Emitted { last } => match bit {
                Bit::One => match last {
                    Symbol::S00 | Symbol::S10 => Symbol::S01,
                    Symbol::S11 | Symbol::S01 => Symbol::S10,
                },
                Bit::Zero => match last {
                    _ if self.lookback.follows_101() => {
                        trace!("zero after 101, force 11");
                        Symbol::S11
                    }
                    Symbol::S00 | Symbol::S01 => Symbol::S11,
                    Symbol::S11 | Symbol::S10 => Symbol::S00,
                },
            },
        };
        self.status = MillerStatus::Emitted { last: next };
        self.lookback.push(bit);
        trace!("emit {next}, transit to {:?}", self.status);
        self.symbols.push(next);
        next
    }

    /// The last emitted symbol, if any.
    pub fn last(&self) -> Option<Symbol> {
        match self.status {
            MillerStatus::Wait => None,
            MillerStatus::Emitted { last } => Some(last),
        }
    }

    pub fn finalize(self) -> Encoded {
        trace!("finalize {} symbols", self.symbols.len());
        Encoded::new(self.symbols)
    }
}

impl Extend<Bit> for MillerEncoder {
    fn extend<T: IntoIterator<Item = Bit>>(&mut self, iter: T) {
        for bit in iter {
            self.update(bit);
        }
    }
}

impl Debug for MillerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MillerStatus::Wait => f.write_str("Wait"),
            MillerStatus::Emitted { last } => f
                .debug_struct("Emitted")
                .field("last", &format_args!("{last}"))
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MillerEncoder;
    use crate::{encode, parse_bits, setup, Bit, Error, Symbol, TEST_VECTOR};

    /// Every binary string up to `max_len` bits.
    fn all_inputs(max_len: u32) -> Vec<String> {
        let mut inputs = vec![String::new()];
        for len in 1..=max_len {
            for n in 0..(1u32 << len) {
                inputs.push(format!("{n:0width$b}", width = len as usize));
            }
        }
        inputs
    }

    #[test]
    fn test_miller_encode() {
        setup();
        for (input, expected) in TEST_VECTOR.into_iter() {
            assert_eq!(encode(input).unwrap().to_string(), expected, "input {input}");
        }
    }

    #[test]
    fn test_empty_input() {
        setup();
        let encoded = encode("").unwrap();
        assert!(encoded.is_empty());
        assert_eq!(encoded.to_string(), "");
    }

    #[test]
    fn test_reject_non_binary() {
        setup();
        assert!(matches!(
            encode("012"),
            Err(Error::InvalidInput {
                position: 2,
                found: '2'
            })
        ));
        assert!(matches!(
            encode("0a"),
            Err(Error::InvalidInput { position: 1, .. })
        ));
        assert!(matches!(encode(" 01"), Err(Error::InvalidInput { position: 0, .. })));
    }

    #[test]
    fn test_length_and_first_symbol() {
        setup();
        for input in all_inputs(10) {
            let encoded = encode(&input).unwrap();
            assert_eq!(encoded.len(), input.len());
            assert_eq!(encoded.levels().count(), 2 * input.len());
            if let Some(first) = encoded.symbols().first() {
                let expected = if input.starts_with('0') {
                    Symbol::S00
                } else {
                    Symbol::S11
                };
                assert_eq!(*first, expected, "input {input}");
            }
            assert_eq!(encode(&input).unwrap(), encoded);
        }
    }

    #[test]
    fn test_ones_alternate() {
        setup();
        for input in all_inputs(10) {
            let encoded = encode(&input).unwrap();
            let symbols = encoded.symbols();
            let bytes = input.as_bytes();
            for i in 1..bytes.len() {
                if bytes[i] == b'1' && bytes[i - 1] == b'1' {
                    assert_ne!(symbols[i], symbols[i - 1], "input {input} at {i}");
                    assert!(
                        matches!(symbols[i], Symbol::S01 | Symbol::S10),
                        "input {input} at {i}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_zero_after_101() {
        setup();
        for input in all_inputs(10) {
            let encoded = encode(&input).unwrap();
            for i in 4..input.len() {
                if &input[i - 3..=i] == "1010" {
                    assert_eq!(encoded.symbols()[i], Symbol::S11, "input {input} at {i}");
                }
            }
        }
        // previous symbol alone would give 00 here
        let encoded = encode("01010").unwrap();
        assert_eq!(encoded.symbols()[3], Symbol::S10);
        assert_eq!(encoded.symbols()[4], Symbol::S11);
    }

    #[test]
    fn test_resume() {
        setup();
        let (input, expected) = TEST_VECTOR[0];
        let bits = parse_bits(input).unwrap();
        let full = encode(input).unwrap();
        for split in 3..bits.len() {
            let last = full.symbols()[split - 1].code();
            let recent = [bits[split - 3], bits[split - 2], bits[split - 1]];
            let mut encoder = MillerEncoder::resume(last, recent, split).unwrap();
            encoder.extend(bits[split..].iter().copied());
            assert_eq!(encoder.finalize().symbols(), &full.symbols()[split..]);
        }
        assert_eq!(full.to_string(), expected);
    }

    #[test]
    fn test_resume_invalid_state() {
        setup();
        let recent = [Bit::One, Bit::Zero, Bit::One];
        assert!(matches!(
            MillerEncoder::resume(0b100, recent, 4),
            Err(Error::InvalidState(0b100))
        ));
    }

    #[test]
    fn test_lookback_from_fifth_bit() {
        setup();
        let recent = [Bit::One, Bit::Zero, Bit::One];
        // fourth bit: 101 is the whole history, plain 10 -> 00
        let mut encoder = MillerEncoder::resume(Symbol::S10.code(), recent, 3).unwrap();
        assert_eq!(encoder.update(Bit::Zero), Symbol::S00);
        // fifth bit: same history forces 11
        let mut encoder = MillerEncoder::resume(Symbol::S10.code(), recent, 4).unwrap();
        assert_eq!(encoder.update(Bit::Zero), Symbol::S11);
    }

    #[test]
    fn test_update_incremental() {
        setup();
        let mut encoder = MillerEncoder::new();
        assert_eq!(encoder.last(), None);
        assert_eq!(encoder.update(Bit::One), Symbol::S11);
        assert_eq!(encoder.update(Bit::One), Symbol::S10);
        assert_eq!(encoder.update(Bit::Zero), Symbol::S00);
        assert_eq!(encoder.update(Bit::Zero), Symbol::S11);
        assert_eq!(encoder.last(), Some(Symbol::S11));
        assert_eq!(encoder.finalize().to_string(), "11 10 00 11");
    }
}
