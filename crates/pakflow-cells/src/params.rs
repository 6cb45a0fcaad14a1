//! Cell parameter values
//!
//! Parameters arrive as text, either in netlist form (a plain bit string, most
//! significant bit first, as written by the JSON backend) or as a sized Verilog
//! literal such as `4'b1000` or `16'h8000`. Plain decimal integers are
//! accepted when the text cannot be read as a bit string.

use crate::error::{CellError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameter name/value pairs attached to a cell instance
pub type CellParams = IndexMap<String, String>;

/// Power-on value of a flip-flop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InitValue {
    /// No required initial value (`1'bx`)
    #[default]
    Unconstrained,
    Zero,
    One,
}

impl InitValue {
    pub fn from_bit(bit: Option<bool>) -> Self {
        match bit {
            None => InitValue::Unconstrained,
            Some(false) => InitValue::Zero,
            Some(true) => InitValue::One,
        }
    }

    /// Concrete value, `None` when unconstrained
    pub fn to_bit(self) -> Option<bool> {
        match self {
            InitValue::Unconstrained => None,
            InitValue::Zero => Some(false),
            InitValue::One => Some(true),
        }
    }

    /// Fill an unconstrained value from the initial value the design requests
    /// on the driven net. Concrete values are left as they are.
    pub fn resolve(self, requested: Option<bool>) -> Self {
        match self {
            InitValue::Unconstrained => InitValue::from_bit(requested),
            concrete => concrete,
        }
    }
}

impl fmt::Display for InitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitValue::Unconstrained => f.write_str("1'bx"),
            InitValue::Zero => f.write_str("1'b0"),
            InitValue::One => f.write_str("1'b1"),
        }
    }
}

/// Value an asserted `nSR` forces onto a set/reset flip-flop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SrMode {
    /// SRMODE = 0
    #[default]
    Reset,
    /// SRMODE = 1
    Set,
}

impl SrMode {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            SrMode::Set
        } else {
            SrMode::Reset
        }
    }

    /// Output level while the control line is asserted
    pub fn forced_value(self) -> bool {
        self == SrMode::Set
    }
}

/// Counter reset trigger. Stored for netlist fidelity only: the behavioral
/// counter model does not apply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResetMode {
    #[default]
    Rising,
    Falling,
    Both,
    Level,
}

impl ResetMode {
    pub fn parse(text: &str) -> Option<ResetMode> {
        match text.trim_matches('"') {
            "RISING" => Some(ResetMode::Rising),
            "FALLING" => Some(ResetMode::Falling),
            "BOTH" => Some(ResetMode::Both),
            "LEVEL" => Some(ResetMode::Level),
            _ => None,
        }
    }
}

/// Parse a constant into bits, least significant first. `None` entries are
/// undefined (`x`) bits.
pub fn parse_const(text: &str) -> Option<Vec<Option<bool>>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some((width, rest)) = text.split_once('\'') {
        let width: usize = width.trim().parse().ok()?;
        let mut chars = rest.chars();
        let radix = chars.next()?.to_ascii_lowercase();
        let digits: String = chars.filter(|c| *c != '_').collect();
        let mut bits = match radix {
            'b' => parse_binary(&digits)?,
            'h' => parse_hex(&digits)?,
            'd' => int_bits(digits.parse().ok()?, width),
            _ => return None,
        };
        bits.resize(width, bits.last().copied().flatten().and(Some(false)));
        return Some(bits);
    }

    let bit_string = text.chars().all(|c| matches!(c, '0' | '1' | 'x' | 'X'));
    if bit_string && (text.len() > 1 || text.eq_ignore_ascii_case("x")) {
        return parse_binary(text);
    }

    let value: u64 = text.parse().ok()?;
    Some(int_bits(value, 64 - value.leading_zeros() as usize))
}

/// Parse a constant as an unsigned integer; undefined bits are rejected.
pub fn parse_uint(text: &str) -> Option<u64> {
    let bits = parse_const(text)?;
    let mut value = 0u64;
    for (i, bit) in bits.iter().enumerate() {
        match bit {
            Some(true) if i < 64 => value |= 1 << i,
            Some(true) => return None,
            Some(false) => {}
            None => return None,
        }
    }
    Some(value)
}

/// Look up a parameter and parse it, reporting which cell it belongs to
pub(crate) fn param_with<T>(
    params: &CellParams,
    cell: &str,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    match params.get(name) {
        None => Ok(None),
        Some(value) => parse(value).map(Some).ok_or_else(|| CellError::InvalidParameter {
            cell: cell.to_string(),
            param: name.to_string(),
            value: value.clone(),
        }),
    }
}

/// Parse a single-bit INIT value
pub fn parse_init(text: &str) -> Option<InitValue> {
    let bits = parse_const(text)?;
    match bits.as_slice() {
        [bit] => Some(InitValue::from_bit(*bit)),
        _ => None,
    }
}

fn parse_binary(digits: &str) -> Option<Vec<Option<bool>>> {
    digits
        .chars()
        .rev()
        .map(|c| match c {
            '0' => Some(Some(false)),
            '1' => Some(Some(true)),
            'x' | 'X' | 'z' | 'Z' | '?' => Some(None),
            _ => None,
        })
        .collect()
}

fn parse_hex(digits: &str) -> Option<Vec<Option<bool>>> {
    let mut bits = Vec::with_capacity(digits.len() * 4);
    for c in digits.chars().rev() {
        match c {
            'x' | 'X' => bits.extend([None; 4]),
            _ => {
                let nibble = c.to_digit(16)?;
                bits.extend((0..4).map(|i| Some(nibble >> i & 1 != 0)));
            }
        }
    }
    Some(bits)
}

fn int_bits(value: u64, width: usize) -> Vec<Option<bool>> {
    (0..width.max(1))
        .map(|i| Some(i < 64 && value >> i & 1 != 0))
        .collect()
}
