//! Text triplet line parsing
//!
//! One hopping per line as `family row col`, separated by whitespace.
//! Blank lines and lines starting with `#` carry no hopping.

use crate::HoppingError;

/// A parsed `(family_id, row, col)` hopping
pub type Triplet = (usize, usize, usize);

/// Parse one line; `Ok(None)` for blank and comment lines
pub fn parse_triplet(line: &str) -> Result<Option<Triplet>, HoppingError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let mut next = || fields.next().ok_or(HoppingError::InvalidTriplet).and_then(parse_usize);
    let triplet = (next()?, next()?, next()?);

    if fields.next().is_some() {
        return Err(HoppingError::InvalidTriplet);
    }
    Ok(Some(triplet))
}

/// Parse a decimal usize with overflow checking
fn parse_usize(s: &str) -> Result<usize, HoppingError> {
    if s.is_empty() {
        return Err(HoppingError::InvalidTriplet);
    }

    let mut result: usize = 0;
    for byte in s.bytes() {
        if !byte.is_ascii_digit() {
            return Err(HoppingError::InvalidTriplet);
        }
        let digit = (byte - b'0') as usize;
        result = result
            .checked_mul(10)
            .and_then(|value| value.checked_add(digit))
            .ok_or(HoppingError::ArraySizeOverflow)?;
    }

    Ok(result)
}
