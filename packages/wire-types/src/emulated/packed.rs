//! Packed decimal digits: two digits per byte, sign in the final nibble.

const POSITIVE: u8 = 0xC;
const NEGATIVE: u8 = 0xD;

/// Packs decimal text into `out` at the given precision and scale.
///
/// Fraction digits beyond `scale` are dropped.
///
/// # Returns
/// `None` when the text is not a number or needs more than `precision` digits.
pub fn pack(text: &str, precision: usize, scale: usize, out: &mut [u8]) -> Option<()> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let whole = whole.trim_start_matches('0');
    let mut digits: Vec<u8> = whole.bytes().map(|b| b - b'0').collect();
    digits.extend(
        fraction
            .bytes()
            .map(|b| b - b'0')
            .chain(std::iter::repeat(0))
            .take(scale),
    );
    let nibbles = out.len() * 2;
    if digits.len() > precision || digits.len() > nibbles - 1 {
        return None;
    }

    let mut packed = vec![0u8; nibbles];
    let start = nibbles - 1 - digits.len();
    packed[start..nibbles - 1].copy_from_slice(&digits);
    packed[nibbles - 1] = if negative && digits.iter().any(|d| *d != 0) {
        NEGATIVE
    } else {
        POSITIVE
    };
    for (byte, pair) in out.iter_mut().zip(packed.chunks_exact(2)) {
        *byte = (pair[0] << 4) | pair[1];
    }
    Some(())
}

/// Renders packed digits as decimal text with exactly `scale` fraction digits.
///
/// # Returns
/// `None` when a digit nibble is out of range.
pub fn unpack(data: &[u8], precision: usize, scale: usize) -> Option<String> {
    let nibbles: Vec<u8> = data.iter().flat_map(|b| [b >> 4, b & 0x0F]).collect();
    let (sign, digits) = nibbles.split_last()?;
    if digits.iter().any(|d| *d > 9) {
        return None;
    }
    let digits = &digits[digits.len().saturating_sub(precision)..];
    let split = digits.len().saturating_sub(scale);
    let text = |part: &[u8]| part.iter().map(|d| char::from(b'0' + d)).collect::<String>();

    let whole = text(&digits[..split]);
    let whole = whole.trim_start_matches('0');
    let mut rendered = String::new();
    if matches!(*sign, NEGATIVE | 0xB) && digits.iter().any(|d| *d != 0) {
        rendered.push('-');
    }
    rendered.push_str(if whole.is_empty() { "0" } else { whole });
    if scale > 0 {
        rendered.push('.');
        rendered.push_str(&text(&digits[split..]));
    }
    Some(rendered)
}
