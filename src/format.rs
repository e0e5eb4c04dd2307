//! # Crash Screen Formatter
//!
//! A small C-style formatter that writes into a fixed 256-byte buffer. It does not go
//! through `core::fmt`, so it stays usable while the rest of the system is wedged.
//!
//! Supported directives are `%[flags][width][.precision]conv` with flags `-`, `0`, `+`
//! and space, and conversions `d i u x X e E s c %`. `l` and `h` length modifiers are
//! accepted and ignored. Output past the buffer capacity is dropped silently, a
//! directive with no argument left prints nothing, and an unknown conversion is copied
//! to the output as written.

use heapless::Vec;

/// Capacity of the format scratch buffer
pub const FORMAT_BUFFER_SIZE: usize = 0x100;

/// Bounded output of one format call
pub type FormatBuffer = Vec<u8, FORMAT_BUFFER_SIZE>;

// Largest precision honored for integer and floating point conversions
const MAX_INT_PRECISION: usize = 32;
const MAX_FLOAT_PRECISION: usize = 17;
const DEFAULT_FLOAT_PRECISION: usize = 6;

/// One formatter argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Str(&'a str),
    Char(u8),
}

impl<'a> Arg<'a> {
    fn as_i64(&self) -> Option<i64> {
        match *self {
            Arg::Signed(v) => Some(v),
            Arg::Unsigned(v) => Some(v as i64),
            Arg::Float(v) => Some(v as i64),
            Arg::Char(c) => Some(c as i64),
            Arg::Str(_) => None,
        }
    }

    fn as_u64(&self) -> Option<u64> {
        match *self {
            Arg::Signed(v) => Some(v as u64),
            Arg::Unsigned(v) => Some(v),
            Arg::Float(v) => Some(v as u64),
            Arg::Char(c) => Some(c as u64),
            Arg::Str(_) => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match *self {
            Arg::Signed(v) => Some(v as f64),
            Arg::Unsigned(v) => Some(v as f64),
            Arg::Float(v) => Some(v),
            Arg::Char(c) => Some(c as f64),
            Arg::Str(_) => None,
        }
    }
}

macro_rules! impl_arg_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl<'a> From<$source> for Arg<'a> {
                fn from(value: $source) -> Self {
                    Arg::$variant(value as $target)
                }
            }
        )*
    };
}

impl_arg_from!(Signed as i64: i8, i16, i32, i64, isize);
impl_arg_from!(Unsigned as u64: u16, u32, u64, usize);
impl_arg_from!(Float as f64: f32, f64);

impl<'a> From<u8> for Arg<'a> {
    fn from(value: u8) -> Self {
        Arg::Char(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

/// Parsed `%` directive
#[derive(Debug, Default, Clone, Copy)]
struct Directive {
    left_align: bool,
    zero_pad: bool,
    plus_sign: bool,
    space_sign: bool,
    width: usize,
    precision: Option<usize>,
}

impl Directive {
    fn sign(&self, negative: bool) -> Option<u8> {
        if negative {
            Some(b'-')
        } else if self.plus_sign {
            Some(b'+')
        } else if self.space_sign {
            Some(b' ')
        } else {
            None
        }
    }
}

fn push(out: &mut FormatBuffer, byte: u8) {
    // a full buffer drops the rest of the output
    let _ = out.push(byte);
}

fn push_all(out: &mut FormatBuffer, bytes: &[u8]) {
    for &byte in bytes {
        push(out, byte);
    }
}

fn push_repeat(out: &mut FormatBuffer, byte: u8, count: usize) {
    for _ in 0..count.min(FORMAT_BUFFER_SIZE) {
        push(out, byte);
    }
}

/// Emit `sign` + `body` padded to the directive width.
fn emit_field(out: &mut FormatBuffer, directive: &Directive, sign: Option<u8>, body: &[u8], zero_fill: bool) {
    let len = body.len() + sign.is_some() as usize;
    let padding = directive.width.saturating_sub(len);

    if directive.left_align {
        if let Some(sign) = sign {
            push(out, sign);
        }
        push_all(out, body);
        push_repeat(out, b' ', padding);
    } else if zero_fill {
        if let Some(sign) = sign {
            push(out, sign);
        }
        push_repeat(out, b'0', padding);
        push_all(out, body);
    } else {
        push_repeat(out, b' ', padding);
        if let Some(sign) = sign {
            push(out, sign);
        }
        push_all(out, body);
    }
}

/// Append the digits of `value` in `radix`, most significant first.
fn push_digits<const N: usize>(body: &mut Vec<u8, N>, mut value: u64, radix: u64, uppercase: bool) {
    let alphabet: &[u8; 16] = if uppercase { b"0123456789ABCDEF" } else { b"0123456789abcdef" };
    let mut reversed = [0u8; 64];
    let mut count = 0;

    loop {
        reversed[count] = alphabet[(value % radix) as usize];
        count += 1;
        value /= radix;
        if value == 0 {
            break;
        }
    }

    for &digit in reversed[..count].iter().rev() {
        let _ = body.push(digit);
    }
}

fn count_digits(mut value: u64, radix: u64) -> usize {
    let mut count = 1;
    while value >= radix {
        value /= radix;
        count += 1;
    }
    count
}

fn write_integer(
    out: &mut FormatBuffer,
    directive: &Directive,
    sign: Option<u8>,
    magnitude: u64,
    radix: u64,
    uppercase: bool,
) {
    let mut body: Vec<u8, 96> = Vec::new();
    let precision = directive.precision.map(|p| p.min(MAX_INT_PRECISION));

    // an explicit zero precision prints no digits for a zero value
    if !(magnitude == 0 && precision == Some(0)) {
        let digits = count_digits(magnitude, radix);
        for _ in digits..precision.unwrap_or(0) {
            let _ = body.push(b'0');
        }
        push_digits(&mut body, magnitude, radix, uppercase);
    }

    let zero_fill = directive.zero_pad && precision.is_none();
    emit_field(out, directive, sign, &body, zero_fill);
}

/// Divide `value` by `10^exponent` without leaving the f64 range on the way.
fn scale_by_pow10(value: f64, exponent: i32) -> f64 {
    if exponent > 300 {
        value / 1e300 / libm::pow(10.0, (exponent - 300) as f64)
    } else if exponent < -300 {
        value * 1e300 * libm::pow(10.0, (-exponent - 300) as f64)
    } else if exponent >= 0 {
        value / libm::pow(10.0, exponent as f64)
    } else {
        value * libm::pow(10.0, (-exponent) as f64)
    }
}

/// Split a finite, non-negative value into rounded significant digits and a decimal
/// exponent. The digits hold `precision + 1` places.
fn decompose(value: f64, precision: usize) -> (u64, i32) {
    let scale = 10u64.pow(precision as u32);
    if value == 0.0 {
        return (0, 0);
    }

    let mut exponent = libm::floor(libm::log10(value)) as i32;
    let mantissa = scale_by_pow10(value, exponent);

    // log10 can land one off near powers of ten
    if mantissa >= 10.0 {
        exponent += 1;
    } else if mantissa < 1.0 {
        exponent -= 1;
    }

    // one scaling step keeps exact decimal ties exact; they round half to even
    let mut digits = libm::rint(scale_by_pow10(value, exponent - precision as i32)) as u64;
    if digits >= 10 * scale {
        digits /= 10;
        exponent += 1;
    }

    (digits, exponent)
}

fn write_exponential(out: &mut FormatBuffer, directive: &Directive, value: f64, uppercase: bool) {
    let mut body: Vec<u8, 64> = Vec::new();

    if value.is_nan() {
        let text: &[u8] = if uppercase { b"NAN" } else { b"nan" };
        emit_field(out, directive, directive.sign(false), text, false);
        return;
    }

    let sign = directive.sign(value.is_sign_negative());
    let magnitude = libm::fabs(value);

    if magnitude.is_infinite() {
        let text: &[u8] = if uppercase { b"INF" } else { b"inf" };
        emit_field(out, directive, sign, text, false);
        return;
    }

    let precision = directive
        .precision
        .unwrap_or(DEFAULT_FLOAT_PRECISION)
        .min(MAX_FLOAT_PRECISION);
    let scale = 10u64.pow(precision as u32);
    let (digits, exponent) = decompose(magnitude, precision);

    push_digits(&mut body, digits / scale, 10, false);
    if precision > 0 {
        let _ = body.push(b'.');
        let fraction = digits % scale;
        for _ in count_digits(fraction, 10)..precision {
            let _ = body.push(b'0');
        }
        push_digits(&mut body, fraction, 10, false);
    }

    let _ = body.push(if uppercase { b'E' } else { b'e' });
    let _ = body.push(if exponent < 0 { b'-' } else { b'+' });
    let exponent = exponent.unsigned_abs() as u64;
    if exponent < 10 {
        let _ = body.push(b'0');
    }
    push_digits(&mut body, exponent, 10, false);

    emit_field(out, directive, sign, &body, directive.zero_pad);
}

fn write_str(out: &mut FormatBuffer, directive: &Directive, text: &str) {
    let bytes = text.as_bytes();
    let bytes = match directive.precision {
        Some(limit) if limit < bytes.len() => &bytes[..limit],
        _ => bytes,
    };
    emit_field(out, directive, None, bytes, false);
}

/// Format `fmt` with `args` into `out`, replacing its previous contents.
///
/// Returns the number of bytes written.
pub fn format_into(out: &mut FormatBuffer, fmt: &str, args: &[Arg<'_>]) -> usize {
    out.clear();

    let bytes = fmt.as_bytes();
    let mut args = args.iter();
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        i += 1;
        if byte != b'%' {
            push(out, byte);
            continue;
        }

        let start = i - 1;
        let mut directive = Directive::default();

        while i < bytes.len() {
            match bytes[i] {
                b'-' => directive.left_align = true,
                b'0' => directive.zero_pad = true,
                b'+' => directive.plus_sign = true,
                b' ' => directive.space_sign = true,
                _ => break,
            }
            i += 1;
        }

        while i < bytes.len() && bytes[i].is_ascii_digit() {
            directive.width = directive
                .width
                .saturating_mul(10)
                .saturating_add((bytes[i] - b'0') as usize);
            i += 1;
        }

        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            let mut precision = 0usize;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                precision = precision
                    .saturating_mul(10)
                    .saturating_add((bytes[i] - b'0') as usize);
                i += 1;
            }
            directive.precision = Some(precision);
        }

        while i < bytes.len() && matches!(bytes[i], b'l' | b'h') {
            i += 1;
        }

        // dangling directive at the end of the format
        if i >= bytes.len() {
            push_all(out, &bytes[start..]);
            break;
        }

        let conversion = bytes[i];
        i += 1;

        match conversion {
            b'%' => push(out, b'%'),
            b'd' | b'i' => {
                if let Some(value) = args.next().and_then(Arg::as_i64) {
                    let sign = directive.sign(value < 0);
                    write_integer(out, &directive, sign, value.unsigned_abs(), 10, false);
                }
            }
            b'u' => {
                if let Some(value) = args.next().and_then(Arg::as_u64) {
                    write_integer(out, &directive, None, value, 10, false);
                }
            }
            b'x' | b'X' => {
                if let Some(value) = args.next().and_then(Arg::as_u64) {
                    write_integer(out, &directive, None, value, 16, conversion == b'X');
                }
            }
            b'e' | b'E' => {
                if let Some(value) = args.next().and_then(Arg::as_f64) {
                    write_exponential(out, &directive, value, conversion == b'E');
                }
            }
            b's' => {
                if let Some(Arg::Str(text)) = args.next() {
                    write_str(out, &directive, text);
                }
            }
            b'c' => {
                if let Some(value) = args.next().and_then(Arg::as_u64) {
                    emit_field(out, &directive, None, &[value as u8], false);
                }
            }
            _ => push_all(out, &bytes[start..i]),
        }
    }

    out.len()
}

/// Format into a fresh buffer
pub fn format(fmt: &str, args: &[Arg<'_>]) -> FormatBuffer {
    let mut out = FormatBuffer::new();
    format_into(&mut out, fmt, args);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fmt: &str, args: &[Arg<'_>]) -> std::string::String {
        let out = format(fmt, args);
        std::string::String::from_utf8(out.to_vec()).expect("ascii output")
    }

    #[test]
    fn test_hex_register_value() {
        assert_eq!(render("%08XH", &[0x80300000u32.into()]), "80300000H");
        assert_eq!(render("%08XH", &[4u32.into()]), "00000004H");
        assert_eq!(render("%x", &[0xBEEFu32.into()]), "beef");
    }

    #[test]
    fn test_decimal_flags_and_width() {
        assert_eq!(render("%d", &[(-42i32).into()]), "-42");
        assert_eq!(render("%5d|", &[42i32.into()]), "   42|");
        assert_eq!(render("%-5d|", &[42i32.into()]), "42   |");
        assert_eq!(render("%05d", &[(-42i32).into()]), "-0042");
        assert_eq!(render("%+d % d", &[7i32.into(), 7i32.into()]), "+7  7");
        assert_eq!(render("%02d", &[3i32.into()]), "03");
        assert_eq!(render("%.3d", &[5i32.into()]), "005");
        assert_eq!(render("%05.3d", &[5i32.into()]), "  005");
        assert_eq!(render("%.0d|", &[0i32.into()]), "|");
        assert_eq!(render("%u", &[u64::MAX.into()]), "18446744073709551615");
    }

    #[test]
    fn test_exponential() {
        assert_eq!(render("%.3e", &[1.0f32.into()]), "1.000e+00");
        assert_eq!(render("%.3e", &[123456.0f32.into()]), "1.235e+05");
        assert_eq!(render("%.3e", &[9.9996f64.into()]), "1.000e+01");
        assert_eq!(render("%.3e", &[0.0f32.into()]), "0.000e+00");
        assert_eq!(render("%.3e", &[(-2.5f32).into()]), "-2.500e+00");
        assert_eq!(render("%.3e", &[f32::MIN_POSITIVE.into()]), "1.175e-38");
        assert_eq!(render("%.3e", &[f32::MAX.into()]), "3.403e+38");
        assert_eq!(render("%.3E", &[0.015625f32.into()]), "1.562E-02");
        assert_eq!(render("%.3e", &[7.3185e7f32.into()]), "7.318e+07");
        assert_eq!(render("%.3e", &[7.3195e7f32.into()]), "7.320e+07");
        assert_eq!(render("%.0e", &[2.5f64.into()]), "2e+00");
        assert_eq!(render("%e", &[1.5f64.into()]), "1.500000e+00");
        assert_eq!(render("%.0e", &[7.0f64.into()]), "7e+00");
        assert_eq!(render("%.2e", &[1e100f64.into()]), "1.00e+100");
    }

    #[test]
    fn test_exponential_special_values() {
        assert_eq!(render("%.3e", &[f64::INFINITY.into()]), "inf");
        assert_eq!(render("%.3e", &[f64::NEG_INFINITY.into()]), "-inf");
        assert_eq!(render("%.3E", &[f64::NAN.into()]), "NAN");
    }

    #[test]
    fn test_strings_and_chars() {
        assert_eq!(render("THREAD:%d  (%s)", &[5i32.into(), "Breakpoint exception".into()]),
            "THREAD:5  (Breakpoint exception)");
        assert_eq!(render("[%4s][%-4s]", &["ab".into(), "ab".into()]), "[  ab][ab  ]");
        assert_eq!(render("%.2s", &["abcdef".into()]), "ab");
        assert_eq!(render("%c%c", &[b'o'.into(), b'k'.into()]), "ok");
        assert_eq!(render("F%02d:---------", &[30i32.into()]), "F30:---------");
    }

    #[test]
    fn test_literal_percent_and_unknown_conversion() {
        assert_eq!(render("100%%", &[]), "100%");
        assert_eq!(render("a%qb", &[1i32.into()]), "a%qb");
        assert_eq!(render("tail%", &[]), "tail%");
        assert_eq!(render("tail%08", &[]), "tail%08");
    }

    #[test]
    fn test_missing_argument_prints_nothing() {
        assert_eq!(render("x=%d y=%08X.", &[1i32.into()]), "x=1 y=.");
        assert_eq!(render("%s|", &[3i32.into()]), "|");
    }

    #[test]
    fn test_output_truncates_at_capacity() {
        let long = "0123456789abcdef".repeat(20);
        let out = format(&long, &[]);
        assert_eq!(out.len(), FORMAT_BUFFER_SIZE);
        assert_eq!(&out[..16], b"0123456789abcdef");

        let out = format("%300d", &[1i32.into()]);
        assert_eq!(out.len(), FORMAT_BUFFER_SIZE);
        assert!(out.iter().all(|&b| b == b' '));
    }

    #[test]
    fn test_format_into_replaces_contents() {
        let mut out = FormatBuffer::new();
        assert_eq!(format_into(&mut out, "first line", &[]), 10);
        assert_eq!(format_into(&mut out, "%d", &[9i32.into()]), 1);
        assert_eq!(&out[..], b"9");
    }
}
