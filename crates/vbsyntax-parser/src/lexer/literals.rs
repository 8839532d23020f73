//! Numeric and date literal scanning.

use ordered_float::OrderedFloat;
use vbsyntax_core::{Location, SyntaxErrorKind};

use super::chars::{digit_value, half_width, is_blank, is_decimal_digit, is_identifier_part, is_identifier_start, is_line_terminator};
use super::scanner::Scanner;
use super::token::{
    DateValue, DecimalValue, IntegerBase, Token, TokenKind, TokenValue, TypeCharacter,
};

impl<'src, 'ast> Scanner<'src, 'ast> {
    // =========================================
    // Numbers
    // =========================================

    pub(super) fn scan_number(&mut self, start: Location) -> Token<'ast> {
        if self.cursor.check(|c| half_width(c) == '&') {
            self.scan_radix_number(start)
        } else {
            self.scan_decimal_number(start)
        }
    }

    /// `&H1F`, `&O17`, and the bare `&777` octal form.
    fn scan_radix_number(&mut self, start: Location) -> Token<'ast> {
        self.cursor.advance();
        let (base, radix) = match self.cursor.peek().map(half_width) {
            Some('h' | 'H') => {
                self.cursor.advance();
                (IntegerBase::Hexadecimal, 16)
            }
            Some('o' | 'O') => {
                self.cursor.advance();
                (IntegerBase::Octal, 8)
            }
            _ => (IntegerBase::Octal, 8),
        };

        let mut value: u64 = 0;
        let mut digits = 0;
        let mut overflow = false;
        while let Some(digit) = self.cursor.peek().and_then(|c| digit_value(c, radix)) {
            self.cursor.advance();
            digits += 1;
            match value
                .checked_mul(u64::from(radix))
                .and_then(|v| v.checked_add(u64::from(digit)))
            {
                Some(v) => value = v,
                None => overflow = true,
            }
        }

        let type_char = self.scan_numeric_type_character(true);
        if digits == 0 || overflow {
            return self.make_error(SyntaxErrorKind::InvalidIntegerLiteral, start);
        }
        self.make_integer(start, value, base, type_char)
    }

    fn scan_decimal_number(&mut self, start: Location) -> Token<'ast> {
        self.scratch.clear();
        self.push_digits();

        let mut is_float = false;
        if self.cursor.check(|c| half_width(c) == '.')
            && self.cursor.peek_nth(1).is_some_and(is_decimal_digit)
        {
            self.cursor.advance();
            self.scratch.push('.');
            self.push_digits();
            is_float = true;
        }

        if self.cursor.check(|c| matches!(half_width(c), 'e' | 'E')) {
            let after = self.cursor.peek_nth(1).map(half_width);
            let signed = matches!(after, Some('+' | '-'))
                && self.cursor.peek_nth(2).is_some_and(is_decimal_digit);
            if signed || after.is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.advance();
                self.scratch.push('e');
                if signed {
                    let sign = self.cursor.advance().map(half_width).unwrap_or('+');
                    self.scratch.push(sign);
                }
                self.push_digits();
                is_float = true;
            }
        }

        let type_char = self.scan_numeric_type_character(false);
        match type_char {
            TypeCharacter::DecimalSymbol | TypeCharacter::DecimalChar => {
                match parse_decimal(&self.scratch) {
                    Some(value) => self.make(
                        TokenKind::DecimalLiteral,
                        start,
                        TokenValue::Decimal { value, type_char },
                    ),
                    None => self.make_error(SyntaxErrorKind::InvalidDecimalLiteral, start),
                }
            }
            TypeCharacter::SingleSymbol
            | TypeCharacter::SingleChar
            | TypeCharacter::DoubleSymbol
            | TypeCharacter::DoubleChar => self.make_float(start, type_char),
            TypeCharacter::None if is_float => self.make_float(start, type_char),
            _ if is_float => self.make_error(SyntaxErrorKind::InvalidFloatingPointLiteral, start),
            _ => {
                let mut value: u64 = 0;
                for c in self.scratch.chars() {
                    let digit = u64::from(c.to_digit(10).unwrap_or(0));
                    match value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                        Some(v) => value = v,
                        None => {
                            return self.make_error(SyntaxErrorKind::InvalidIntegerLiteral, start);
                        }
                    }
                }
                self.make_integer(start, value, IntegerBase::Decimal, type_char)
            }
        }
    }

    /// Append (normalized) decimal digits to the scratch buffer.
    fn push_digits(&mut self) {
        while let Some(c) = self.cursor.eat_if(is_decimal_digit) {
            self.scratch.push(half_width(c));
        }
    }

    /// A type character after a numeric literal. Hex and octal literals
    /// only accept integral suffixes; unsigned suffixes need version 8.0.
    fn scan_numeric_type_character(&mut self, integral_only: bool) -> TypeCharacter {
        let Some(c) = self.cursor.peek().map(half_width) else {
            return TypeCharacter::None;
        };

        if let Some(symbol) = TypeCharacter::from_symbol(c) {
            let accepted = match symbol {
                TypeCharacter::IntegerSymbol | TypeCharacter::LongSymbol => true,
                TypeCharacter::SingleSymbol => {
                    !integral_only
                        && !self
                            .cursor
                            .peek_nth(1)
                            .is_some_and(|n| is_identifier_start(n) || half_width(n) == '[')
                }
                TypeCharacter::StringSymbol => false,
                _ => !integral_only,
            };
            if accepted {
                self.cursor.advance();
                return symbol;
            }
            return TypeCharacter::None;
        }

        let (type_char, len) = match c.to_ascii_uppercase() {
            'S' => (TypeCharacter::ShortChar, 1),
            'I' => (TypeCharacter::IntegerChar, 1),
            'L' => (TypeCharacter::LongChar, 1),
            'F' if !integral_only => (TypeCharacter::SingleChar, 1),
            'R' if !integral_only => (TypeCharacter::DoubleChar, 1),
            'D' if !integral_only => (TypeCharacter::DecimalChar, 1),
            'U' if self.version().supports_v8() => {
                match self.cursor.peek_nth(1).map(|n| half_width(n).to_ascii_uppercase()) {
                    Some('S') => (TypeCharacter::UnsignedShortChar, 2),
                    Some('I') => (TypeCharacter::UnsignedIntegerChar, 2),
                    Some('L') => (TypeCharacter::UnsignedLongChar, 2),
                    _ => return TypeCharacter::None,
                }
            }
            _ => return TypeCharacter::None,
        };

        if self.cursor.peek_nth(len).is_some_and(is_identifier_part) {
            return TypeCharacter::None;
        }
        for _ in 0..len {
            self.cursor.advance();
        }
        type_char
    }

    fn make_integer(
        &self,
        start: Location,
        value: u64,
        base: IntegerBase,
        type_char: TypeCharacter,
    ) -> Token<'ast> {
        match integer_value(value, base, type_char) {
            Some(value) => {
                let kind = match value {
                    TokenValue::UnsignedInteger { .. } => TokenKind::UnsignedIntegerLiteral,
                    _ => TokenKind::IntegerLiteral,
                };
                self.make(kind, start, value)
            }
            None => self.make_error(SyntaxErrorKind::InvalidIntegerLiteral, start),
        }
    }

    fn make_float(&self, start: Location, type_char: TypeCharacter) -> Token<'ast> {
        let single = matches!(type_char, TypeCharacter::SingleSymbol | TypeCharacter::SingleChar);
        let value = self
            .scratch
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && (!single || v.abs() <= f64::from(f32::MAX)));
        match value {
            Some(value) => self.make(
                TokenKind::FloatingPointLiteral,
                start,
                TokenValue::FloatingPoint {
                    value: OrderedFloat(value),
                    type_char,
                },
            ),
            None => self.make_error(SyntaxErrorKind::InvalidFloatingPointLiteral, start),
        }
    }

    // =========================================
    // Dates
    // =========================================

    /// `#` starts a date literal when a digit follows; otherwise it is a
    /// plain `#` punctuator (directives, type characters).
    pub(super) fn scan_date_or_pound(&mut self, start: Location) -> Token<'ast> {
        let saved = self.cursor.clone();
        self.cursor.advance();
        self.cursor.eat_while(is_blank);
        if !self.cursor.check(is_decimal_digit) {
            self.cursor = saved;
            self.cursor.advance();
            return self.make(TokenKind::Pound, start, TokenValue::None);
        }

        match self.scan_date_body() {
            Some(date) => self.make(TokenKind::DateLiteral, start, TokenValue::Date(date)),
            None => {
                self.cursor
                    .eat_while(|c| half_width(c) != '#' && !is_line_terminator(c));
                self.cursor.eat_if(|c| half_width(c) == '#');
                self.make_error(SyntaxErrorKind::InvalidDateLiteral, start)
            }
        }
    }

    fn scan_date_body(&mut self) -> Option<DateValue> {
        let first = self.scan_date_number()?;
        let separator = self.cursor.peek().map(half_width);

        let mut date = None;
        let time;
        if let Some(sep @ ('/' | '-')) = separator {
            self.cursor.advance();
            let second = self.scan_date_number()?;
            if self.cursor.peek().map(half_width) != Some(sep) {
                return None;
            }
            self.cursor.advance();
            let third = self.scan_date_number()?;

            date = Some(if first.digits == 4 {
                (first.value, second.value, third.value)
            } else {
                let year = if third.digits == 2 {
                    if third.value <= 30 { third.value + 2000 } else { third.value + 1900 }
                } else {
                    third.value
                };
                (year, first.value, second.value)
            });

            self.cursor.eat_while(is_blank);
            time = if self.cursor.check(is_decimal_digit) {
                let hour = self.scan_date_number()?;
                Some(self.scan_time(hour.value)?)
            } else {
                None
            };
        } else {
            time = Some(self.scan_time(first.value)?);
        }

        let (year, month, day) = date.unwrap_or((1, 1, 1));
        let (hour, minute, second) = time.unwrap_or((0, 0, 0));
        if !(1..=9999).contains(&year)
            || !(1..=12).contains(&month)
            || day < 1
            || day > days_in_month(year, month)
        {
            return None;
        }

        self.cursor.eat_while(is_blank);
        self.cursor.eat_if(|c| half_width(c) == '#')?;

        Some(DateValue {
            year: year as u16,
            month: month as u8,
            day: day as u8,
            hour: hour as u8,
            minute: minute as u8,
            second: second as u8,
        })
    }

    /// `H:M[:S] [AM|PM]` or `H AM|PM`, with `hour` already scanned.
    fn scan_time(&mut self, hour: u32) -> Option<(u32, u32, u32)> {
        let mut hour = hour;
        let mut minute = 0;
        let mut second = 0;
        let mut has_colon = false;

        if self.cursor.check(|c| half_width(c) == ':') {
            self.cursor.advance();
            minute = self.scan_date_number()?.value;
            has_colon = true;
            if self.cursor.check(|c| half_width(c) == ':') {
                self.cursor.advance();
                second = self.scan_date_number()?.value;
            }
        }

        self.cursor.eat_while(is_blank);
        let meridiem = match self.cursor.peek().map(|c| half_width(c).to_ascii_uppercase()) {
            Some('A') => Some(false),
            Some('P') => Some(true),
            _ => None,
        };

        match meridiem {
            Some(pm) => {
                self.cursor.advance();
                self.cursor.eat_if(|c| matches!(half_width(c), 'm' | 'M'));
                if hour == 0 || hour > 12 {
                    return None;
                }
                hour %= 12;
                if pm {
                    hour += 12;
                }
            }
            None if !has_colon => return None,
            None => {}
        }

        if hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        Some((hour, minute, second))
    }

    fn scan_date_number(&mut self) -> Option<DateNumber> {
        let mut value = 0u32;
        let mut digits = 0u32;
        while let Some(digit) = self.cursor.peek().and_then(|c| digit_value(c, 10)) {
            self.cursor.advance();
            digits += 1;
            if digits > 4 {
                return None;
            }
            value = value * 10 + digit;
        }
        (digits > 0).then_some(DateNumber { value, digits })
    }
}

struct DateNumber {
    value: u32,
    digits: u32,
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        _ => 0,
    }
}

/// Range-check an integer literal against its type and produce the
/// payload. Hex and octal literals may use the full unsigned range of the
/// type and are reinterpreted as signed.
fn integer_value(value: u64, base: IntegerBase, type_char: TypeCharacter) -> Option<TokenValue<'static>> {
    let decimal = base == IntegerBase::Decimal;
    let signed = |v: i64| TokenValue::Integer {
        value: v,
        base,
        type_char,
    };
    let unsigned = |v: u64| TokenValue::UnsignedInteger {
        value: v,
        base,
        type_char,
    };

    match type_char {
        TypeCharacter::UnsignedShortChar => (value <= u64::from(u16::MAX)).then(|| unsigned(value)),
        TypeCharacter::UnsignedIntegerChar => (value <= u64::from(u32::MAX)).then(|| unsigned(value)),
        TypeCharacter::UnsignedLongChar => Some(unsigned(value)),
        TypeCharacter::ShortChar => {
            if decimal {
                (value <= i16::MAX as u64).then(|| signed(value as i64))
            } else {
                (value <= u64::from(u16::MAX)).then(|| signed(i64::from(value as u16 as i16)))
            }
        }
        TypeCharacter::IntegerSymbol | TypeCharacter::IntegerChar => {
            if decimal {
                (value <= i32::MAX as u64).then(|| signed(value as i64))
            } else {
                (value <= u64::from(u32::MAX)).then(|| signed(i64::from(value as u32 as i32)))
            }
        }
        TypeCharacter::LongSymbol | TypeCharacter::LongChar => {
            if decimal {
                (value <= i64::MAX as u64).then(|| signed(value as i64))
            } else {
                Some(signed(value as i64))
            }
        }
        _ => {
            if decimal {
                (value <= i64::MAX as u64).then(|| signed(value as i64))
            } else if value <= u64::from(u32::MAX) {
                Some(signed(i64::from(value as u32 as i32)))
            } else {
                Some(signed(value as i64))
            }
        }
    }
}

/// Parse normalized `digits[.digits][e[+-]digits]` text as a 96-bit decimal.
fn parse_decimal(text: &str) -> Option<DecimalValue> {
    let (mantissa_text, exponent) = match text.find('e') {
        Some(i) => (&text[..i], text[i + 1..].parse::<i32>().ok()?),
        None => (text, 0),
    };
    let (int, frac) = mantissa_text.split_once('.').unwrap_or((mantissa_text, ""));

    let mut mantissa: u128 = 0;
    for c in int.chars().chain(frac.chars()) {
        mantissa = mantissa
            .checked_mul(10)?
            .checked_add(u128::from(c.to_digit(10)?))?;
    }

    let max_scale = i64::from(DecimalValue::MAX_SCALE);
    let mut scale = frac.len() as i64 - i64::from(exponent);
    if mantissa == 0 {
        scale = scale.clamp(0, max_scale);
    }
    if scale < 0 {
        let factor = u32::try_from(-scale).ok().and_then(|n| 10u128.checked_pow(n))?;
        mantissa = mantissa.checked_mul(factor)?;
        scale = 0;
    }
    if scale > max_scale {
        let excess = scale - max_scale;
        mantissa = match u32::try_from(excess).ok().and_then(|n| 10u128.checked_pow(n)) {
            Some(divisor) => mantissa / divisor,
            None => 0,
        };
        scale = max_scale;
    }
    while mantissa > DecimalValue::MAX_MANTISSA && scale > 0 {
        mantissa /= 10;
        scale -= 1;
    }
    if mantissa > DecimalValue::MAX_MANTISSA {
        return None;
    }
    Some(DecimalValue {
        mantissa,
        scale: scale as u8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_ranges() {
        let d = IntegerBase::Decimal;
        let h = IntegerBase::Hexadecimal;
        assert!(integer_value(32767, d, TypeCharacter::ShortChar).is_some());
        assert!(integer_value(32768, d, TypeCharacter::ShortChar).is_none());
        assert_eq!(
            integer_value(0xFFFF, h, TypeCharacter::ShortChar),
            Some(TokenValue::Integer {
                value: -1,
                base: h,
                type_char: TypeCharacter::ShortChar
            })
        );
        assert_eq!(
            integer_value(0xFFFF_FFFF, h, TypeCharacter::None),
            Some(TokenValue::Integer {
                value: -1,
                base: h,
                type_char: TypeCharacter::None
            })
        );
        assert!(integer_value(u64::MAX, d, TypeCharacter::None).is_none());
        assert!(integer_value(70000, d, TypeCharacter::UnsignedShortChar).is_none());
    }

    #[test]
    fn decimal_parsing() {
        assert_eq!(
            parse_decimal("12.50"),
            Some(DecimalValue {
                mantissa: 1250,
                scale: 2
            })
        );
        assert_eq!(
            parse_decimal("1.5e2"),
            Some(DecimalValue {
                mantissa: 150,
                scale: 0
            })
        );
        assert!(parse_decimal("79228162514264337593543950335").is_some());
        assert!(parse_decimal("79228162514264337593543950336").is_none());
    }

    #[test]
    fn decimal_extreme_exponents() {
        let zero = DecimalValue {
            mantissa: 0,
            scale: 28,
        };
        assert_eq!(parse_decimal("1e-2147483648"), Some(zero));
        assert_eq!(parse_decimal("1e-2000000000"), Some(zero));
        assert_eq!(
            parse_decimal("0e2147483647"),
            Some(DecimalValue {
                mantissa: 0,
                scale: 0
            })
        );
        assert!(parse_decimal("1e2147483647").is_none());
        assert_eq!(
            parse_decimal("123456e-30"),
            Some(DecimalValue {
                mantissa: 1234,
                scale: 28
            })
        );
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2004, 2), 29);
        assert_eq!(days_in_month(2001, 4), 30);
        assert_eq!(days_in_month(2001, 13), 0);
    }
}
