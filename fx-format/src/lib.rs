//! Currency-Aware Display Formatting with Macro-Based Currency Table
//!
//! Known currencies are defined declaratively using a macro that generates the
//! `KnownCurrency` enum with its code, symbol and minor digits. Amounts in a
//! known currency render with the symbol and en-US digit grouping. Any other
//! well-formed ISO code (three ASCII letters) gets the same grouping with the
//! code as prefix. Anything else falls back to a plain `CODE 1234.5678`.
//!
//! # Precision policy
//! Magnitudes above 1000 render with 2 fraction digits. Everything else renders
//! with up to 4, trailing zeros trimmed down to the currency's minor digits.
//!
//! # Example
//! ```
//! use fx_format::{format_display, format_rate_line};
//!
//! assert_eq!(format_display(1500.5, "USD"), "$1,500.50");
//! assert_eq!(format_display(3.14159, "USD"), "$3.1416");
//! assert_eq!(format_rate_line("USD", "INR", 83.0), "1 USD = 83.0000 INR");
//! ```

use std::fmt;

/// Above this magnitude, amounts are shown with 2 fraction digits.
pub const LARGE_AMOUNT_THRESHOLD: f64 = 1000.0;

const LARGE_AMOUNT_DIGITS: usize = 2;
const SMALL_AMOUNT_DIGITS: usize = 4;
const FALLBACK_DIGITS: usize = 4;
const DEFAULT_MINOR_DIGITS: usize = 2;

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the known currency table
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define the currencies the formatter recognises.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Name => ("CODE", "SYMBOL", minor_digits),
/// }
/// ```
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $minor_digits:expr)
        ),* $(,)?
    ) => {
        /// Currencies with a dedicated display symbol.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum KnownCurrency {
            $($name),*
        }

        impl KnownCurrency {
            pub fn code(&self) -> &'static str {
                match self {
                    $(KnownCurrency::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(KnownCurrency::$name => $symbol),*
                }
            }

            /// Number of fraction digits the currency is normally quoted with.
            pub fn minor_digits(&self) -> usize {
                match self {
                    $(KnownCurrency::$name => $minor_digits),*
                }
            }

            pub fn all() -> &'static [KnownCurrency] {
                &[$(KnownCurrency::$name),*]
            }
        }

        impl std::fmt::Display for KnownCurrency {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for KnownCurrency {
            type Err = String;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_uppercase().as_str() {
                    $($code => Ok(KnownCurrency::$name),)*
                    _ => Err(format!("Unknown currency: {}", s)),
                }
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new symbols here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("USD", "$", 2),
    EUR => ("EUR", "€", 2),
    GBP => ("GBP", "£", 2),
    INR => ("INR", "₹", 2),
    JPY => ("JPY", "¥", 0),
    CNY => ("CNY", "CN¥", 2),
    KRW => ("KRW", "₩", 0),
    CAD => ("CAD", "CA$", 2),
    AUD => ("AUD", "A$", 2),
    NZD => ("NZD", "NZ$", 2),
    HKD => ("HKD", "HK$", 2),
    MXN => ("MXN", "MX$", 2),
    BRL => ("BRL", "R$", 2),
    ILS => ("ILS", "₪", 2),
    PHP => ("PHP", "₱", 2),
    TWD => ("TWD", "NT$", 2),
    VND => ("VND", "₫", 0),
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Maximum fraction digits for an amount of this magnitude.
pub fn max_fraction_digits(value: f64) -> usize {
    if value.abs() > LARGE_AMOUNT_THRESHOLD {
        LARGE_AMOUNT_DIGITS
    } else {
        SMALL_AMOUNT_DIGITS
    }
}

/// Renders `amount` for display in currency `code`.
pub fn format_display(amount: f64, code: &str) -> String {
    if let Ok(currency) = code.parse::<KnownCurrency>() {
        return grouped(amount, currency.symbol(), currency.minor_digits());
    }
    if is_iso_code(code) {
        return grouped(amount, &format!("{} ", code), DEFAULT_MINOR_DIGITS);
    }
    format!("{} {:.*}", code, FALLBACK_DIGITS, amount)
}

/// True for a three-letter uppercase ASCII code such as `CHF`.
pub fn is_iso_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

fn grouped(amount: f64, prefix: &str, minor_digits: usize) -> String {
    let max = max_fraction_digits(amount);
    let number = GroupedDecimal {
        value: amount,
        min_digits: minor_digits.min(max),
        max_digits: max,
    };
    if number.is_negative() {
        format!("-{}{}", prefix, number.abs())
    } else {
        format!("{}{}", prefix, number)
    }
}

/// Renders the `1 SRC = X.XXXX TGT` rate line.
pub fn format_rate_line(source: &str, target: &str, rate: f64) -> String {
    format!("1 {} = {:.4} {}", source, rate, target)
}

/// A number rendered with en-US grouping and a bounded fraction.
struct GroupedDecimal {
    value: f64,
    min_digits: usize,
    max_digits: usize,
}

impl GroupedDecimal {
    fn rounded(&self) -> String {
        format!("{:.*}", self.max_digits, self.value.abs())
    }

    fn is_negative(&self) -> bool {
        self.value < 0.0 && self.rounded().chars().any(|c| c.is_ascii_digit() && c != '0')
    }

    fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
            ..*self
        }
    }
}

impl fmt::Display for GroupedDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self.rounded();
        let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));

        let mut frac = frac_part.to_string();
        while frac.len() > self.min_digits && frac.ends_with('0') {
            frac.pop();
        }

        let len = int_part.len();
        for (i, digit) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", digit)?;
        }
        if !frac.is_empty() {
            write!(f, ".{}", frac)?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
