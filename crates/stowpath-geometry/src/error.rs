#![warn(missing_docs)]

//! Error types for the geometry library.
//!
//! This module defines the errors that can occur while constructing
//! fixed-point values from text.

use core::fmt;

/// Errors that can occur while parsing or constructing geometry values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The input is not a decimal number of the form `[-+]digits[.digits]`.
    InvalidDecimal(&'static str),
    /// The input has more fractional digits than a `Fixed` can hold exactly.
    TooManyFractionDigits(&'static str),
    /// The value does not fit into the fixed-point range.
    Overflow(&'static str),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidDecimal(msg) => write!(f, "Invalid decimal: {}", msg),
            GeometryError::TooManyFractionDigits(msg) => {
                write!(f, "Too many fraction digits: {}", msg)
            }
            GeometryError::Overflow(msg) => write!(f, "Decimal overflow: {}", msg),
        }
    }
}

impl core::error::Error for GeometryError {}
