//! Error taxonomy shared by every arithmetic core in `unum` (spec.md §7).

#[cfg(feature = "std")]
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Recoverable error conditions raised by the arithmetic cores when their
/// [`crate::ErrorPolicy`] is [`crate::Throw`].
///
/// When the policy is [`crate::Sentinel`] instead, callers never see this
/// type: the core produces the type's sentinel value (NaR, NaN, or an
/// unspecified bit pattern for plain integers) and logs one `tracing::warn!`
/// line in its place.
#[cfg_attr(feature = "std", derive(Error))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Integer division or remainder, or posit/lns division, by zero.
    #[cfg_attr(feature = "std", error("division by zero"))]
    DivideByZero,
    /// A posit operand was NaR ("not a real").
    #[cfg_attr(feature = "std", error("operand is not a real (NaR)"))]
    OperandIsNaR,
    /// A `Whole`-kind integer subtraction or division would produce zero,
    /// which `Whole` excludes from its representable range.
    #[cfg_attr(feature = "std", error("result is not representable as a non-zero whole number"))]
    NonRepresentableZero,
    /// A `Natural`-kind integer subtraction or division would produce a
    /// negative value.
    #[cfg_attr(feature = "std", error("result is negative, which is not allowed for a natural number"))]
    NegativeNotAllowed,
    /// Textual input matched no recognised grammar.
    #[cfg_attr(feature = "std", error("input does not match any recognised numeric grammar"))]
    ParseFailure,
    /// Input matched a recognised grammar with no implementation behind it
    /// yet (currently: octal integer literals, saturating fixed-point
    /// division).
    #[cfg_attr(feature = "std", error("recognised but unimplemented format"))]
    UnsupportedFormat,
    /// A width/limb combination could not address the requested number of
    /// bits (not part of spec.md's taxonomy; raised only by malformed
    /// const-generic configurations).
    #[cfg_attr(feature = "std", error("storage overflow: {0}"))]
    Overflow(&'static str),
}

#[cfg(not(feature = "std"))]
impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Error::DivideByZero => "division by zero",
            Error::OperandIsNaR => "operand is not a real (NaR)",
            Error::NonRepresentableZero => {
                "result is not representable as a non-zero whole number"
            }
            Error::NegativeNotAllowed => {
                "result is negative, which is not allowed for a natural number"
            }
            Error::ParseFailure => "input does not match any recognised numeric grammar",
            Error::UnsupportedFormat => "recognised but unimplemented format",
            Error::Overflow(reason) => return write!(f, "storage overflow: {reason}"),
        };
        f.write_str(msg)
    }
}
