//! Macro for implementing Display and FromStr for fieldless enums
//!
//! Configuration values such as the org environment and the signing algorithm
//! are plain enums that arrive as strings from environment variables and leave
//! as strings in JWT headers and log fields. This macro generates both
//! directions from one mapping table.
//!
//! # Example
//!
//! ```rust
//! use forcelink_domain::impl_enum_string_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Channel {
//!     Stable,
//!     Preview,
//! }
//!
//! impl_enum_string_conversions!(Channel {
//!     Stable => "stable",
//!     Preview => "preview",
//! });
//!
//! assert_eq!(Channel::Preview.to_string(), "preview");
//! assert_eq!("STABLE".parse::<Channel>().unwrap(), Channel::Stable);
//! ```

/// Implements Display and FromStr traits for fieldless enums
///
/// This macro generates:
/// - Display trait: writes the mapped string exactly as given
/// - FromStr trait: parses ASCII case-insensitively against the mapped strings
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_enum_string_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return ::std::result::Result::Ok(Self::$variant);
                    }
                )+
                ::std::result::Result::Err(::std::format!(
                    "Invalid {}: {}",
                    ::std::stringify!($enum_name),
                    s
                ))
            }
        }
    };
}
