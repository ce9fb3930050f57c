//! Purchase type and status enumerations
//!
//! On the wire both travel as their integer discriminant. Names parse
//! case-insensitively, and the numeric form is accepted as text too.

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {type_name}")]
pub struct ParseEnumError {
    pub type_name: &'static str,
    pub value: String,
}

macro_rules! erp_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $first:ident = $first_value:literal,
            $($variant:ident = $value:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[repr(u8)]
        pub enum $name {
            #[default]
            $first = $first_value,
            $($variant = $value),*
        }

        impl $name {
            /// Every member in discriminant order
            pub const ALL: &'static [$name] = &[$name::$first, $($name::$variant),*];

            pub fn name(self) -> &'static str {
                match self {
                    $name::$first => stringify!($first),
                    $($name::$variant => stringify!($variant)),*
                }
            }

            pub fn discriminant(self) -> u8 {
                self as u8
            }

            pub fn from_discriminant(value: u8) -> Option<Self> {
                Self::ALL.iter().copied().find(|member| member.discriminant() == value)
            }

            /// Parse without failing: anything unrecognised becomes the
            /// zero member.
            pub fn parse_lenient(value: &str) -> Self {
                match value.parse() {
                    Ok(member) => member,
                    Err(e) => {
                        tracing::debug!("{}, using {}", e, $name::default().name());
                        $name::default()
                    }
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if let Some(member) = Self::ALL
                    .iter()
                    .copied()
                    .find(|member| member.name().eq_ignore_ascii_case(trimmed))
                {
                    return Ok(member);
                }
                trimmed
                    .parse::<u8>()
                    .ok()
                    .and_then(Self::from_discriminant)
                    .ok_or_else(|| ParseEnumError {
                        type_name: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.discriminant())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct MemberVisitor;

                impl<'de> Visitor<'de> for MemberVisitor {
                    type Value = $name;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        write!(f, "a {} name or discriminant", stringify!($name))
                    }

                    fn visit_u64<E: de::Error>(self, v: u64) -> Result<$name, E> {
                        u8::try_from(v)
                            .ok()
                            .and_then($name::from_discriminant)
                            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
                    }

                    fn visit_i64<E: de::Error>(self, v: i64) -> Result<$name, E> {
                        u8::try_from(v)
                            .ok()
                            .and_then($name::from_discriminant)
                            .ok_or_else(|| E::invalid_value(Unexpected::Signed(v), &self))
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<$name, E> {
                        v.parse().map_err(E::custom)
                    }
                }

                deserializer.deserialize_any(MemberVisitor)
            }
        }
    };
}

erp_enum! {
    /// Kind of purchase order
    PurchaseType {
        Journal = 0,
        Quotation = 1,
        Subscription = 2,
        Purch = 3,
        ReturnItem = 4,
    }
}

erp_enum! {
    /// Lifecycle state of a purchase order
    PurchaseStatus {
        None = 0,
        Backorder = 1,
        Received = 2,
        Invoiced = 3,
        Cancelled = 4,
    }
}
