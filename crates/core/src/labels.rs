//! String-labelled enum helpers.
//!
//! Every enumerated field in the domain is stored and transmitted as a
//! lowercase string label. [`define_label_enum!`] generates the enum together
//! with its label table, parsing, `Display`, and serde support so that the
//! label list lives in exactly one place.

/// Error returned when a string is not one of an enum's labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be one of: {allowed}")]
pub struct ParseLabelError {
    pub field: &'static str,
    pub value: String,
    pub allowed: String,
}

macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($field:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Every accepted label, in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            /// The lowercase label stored in the database and sent over the wire.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::labels::ParseLabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err($crate::labels::ParseLabelError {
                        field: $field,
                        value: s.to_string(),
                        allowed: Self::LABELS.join(", "),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::labels::ParseLabelError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub(crate) use define_label_enum;

/// Parse an optional label, pushing a message onto `errors` when it is invalid.
///
/// Absent values yield `None` without an error.
pub(crate) fn parse_optional<T>(value: Option<&str>, errors: &mut Vec<String>) -> Option<T>
where
    T: std::str::FromStr<Err = ParseLabelError>,
{
    match value.map(str::parse::<T>) {
        Some(Ok(parsed)) => Some(parsed),
        Some(Err(e)) => {
            errors.push(e.to_string());
            None
        }
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    define_label_enum! {
        /// Test-only enum.
        Colour ("colour") {
            Red = "red",
            Green = "green",
        }
    }

    #[test]
    fn parses_known_labels() {
        assert_eq!("red".parse::<Colour>(), Ok(Colour::Red));
        assert_eq!(Colour::try_from("green".to_string()), Ok(Colour::Green));
    }

    #[test]
    fn rejects_unknown_label_with_allowed_list() {
        let err = "blue".parse::<Colour>().unwrap_err();
        assert_eq!(err.to_string(), "colour must be one of: red, green");
        assert_eq!(err.value, "blue");
    }

    #[test]
    fn labels_are_case_sensitive() {
        assert!("Red".parse::<Colour>().is_err());
    }

    #[test]
    fn serde_uses_labels() {
        assert_eq!(serde_json::to_string(&Colour::Green).unwrap(), "\"green\"");
        let parsed: Colour = serde_json::from_str("\"red\"").unwrap();
        assert_eq!(parsed, Colour::Red);
    }

    #[test]
    fn parse_optional_collects_errors() {
        let mut errors = Vec::new();
        assert_eq!(parse_optional::<Colour>(None, &mut errors), None);
        assert_eq!(parse_optional::<Colour>(Some("red"), &mut errors), Some(Colour::Red));
        assert_eq!(parse_optional::<Colour>(Some("pink"), &mut errors), None);
        assert_eq!(errors.len(), 1);
    }
}
