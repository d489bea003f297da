//! Closed enum tables for every one-byte categorical field.
//!
//! Each enum has a fixed wire code and a lowercase label. Decoding an
//! unknown code or parsing an unknown label never fails: it resolves to the
//! enum's documented fallback member. Labels are matched after trimming,
//! lowercasing and folding `-` and spaces to `_`, so `"Case Law"`,
//! `"case-law"` and `"CASE_LAW"` are the same value.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Normalize a free-form label for table lookup.
pub(crate) fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (fallback = $fallback:ident) {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code, )+
        }

        impl $name {
            /// Every member in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Member used for unknown codes and labels.
            pub const FALLBACK: $name = $name::$fallback;

            /// Parse a label; unknown labels resolve to [`Self::FALLBACK`].
            #[must_use]
            pub fn from_label(label: &str) -> Self {
                match normalize_label(label).as_str() {
                    $( $label => $name::$variant, )+
                    _ => Self::FALLBACK,
                }
            }

            /// Parse a label, or `None` when it is not in the table.
            #[must_use]
            pub fn try_from_label(label: &str) -> Option<Self> {
                match normalize_label(label).as_str() {
                    $( $label => Some($name::$variant), )+
                    _ => None,
                }
            }

            /// Map a wire code back; unknown codes resolve to [`Self::FALLBACK`].
            #[must_use]
            pub const fn from_code(code: u8) -> Self {
                match code {
                    $( $code => $name::$variant, )+
                    _ => Self::FALLBACK,
                }
            }

            #[inline]
            #[must_use]
            pub const fn code(self) -> u8 {
                self as u8
            }

            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::FALLBACK
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let label = String::deserialize(deserializer)?;
                Ok(Self::from_label(&label))
            }
        }
    };
}

closed_enum! {
    /// Kind of legal document.
    pub enum DocumentType (fallback = Evidence) {
        Contract = 0 => "contract",
        Evidence = 1 => "evidence",
        Brief = 2 => "brief",
        Citation = 3 => "citation",
        Precedent = 4 => "precedent",
        Motion = 5 => "motion",
        Pleading = 6 => "pleading",
        Correspondence = 7 => "correspondence",
        Statute = 8 => "statute",
        Regulation = 9 => "regulation",
        CaseLaw = 10 => "case_law",
        Memo = 11 => "memo",
        Transcript = 12 => "transcript",
    }
}

closed_enum! {
    /// Assessed risk of a document or node.
    pub enum RiskLevel (fallback = Medium) {
        Low = 0 => "low",
        Medium = 1 => "medium",
        High = 2 => "high",
        Critical = 3 => "critical",
    }
}

closed_enum! {
    /// Access restriction. Unknown labels resolve to the restrictive side.
    pub enum Confidentiality (fallback = Confidential) {
        Public = 0 => "public",
        Internal = 1 => "internal",
        Confidential = 2 => "confidential",
        Privileged = 3 => "privileged",
        Sealed = 4 => "sealed",
    }
}

closed_enum! {
    pub enum PracticeArea (fallback = General) {
        General = 0 => "general",
        Criminal = 1 => "criminal",
        Civil = 2 => "civil",
        Corporate = 3 => "corporate",
        Family = 4 => "family",
        IntellectualProperty = 5 => "intellectual_property",
        Employment = 6 => "employment",
        RealEstate = 7 => "real_estate",
        Tax = 8 => "tax",
        Immigration = 9 => "immigration",
        Environmental = 10 => "environmental",
        Bankruptcy = 11 => "bankruptcy",
    }
}

closed_enum! {
    pub enum CourtLevel (fallback = Unspecified) {
        Unspecified = 0 => "unspecified",
        Trial = 1 => "trial",
        Appellate = 2 => "appellate",
        Supreme = 3 => "supreme",
        Federal = 4 => "federal",
        Administrative = 5 => "administrative",
    }
}

closed_enum! {
    pub enum EvidenceType (fallback = Unspecified) {
        Unspecified = 0 => "unspecified",
        Documentary = 1 => "documentary",
        Testimonial = 2 => "testimonial",
        Physical = 3 => "physical",
        Digital = 4 => "digital",
        Demonstrative = 5 => "demonstrative",
        Expert = 6 => "expert",
    }
}

closed_enum! {
    /// Status of the physical or electronic copy.
    pub enum DocumentClass (fallback = Unclassified) {
        Unclassified = 0 => "unclassified",
        Original = 1 => "original",
        Copy = 2 => "copy",
        Draft = 3 => "draft",
        Executed = 4 => "executed",
        Certified = 5 => "certified",
        Redacted = 6 => "redacted",
    }
}

closed_enum! {
    /// Kind of node in the case graph.
    pub enum NodeType (fallback = Document) {
        Document = 0 => "document",
        Case = 1 => "case",
        Evidence = 2 => "evidence",
        Person = 3 => "person",
        Entity = 4 => "entity",
        Citation = 5 => "citation",
        Concept = 6 => "concept",
    }
}
