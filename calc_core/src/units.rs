//! # Unit Types
//!
//! Type-safe unit enums for the four fixed-factor converters. Each unit knows
//! its lookup key, its display labels, and its size expressed in the
//! category's base unit. Conversion factors are always derived from those base
//! sizes (see [`crate::conversion`]), so the unit tables are consistent by
//! construction.
//!
//! ## Categories
//!
//! - Weight: base unit kilogram (9 units)
//! - Length: base unit metre (6 units)
//! - Volume: base unit litre, US customary gallons/quarts/pints/cups (6 units)
//! - Area: base unit square metre (6 units)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{MeasureUnit, WeightUnit};
//!
//! let unit: WeightUnit = "lb".parse().unwrap();
//! assert_eq!(unit, WeightUnit::Pound);
//! assert_eq!(unit.label().full, "Pound");
//! ```

use serde::{Deserialize, Serialize};

use crate::currency::Language;
use crate::errors::{CalcError, CalcResult};

/// Display labels for a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitLabel {
    /// English name ("Kilogram")
    pub full: &'static str,
    /// Abbreviation shown next to values ("kg")
    pub short: &'static str,
    /// Thai name
    pub th: &'static str,
}

impl UnitLabel {
    /// Full name in the requested language.
    pub fn name(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.full,
            Language::Th => self.th,
        }
    }
}

/// Converter categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitCategory {
    Weight,
    Length,
    Volume,
    Area,
}

impl UnitCategory {
    /// All categories in menu order
    pub const ALL: [UnitCategory; 4] = [
        UnitCategory::Weight,
        UnitCategory::Length,
        UnitCategory::Volume,
        UnitCategory::Area,
    ];

    /// Lowercase key used in JSON and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            UnitCategory::Weight => "weight",
            UnitCategory::Length => "length",
            UnitCategory::Volume => "volume",
            UnitCategory::Area => "area",
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitCategory::Weight => "Weight",
            UnitCategory::Length => "Length",
            UnitCategory::Volume => "Volume",
            UnitCategory::Area => "Area",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "weight" | "mass" => Ok(UnitCategory::Weight),
            "length" | "distance" => Ok(UnitCategory::Length),
            "volume" => Ok(UnitCategory::Volume),
            "area" => Ok(UnitCategory::Area),
            _ => Err(CalcError::invalid_input(
                "category",
                s,
                "Expected one of: weight, length, volume, area",
            )),
        }
    }

    /// Units of this category in canonical order
    pub fn units(&self) -> Vec<AnyUnit> {
        match self {
            UnitCategory::Weight => WeightUnit::ALL.iter().copied().map(AnyUnit::Weight).collect(),
            UnitCategory::Length => LengthUnit::ALL.iter().copied().map(AnyUnit::Length).collect(),
            UnitCategory::Volume => VolumeUnit::ALL.iter().copied().map(AnyUnit::Volume).collect(),
            UnitCategory::Area => AreaUnit::ALL.iter().copied().map(AnyUnit::Area).collect(),
        }
    }
}

impl std::fmt::Display for UnitCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A unit belonging to one converter category.
pub trait MeasureUnit: Copy + Eq + std::fmt::Debug + 'static {
    /// Category this unit converts within
    const CATEGORY: UnitCategory;

    /// Every unit of the category, in canonical order
    const ALL: &'static [Self];

    /// Lookup key ("kg", "sqft")
    fn key(self) -> &'static str;

    /// Display labels
    fn label(self) -> UnitLabel;

    /// Size of one of this unit in the category's base unit
    fn base_factor(self) -> f64;

    /// Parse a unit by key, short label or English name (case-insensitive).
    fn parse(s: &str) -> CalcResult<Self> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|unit| {
                let label = unit.label();
                unit.key().eq_ignore_ascii_case(needle)
                    || label.short.eq_ignore_ascii_case(needle)
                    || label.full.eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| CalcError::unknown_unit(Self::CATEGORY.key(), needle))
    }
}

// ============================================================================
// Unit definitions (macro to reduce boilerplate)
// ============================================================================

macro_rules! define_units {
    (
        $(#[$meta:meta])*
        $name:ident in $category:expr => {
            $( $variant:ident => ($key:literal, $full:literal, $short:literal, $th:literal, $factor:expr) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl MeasureUnit for $name {
            const CATEGORY: UnitCategory = $category;
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn key(self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            fn label(self) -> UnitLabel {
                match self {
                    $($name::$variant => UnitLabel { full: $full, short: $short, th: $th },)+
                }
            }

            fn base_factor(self) -> f64 {
                match self {
                    $($name::$variant => $factor,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.key())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CalcError;

            fn from_str(s: &str) -> CalcResult<Self> {
                <$name as MeasureUnit>::parse(s)
            }
        }
    };
}

define_units! {
    /// Weight units (base: kilogram)
    WeightUnit in UnitCategory::Weight => {
        Kilogram => ("kg", "Kilogram", "kg", "กิโลกรัม", 1.0),
        Pound => ("lb", "Pound", "lb", "ปอนด์", 0.453_592_37),
        Gram => ("g", "Gram", "g", "กรัม", 0.001),
        Ounce => ("oz", "Ounce", "oz", "ออนซ์", 0.028_349_523_125),
        Ton => ("t", "Ton", "t", "ตัน", 1000.0),
        Milligram => ("mg", "Milligram", "mg", "มิลลิกรัม", 0.000_001),
        Stone => ("st", "Stone", "st", "สโตน", 6.350_293_18),
        Carat => ("ct", "Carat", "ct", "กะรัต", 0.000_2),
        Grain => ("gr", "Grain", "gr", "เกรน", 0.000_064_798_91),
    }
}

define_units! {
    /// Length units (base: metre)
    LengthUnit in UnitCategory::Length => {
        Meter => ("m", "Meter", "m", "เมตร", 1.0),
        Kilometer => ("km", "Kilometer", "km", "กิโลเมตร", 1000.0),
        Centimeter => ("cm", "Centimeter", "cm", "เซนติเมตร", 0.01),
        Millimeter => ("mm", "Millimeter", "mm", "มิลลิเมตร", 0.001),
        Foot => ("ft", "Foot", "ft", "ฟุต", 0.3048),
        Inch => ("in", "Inch", "in", "นิ้ว", 0.0254),
    }
}

define_units! {
    /// Volume units (base: litre). Gallon and its subdivisions are US customary.
    VolumeUnit in UnitCategory::Volume => {
        Liter => ("l", "Liter", "L", "ลิตร", 1.0),
        Milliliter => ("ml", "Milliliter", "mL", "มิลลิลิตร", 0.001),
        Gallon => ("gal", "Gallon", "gal", "แกลลอน", 3.785_411_784),
        Quart => ("qt", "Quart", "qt", "ควอร์ต", 0.946_352_946),
        Pint => ("pt", "Pint", "pt", "ไพน์ต", 0.473_176_473),
        Cup => ("cup", "Cup", "cup", "ถ้วย", 0.236_588_236_5),
    }
}

define_units! {
    /// Area units (base: square metre)
    AreaUnit in UnitCategory::Area => {
        SquareMeter => ("sqm", "Square Meter", "m²", "ตารางเมตร", 1.0),
        SquareKilometer => ("sqkm", "Square Kilometer", "km²", "ตารางกิโลเมตร", 1_000_000.0),
        SquareFoot => ("sqft", "Square Foot", "ft²", "ตารางฟุต", 0.092_903_04),
        SquareInch => ("sqin", "Square Inch", "in²", "ตารางนิ้ว", 0.000_645_16),
        Hectare => ("ha", "Hectare", "ha", "เฮกตาร์", 10_000.0),
        Acre => ("acre", "Acre", "acre", "เอเคอร์", 4_046.856_422_4),
    }
}

// ============================================================================
// Category-erased unit
// ============================================================================

/// A unit from any category, for string-keyed APIs (CLI, JSON requests).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", content = "unit", rename_all = "lowercase")]
pub enum AnyUnit {
    Weight(WeightUnit),
    Length(LengthUnit),
    Volume(VolumeUnit),
    Area(AreaUnit),
}

impl AnyUnit {
    /// Parse a unit key within a category.
    pub fn parse(category: UnitCategory, s: &str) -> CalcResult<Self> {
        Ok(match category {
            UnitCategory::Weight => AnyUnit::Weight(WeightUnit::parse(s)?),
            UnitCategory::Length => AnyUnit::Length(LengthUnit::parse(s)?),
            UnitCategory::Volume => AnyUnit::Volume(VolumeUnit::parse(s)?),
            UnitCategory::Area => AnyUnit::Area(AreaUnit::parse(s)?),
        })
    }

    pub fn category(&self) -> UnitCategory {
        match self {
            AnyUnit::Weight(_) => UnitCategory::Weight,
            AnyUnit::Length(_) => UnitCategory::Length,
            AnyUnit::Volume(_) => UnitCategory::Volume,
            AnyUnit::Area(_) => UnitCategory::Area,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            AnyUnit::Weight(u) => u.key(),
            AnyUnit::Length(u) => u.key(),
            AnyUnit::Volume(u) => u.key(),
            AnyUnit::Area(u) => u.key(),
        }
    }

    pub fn label(&self) -> UnitLabel {
        match self {
            AnyUnit::Weight(u) => u.label(),
            AnyUnit::Length(u) => u.label(),
            AnyUnit::Volume(u) => u.label(),
            AnyUnit::Area(u) => u.label(),
        }
    }

    pub fn base_factor(&self) -> f64 {
        match self {
            AnyUnit::Weight(u) => u.base_factor(),
            AnyUnit::Length(u) => u.base_factor(),
            AnyUnit::Volume(u) => u.base_factor(),
            AnyUnit::Area(u) => u.base_factor(),
        }
    }
}

impl std::fmt::Display for AnyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}
