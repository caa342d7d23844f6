//! Presentation metadata of native denominations, as kept by the bank.

#[cfg(feature = "datasize")]
use datasize::DataSize;
use serde::{Deserialize, Serialize};

use crate::bytesrepr::{self, FromBytes, ToBytes};

/// The exponent of the display unit created for a native denomination that has no metadata.
pub const DEFAULT_DISPLAY_EXPONENT: u32 = 18;

/// A unit of a denomination: `1 denom = 10^exponent base units`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct DenomUnit {
    /// Name of the unit.
    pub denom: String,
    /// Power of ten relating this unit to the base unit.
    pub exponent: u32,
    /// Alternative names of the unit.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl DenomUnit {
    /// Creates a unit without aliases.
    pub fn new(denom: impl Into<String>, exponent: u32) -> Self {
        DenomUnit {
            denom: denom.into(),
            exponent,
            aliases: Vec::new(),
        }
    }
}

/// Presentation metadata of a native denomination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "datasize", derive(DataSize))]
pub struct DenomMetadata {
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Units of the denomination, the base unit (exponent 0) first.
    pub denom_units: Vec<DenomUnit>,
    /// Name of the base unit.
    pub base: String,
    /// Name of the unit shown to users.
    pub display: String,
    /// Human-facing name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
}

impl DenomMetadata {
    /// Builds the metadata installed for a native denomination that has none.
    ///
    /// The display unit is the denomination without its one-character unit prefix, uppercased,
    /// at exponent 18: `aphoton` displays as `PHOTON`. Returns `None` for denominations shorter
    /// than two characters.
    pub fn default_for_native(denom: &str) -> Option<Self> {
        let mut chars = denom.chars();
        chars.next()?;
        let display: String = chars.as_str().to_uppercase();
        if display.is_empty() {
            return None;
        }
        Some(DenomMetadata {
            description: String::new(),
            denom_units: vec![
                DenomUnit::new(denom, 0),
                DenomUnit::new(display.clone(), DEFAULT_DISPLAY_EXPONENT),
            ],
            base: denom.to_string(),
            display: display.clone(),
            name: display.clone(),
            symbol: display,
        })
    }

    /// Returns the unit named `denom`, if any.
    pub fn unit(&self, denom: &str) -> Option<&DenomUnit> {
        self.denom_units.iter().find(|unit| unit.denom == denom)
    }

    /// Returns the exponent of the display unit, if the display unit is listed.
    pub fn display_exponent(&self) -> Option<u32> {
        self.unit(&self.display).map(|unit| unit.exponent)
    }
}

impl ToBytes for DenomUnit {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.denom.serialized_length()
            + self.exponent.serialized_length()
            + self.aliases.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.denom.write_bytes(writer)?;
        self.exponent.write_bytes(writer)?;
        self.aliases.write_bytes(writer)
    }
}

impl FromBytes for DenomUnit {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (denom, remainder) = String::from_bytes(bytes)?;
        let (exponent, remainder) = u32::from_bytes(remainder)?;
        let (aliases, remainder) = Vec::<String>::from_bytes(remainder)?;
        Ok((
            DenomUnit {
                denom,
                exponent,
                aliases,
            },
            remainder,
        ))
    }
}

impl ToBytes for DenomMetadata {
    fn to_bytes(&self) -> Result<Vec<u8>, bytesrepr::Error> {
        let mut result = bytesrepr::allocate_buffer(self)?;
        self.write_bytes(&mut result)?;
        Ok(result)
    }

    fn serialized_length(&self) -> usize {
        self.description.serialized_length()
            + self.denom_units.serialized_length()
            + self.base.serialized_length()
            + self.display.serialized_length()
            + self.name.serialized_length()
            + self.symbol.serialized_length()
    }

    fn write_bytes(&self, writer: &mut Vec<u8>) -> Result<(), bytesrepr::Error> {
        self.description.write_bytes(writer)?;
        self.denom_units.write_bytes(writer)?;
        self.base.write_bytes(writer)?;
        self.display.write_bytes(writer)?;
        self.name.write_bytes(writer)?;
        self.symbol.write_bytes(writer)
    }
}

impl FromBytes for DenomMetadata {
    fn from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), bytesrepr::Error> {
        let (description, remainder) = String::from_bytes(bytes)?;
        let (denom_units, remainder) = Vec::<DenomUnit>::from_bytes(remainder)?;
        let (base, remainder) = String::from_bytes(remainder)?;
        let (display, remainder) = String::from_bytes(remainder)?;
        let (name, remainder) = String::from_bytes(remainder)?;
        let (symbol, remainder) = String::from_bytes(remainder)?;
        Ok((
            DenomMetadata {
                description,
                denom_units,
                base,
                display,
                name,
                symbol,
            },
            remainder,
        ))
    }
}
