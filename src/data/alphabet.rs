//! Alphabets and named symbol groups.

use crate::error::{ProfilerError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The 20 standard amino acids in alphabetical one-letter order.
pub const AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";

/// An ordered, duplicate-free set of single-byte symbols.
///
/// Column `i` of every count matrix built against this alphabet holds the
/// occurrences of `symbols()[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
    /// Byte value -> column index.
    index: [Option<usize>; 256],
}

impl Alphabet {
    /// Create an alphabet from a string of symbols.
    pub fn new(symbols: &str) -> Result<Self> {
        if symbols.is_empty() {
            return Err(ProfilerError::EmptyInput(
                "Alphabet must contain at least one symbol".to_string(),
            ));
        }

        let mut index = [None; 256];
        let mut bytes = Vec::with_capacity(symbols.len());
        for (i, ch) in symbols.chars().enumerate() {
            if !ch.is_ascii() {
                return Err(ProfilerError::InvalidParameter(format!(
                    "Alphabet symbol '{}' is not ASCII",
                    ch
                )));
            }
            let b = ch as u8;
            if index[b as usize].is_some() {
                return Err(ProfilerError::InvalidParameter(format!(
                    "Duplicate alphabet symbol '{}'",
                    ch
                )));
            }
            index[b as usize] = Some(i);
            bytes.push(b);
        }

        Ok(Self {
            symbols: bytes,
            index,
        })
    }

    /// The 20 standard amino acids, alphabetical.
    pub fn amino_acids() -> Self {
        let mut index = [None; 256];
        for (i, &b) in AMINO_ACIDS.as_bytes().iter().enumerate() {
            index[b as usize] = Some(i);
        }
        Self {
            symbols: AMINO_ACIDS.as_bytes().to_vec(),
            index,
        }
    }

    /// Number of symbols.
    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed alphabet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in column order.
    #[inline]
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Column index of a symbol, if present.
    #[inline]
    pub fn index_of(&self, symbol: u8) -> Option<usize> {
        self.index[symbol as usize]
    }

    /// Column index of a symbol, failing with `InvalidSymbol`.
    pub fn require(&self, symbol: char) -> Result<usize> {
        if !symbol.is_ascii() {
            return Err(ProfilerError::InvalidSymbol(symbol));
        }
        self.index_of(symbol as u8)
            .ok_or(ProfilerError::InvalidSymbol(symbol))
    }

    /// Symbols as one-character names, used as result labels.
    pub fn names(&self) -> Vec<String> {
        self.symbols.iter().map(|&b| (b as char).to_string()).collect()
    }

    /// Alphabet as a string.
    pub fn as_string(&self) -> String {
        self.symbols.iter().map(|&b| b as char).collect()
    }
}

impl Serialize for Alphabet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_string())
    }
}

impl<'de> Deserialize<'de> for Alphabet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let symbols = String::deserialize(deserializer)?;
        Alphabet::new(&symbols).map_err(serde::de::Error::custom)
    }
}

/// A named subset of alphabet symbols.
///
/// Groups may overlap; each one contributes an extra "group count" column
/// to the discovery test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolGroup {
    /// Short machine key (e.g. `aromatic`).
    pub key: String,
    /// Human-readable name used in result tables.
    pub name: String,
    /// Member symbols.
    pub members: String,
}

impl SymbolGroup {
    /// Create a new group.
    pub fn new(key: &str, name: &str, members: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            members: members.to_string(),
        }
    }

    /// Resolve member symbols to alphabet column indices.
    pub fn column_indices(&self, alphabet: &Alphabet) -> Result<Vec<usize>> {
        self.members.chars().map(|ch| alphabet.require(ch)).collect()
    }
}

impl From<AminoAcidGroup> for SymbolGroup {
    fn from(group: AminoAcidGroup) -> Self {
        SymbolGroup::new(group.key(), group.name(), group.members())
    }
}

/// Amino acids grouped by physicochemical and structural properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AminoAcidGroup {
    Aromatic,
    Charged,
    PosCharged,
    NegCharged,
    HydrophobicityEisenberg,
    HydrophobicityKyte,
    HydrophobicityFauchere,
    SurfaceJanin,
    FlexibilityVihinen,
    InterfacePropensityJones,
    SolvationPotentialJones,
    DisorderDunker,
    OrderDunker,
    BulkinessZimmerman,
    PolarityZimmerman,
    AlphaNagano,
    BetaNagano,
    CoilNagano,
    LinkerGeorge,
    SizeDawson,
}

impl AminoAcidGroup {
    /// All groups in result-table order.
    pub const ALL: [AminoAcidGroup; 20] = [
        Self::Aromatic,
        Self::Charged,
        Self::PosCharged,
        Self::NegCharged,
        Self::HydrophobicityEisenberg,
        Self::HydrophobicityKyte,
        Self::HydrophobicityFauchere,
        Self::SurfaceJanin,
        Self::FlexibilityVihinen,
        Self::InterfacePropensityJones,
        Self::SolvationPotentialJones,
        Self::DisorderDunker,
        Self::OrderDunker,
        Self::BulkinessZimmerman,
        Self::PolarityZimmerman,
        Self::AlphaNagano,
        Self::BetaNagano,
        Self::CoilNagano,
        Self::LinkerGeorge,
        Self::SizeDawson,
    ];

    /// Machine key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Aromatic => "aromatic",
            Self::Charged => "charged",
            Self::PosCharged => "pos_charged",
            Self::NegCharged => "neg_charged",
            Self::PolarityZimmerman => "polarity_zimmerman",
            Self::HydrophobicityEisenberg => "hydrophobicity_eisenberg",
            Self::HydrophobicityKyte => "hydrophobicity_kyte",
            Self::HydrophobicityFauchere => "hydrophobicity_fauchere",
            Self::SurfaceJanin => "surface_janin",
            Self::FlexibilityVihinen => "flexibility_vihinen",
            Self::InterfacePropensityJones => "interface_propensity_jones",
            Self::SolvationPotentialJones => "solvation_potential_jones",
            Self::AlphaNagano => "alpha_nagano",
            Self::BetaNagano => "beta_nagano",
            Self::CoilNagano => "coil_nagano",
            Self::LinkerGeorge => "linker_george",
            Self::DisorderDunker => "disorder_dunker",
            Self::OrderDunker => "order_dunker",
            Self::BulkinessZimmerman => "bulkiness_zimmerman",
            Self::SizeDawson => "size_dawson",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Aromatic => "Aromatic",
            Self::Charged => "Charged",
            Self::PosCharged => "Positively charged",
            Self::NegCharged => "Negatively charged",
            Self::PolarityZimmerman => "Polar (Zimmerman)",
            Self::HydrophobicityEisenberg => "Hydrophobic (Eisenberg)",
            Self::HydrophobicityKyte => "Hydrophobic (Kyte-Doolittle)",
            Self::HydrophobicityFauchere => "Hydrophobic (Fauchere-Pliska)",
            Self::SurfaceJanin => "Exposed (Janin)",
            Self::FlexibilityVihinen => "Flexible (Vihinen)",
            Self::InterfacePropensityJones => "High interface propensity (Jones-Thornton)",
            Self::SolvationPotentialJones => "High solvation potential (Jones-Thornton)",
            Self::AlphaNagano => "Frequent in alpha helices (Nagano)",
            Self::BetaNagano => "Frequent in beta sheets (Nagano)",
            Self::CoilNagano => "Frequent in coils (Nagano)",
            Self::LinkerGeorge => "High linker propensity (George-Heringa)",
            Self::DisorderDunker => "Disorder promoting (Dunker)",
            Self::OrderDunker => "Order promoting (Dunker)",
            Self::BulkinessZimmerman => "Bulky (Zimmerman)",
            Self::SizeDawson => "Large (Dawson)",
        }
    }

    /// Member residues (one-letter codes).
    pub fn members(&self) -> &'static str {
        match self {
            Self::Aromatic => "FWY",
            Self::Charged => "KRDE",
            Self::PosCharged => "KR",
            Self::NegCharged => "DE",
            Self::PolarityZimmerman => "KDEHR",
            Self::HydrophobicityEisenberg => "PYCGAMWLVFI",
            Self::HydrophobicityKyte => "AMCFLVI",
            Self::HydrophobicityFauchere => "HTAPYVCLFIMW",
            Self::SurfaceJanin => "DEHKNPQRSTY",
            Self::FlexibilityVihinen => "RGQSNPDEK",
            Self::InterfacePropensityJones => "NRVLHCIMYFW",
            Self::SolvationPotentialJones => "AGSTPNRQDEK",
            Self::AlphaNagano => "LKMFAHE",
            Self::BetaNagano => "YCWQTLMFVI",
            Self::CoilNagano => "CTDRSGYNP",
            Self::LinkerGeorge => "YHTMQELFRP",
            Self::DisorderDunker => "ARSQEGKP",
            Self::OrderDunker => "NCILFWYV",
            Self::BulkinessZimmerman => "ILVW",
            Self::SizeDawson => "NETVILPQHMFKWYR",
        }
    }

    /// Look up a group by its machine key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|g| g.key() == key)
    }

    /// All groups as generic [`SymbolGroup`]s, in result-table order.
    pub fn all_groups() -> Vec<SymbolGroup> {
        Self::ALL.iter().map(|&g| g.into()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amino_acid_alphabet() {
        let alphabet = Alphabet::amino_acids();
        assert_eq!(alphabet.len(), 20);
        assert_eq!(alphabet.index_of(b'A'), Some(0));
        assert_eq!(alphabet.index_of(b'Y'), Some(19));
        assert_eq!(alphabet.index_of(b'X'), None);
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        assert!(Alphabet::new("ACGA").is_err());
        assert!(Alphabet::new("").is_err());
    }

    #[test]
    fn test_require_unknown_symbol() {
        let alphabet = Alphabet::new("ACGT").unwrap();
        match alphabet.require('N') {
            Err(ProfilerError::InvalidSymbol(ch)) => assert_eq!(ch, 'N'),
            other => panic!("expected InvalidSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_group_members_resolve() {
        let alphabet = Alphabet::amino_acids();
        for group in AminoAcidGroup::all_groups() {
            let cols = group.column_indices(&alphabet).unwrap();
            assert_eq!(cols.len(), group.members.len(), "group {}", group.key);
        }
    }

    #[test]
    fn test_group_lookup() {
        assert_eq!(
            AminoAcidGroup::from_key("aromatic"),
            Some(AminoAcidGroup::Aromatic)
        );
        assert_eq!(AminoAcidGroup::from_key("nonexistent"), None);
        assert_eq!(AminoAcidGroup::ALL.len(), 20);
    }

    #[test]
    fn test_alphabet_serde() {
        let alphabet = Alphabet::new("ACGT").unwrap();
        let json = serde_json::to_string(&alphabet).unwrap();
        assert_eq!(json, "\"ACGT\"");
        let back: Alphabet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.index_of(b'T'), Some(3));
    }
}
