use serde::{Deserialize, Serialize};

/// Macro nutrients tracked through the whole fertigation flow, expressed
/// in kg/ha. N, P and K use the oxide convention of the reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Nutrient {
    N,
    P2O5,
    K2O,
    Ca,
    Mg,
    S,
}

impl Nutrient {
    pub const ALL: [Nutrient; 6] = [
        Nutrient::N,
        Nutrient::P2O5,
        Nutrient::K2O,
        Nutrient::Ca,
        Nutrient::Mg,
        Nutrient::S,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::N => "N",
            Nutrient::P2O5 => "P2O5",
            Nutrient::K2O => "K2O",
            Nutrient::Ca => "Ca",
            Nutrient::Mg => "Mg",
            Nutrient::S => "S",
        }
    }

    pub fn from_str(s: &str) -> Option<Nutrient> {
        match s {
            "N" => Some(Nutrient::N),
            "P2O5" => Some(Nutrient::P2O5),
            "K2O" => Some(Nutrient::K2O),
            "Ca" => Some(Nutrient::Ca),
            "Mg" => Some(Nutrient::Mg),
            "S" => Some(Nutrient::S),
            _ => None,
        }
    }
}

impl std::fmt::Display for Nutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Micronutrients, expressed in g/ha. Their stage requirement is scaled by
/// the mean macro delta percent rather than a per-micro curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Micronutrient {
    Fe,
    Mn,
    Zn,
    Cu,
    B,
    Mo,
}

impl Micronutrient {
    pub const ALL: [Micronutrient; 6] = [
        Micronutrient::Fe,
        Micronutrient::Mn,
        Micronutrient::Zn,
        Micronutrient::Cu,
        Micronutrient::B,
        Micronutrient::Mo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Micronutrient::Fe => "Fe",
            Micronutrient::Mn => "Mn",
            Micronutrient::Zn => "Zn",
            Micronutrient::Cu => "Cu",
            Micronutrient::B => "B",
            Micronutrient::Mo => "Mo",
        }
    }
}

impl std::fmt::Display for Micronutrient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
