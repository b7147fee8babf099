use serde::{Deserialize, Serialize};

/// Land cover classes reported by the backend's biome analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    #[serde(rename = "zimzelena")]
    Evergreen,
    #[serde(rename = "listopadna")]
    Deciduous,
    #[serde(rename = "livade")]
    Grassland,
    #[serde(rename = "urbano")]
    Urban,
    #[serde(rename = "polja")]
    Fields,
    #[serde(rename = "vode")]
    Water,
    #[serde(rename = "nepoznato", other)]
    Unknown,
}

impl Biome {
    /// Biomes that carry a percentage, in the order the backend lists them.
    pub const MEASURED: [Biome; 6] = [
        Biome::Evergreen,
        Biome::Deciduous,
        Biome::Grassland,
        Biome::Urban,
        Biome::Fields,
        Biome::Water,
    ];
}

/// Share of significant biomes, in percent.
pub const SIGNIFICANT_PERCENTAGE: f64 = 5.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BiomeComposition {
    #[serde(default, rename = "zimzelenaPercentage")]
    pub evergreen: Option<f64>,
    #[serde(default, rename = "listopadnaPercentage")]
    pub deciduous: Option<f64>,
    #[serde(default, rename = "livadePercentage")]
    pub grassland: Option<f64>,
    #[serde(default, rename = "urbanoPercentage")]
    pub urban: Option<f64>,
    #[serde(default, rename = "poljaPercentage")]
    pub fields: Option<f64>,
    #[serde(default, rename = "vodePercentage")]
    pub water: Option<f64>,
    #[serde(default, rename = "dominantBiome")]
    pub dominant: Option<Biome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BiomeShare {
    #[serde(rename = "type")]
    pub biome: Biome,
    pub percentage: f64,
}

impl BiomeComposition {
    pub fn percentage(&self, biome: Biome) -> f64 {
        let value = match biome {
            Biome::Evergreen => self.evergreen,
            Biome::Deciduous => self.deciduous,
            Biome::Grassland => self.grassland,
            Biome::Urban => self.urban,
            Biome::Fields => self.fields,
            Biome::Water => self.water,
            Biome::Unknown => None,
        };
        value.unwrap_or(0.0)
    }

    /// Every biome present on the trail, largest share first.
    pub fn ranked(&self) -> Vec<BiomeShare> {
        self.shares_above(0.0)
    }

    /// Biomes covering more than 5% of the trail, largest share first.
    pub fn significant(&self) -> Vec<BiomeShare> {
        self.shares_above(SIGNIFICANT_PERCENTAGE)
    }

    fn shares_above(&self, threshold: f64) -> Vec<BiomeShare> {
        let mut shares: Vec<BiomeShare> = Biome::MEASURED
            .iter()
            .map(|&biome| BiomeShare {
                biome,
                percentage: self.percentage(biome),
            })
            .filter(|s| s.percentage > threshold)
            .collect();
        // Stable sort keeps backend order for ties.
        shares.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
        shares
    }
}
