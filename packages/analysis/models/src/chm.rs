//! Canopy height model (CHM) prediction results.

use serde::{Deserialize, Serialize};

/// Canopy height statistics in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HeightStats {
    #[serde(default)]
    pub avg: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
    #[serde(default)]
    pub std: f64,
}

/// Land-cover areas in hectares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LandCoverBreakdown {
    #[serde(default)]
    pub trees: f64,
    #[serde(default)]
    pub mangroves: f64,
    #[serde(default)]
    pub urban: f64,
    #[serde(default)]
    pub water: f64,
    #[serde(default)]
    pub other: f64,
}

/// Share of the area eligible for carbon crediting (trees and mangroves).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChmEligibility {
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub eligible_ha: f64,
    #[serde(default)]
    pub ineligible_ha: f64,
    #[serde(default)]
    pub breakdown: LandCoverBreakdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeCount {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub per_hectare: u64,
}

/// Response of `POST {chm}/chm/predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChmResult {
    #[serde(default)]
    pub status: Option<String>,
    pub year: i32,
    #[serde(default)]
    pub total_area_ha: f64,
    #[serde(default)]
    pub model_prediction: HeightStats,
    #[serde(default)]
    pub eligibility: ChmEligibility,
    #[serde(default)]
    pub tree_count: TreeCount,
}
