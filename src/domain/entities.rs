//! Domain entities: game documents and their level records

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::domain::color::CssColor;
use crate::domain::error::DomainError;

/// One game's level experience document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    /// Display name, also the catalog sort key
    pub game_name: String,
    /// Title artwork shown next to the game in selectors and references
    #[serde(default)]
    pub title_image_uri: String,
    /// Sources for the experience values
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub line_chart_configurations: LineChartConfigurations,
    #[serde(default)]
    pub sunburst_chart_configurations: SunburstChartConfigurations,
    /// Per-level records, one per level
    #[serde(default)]
    pub data: Vec<LevelRecord>,
}

impl GameData {
    /// Check the document before it enters the catalog.
    ///
    /// Rejects an empty game name, inverted sunburst ranges and colors that
    /// cannot be handed to a renderer. Containment between tiers is NOT
    /// checked here: an unmatched part degrades to an orphan at build time.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.game_name.trim().is_empty() {
            return Err(DomainError::EmptyGameName);
        }

        for (tier, level) in self.sunburst_chart_configurations.levels.iter().enumerate() {
            if let Some(part) = level.parts.iter().find(|p| p.start > p.end) {
                return Err(DomainError::InvertedRange {
                    game: self.game_name.clone(),
                    tier,
                    start: part.start,
                    end: part.end,
                });
            }
        }

        let line = &self.line_chart_configurations;
        CssColor::parse("lineColor", &line.line_color)?;
        CssColor::parse("backgroundColor", &line.background_color)?;
        CssColor::parse(
            "secondaryBackgroundColor",
            &line.secondary_background_color,
        )?;
        CssColor::parse("sunburst color", &self.sunburst_chart_configurations.color)?;

        Ok(())
    }
}

/// Line chart styling supplied by the game document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineChartConfigurations {
    pub line_color: String,
    /// Top of the vertical background gradient
    pub background_color: String,
    /// Bottom of the vertical background gradient
    pub secondary_background_color: String,
}

impl Default for LineChartConfigurations {
    fn default() -> Self {
        Self {
            line_color: "#41739D".into(),
            background_color: "#DCDCDC".into(),
            secondary_background_color: "#FFFFFF".into(),
        }
    }
}

/// Sunburst styling and the nested level-range partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunburstChartConfigurations {
    /// Color of the innermost ring
    pub color: String,
    /// Tiers from coarsest (0) to finest (last)
    pub levels: Vec<RangeTier>,
}

impl Default for SunburstChartConfigurations {
    fn default() -> Self {
        Self {
            color: "#41739D".into(),
            levels: Vec::new(),
        }
    }
}

/// One nesting tier of the level-range partition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeTier {
    #[serde(default)]
    pub parts: Vec<RangePart>,
}

impl RangeTier {
    pub fn new(parts: Vec<RangePart>) -> Self {
        Self { parts }
    }
}

/// Inclusive level range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangePart {
    pub start: i64,
    pub end: i64,
}

impl RangePart {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Section id, e.g. `"1-10"`.
    pub fn id(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }

    /// Section label with the number of levels covered, e.g. `"1-10 [10]"`.
    pub fn label(&self) -> String {
        format!("{}-{} [{}]", self.start, self.end, self.end - self.start + 1)
    }

    pub fn contains(&self, start: i64, end: i64) -> bool {
        start >= self.start && end <= self.end
    }
}

/// Experience figures for a single level.
///
/// `None` marks an unknown value (absent, null, NaN or otherwise non-numeric
/// in the source document). It is never coerced to zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRecord {
    pub level: i64,
    #[serde(default, deserialize_with = "deserialize_measure")]
    pub cumulative_experience: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_measure")]
    pub experience_to_next_level: Option<f64>,
}

impl LevelRecord {
    pub fn new(
        level: i64,
        cumulative_experience: Option<f64>,
        experience_to_next_level: Option<f64>,
    ) -> Self {
        Self {
            level,
            cumulative_experience: cumulative_experience.filter(|v| v.is_finite()),
            experience_to_next_level: experience_to_next_level.filter(|v| v.is_finite()),
        }
    }
}

/// Interpret a JSON value as a finite number.
///
/// Numbers and numeric strings (`"1200"`) qualify; everything else,
/// including infinities, is unknown.
pub fn as_measure(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|v| v.is_finite())
}

fn deserialize_measure<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(as_measure))
}
