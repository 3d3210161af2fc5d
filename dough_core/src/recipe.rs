//! # Recipe Data Structures
//!
//! [`DoughConfig`] is the whole recipe: named scalar percentages for water,
//! salt, oil, sugar and yeast, the leavening and preferment choice, a sizing
//! mode, and an [`IngredientSet`] holding the flour blend plus any extras.
//!
//! ## Structure
//!
//! ```text
//! DoughConfig
//! ├── hydration / salt / oil / sugar / yeast_percentage   (% of total flour)
//! ├── yeast_type, fermentation_technique, preferment_*
//! ├── sizing: ByMass { num_pizzas, dough_ball_weight_g } | ByFlour { total_flour_g }
//! ├── flour_id: main flour (absorbs the blend remainder)
//! └── ingredients: IngredientSet (id -> IngredientConfig, plus display order)
//! ```
//!
//! Every flour edit made through `DoughConfig` re-runs the blend balancer, so
//! the flour percentages always sum to 100.
//!
//! ## Example
//!
//! ```rust
//! use dough_core::recipe::DoughConfig;
//!
//! let mut config = DoughConfig::new("tipo_00_pizzeria");
//! config.add_catalog_flour("whole_wheat", 20.0).unwrap();
//!
//! let main = config.ingredients.get("tipo_00_pizzeria").unwrap();
//! assert_eq!(main.baker_percentage, 80.0);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::calculations::blend::balance;
use crate::catalog::{self, flour_or_generic};
use crate::errors::{FormulaError, FormulaResult};
use crate::units::{to_mass, to_unit, ConversionContext, Unit};

/// Ids of the named scalar ingredients held directly on [`DoughConfig`]
pub const SCALAR_INGREDIENT_IDS: [&str; 5] = ["water", "salt", "oil", "sugar", "yeast"];

/// Physical state of an ingredient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientType {
    #[default]
    Solid,
    Liquid,
}

/// Whether an ingredient line belongs to the flour blend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientRole {
    Flour,
    #[default]
    Other,
}

/// One line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientConfig {
    /// Stable id; for flours this is the catalog flour id
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: IngredientType,
    pub role: IngredientRole,
    /// Percentage of total flour mass
    pub baker_percentage: f64,
    /// Set whenever a person edits this value directly
    #[serde(default)]
    pub manual_override: bool,
    /// Unit last used to show or edit this ingredient
    #[serde(default)]
    pub selected_unit: Unit,
}

impl IngredientConfig {
    /// A flour line
    pub fn flour(id: impl Into<String>, name: impl Into<String>, baker_percentage: f64) -> Self {
        IngredientConfig {
            id: id.into(),
            name: name.into(),
            kind: IngredientType::Solid,
            role: IngredientRole::Flour,
            baker_percentage,
            manual_override: false,
            selected_unit: Unit::Percent,
        }
    }

    /// A free-form extra ingredient line
    pub fn extra(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: IngredientType,
        baker_percentage: f64,
    ) -> Self {
        IngredientConfig {
            id: id.into(),
            name: name.into(),
            kind,
            role: IngredientRole::Other,
            baker_percentage,
            manual_override: false,
            selected_unit: Unit::Percent,
        }
    }

    /// A flour line named after the catalog entry (or the id, if unknown)
    pub fn from_catalog_flour(id: &str, baker_percentage: f64) -> Self {
        let name = match catalog::find_flour(id) {
            Some(def) => def.name.to_string(),
            None => id.to_string(),
        };
        IngredientConfig::flour(id, name, baker_percentage)
    }

    /// An extra line from the additive library at its default percentage
    pub fn from_catalog_additive(id: &str) -> FormulaResult<Self> {
        let def = catalog::find_additive(id).ok_or_else(|| FormulaError::ingredient_not_found(id))?;
        Ok(IngredientConfig::extra(def.id, def.name, def.kind, def.default_percentage))
    }

    pub fn is_flour(&self) -> bool {
        self.role == IngredientRole::Flour
    }
}

// ============================================================================
// Ingredient Set
// ============================================================================

/// Ingredient lines keyed by id, with a separate display order.
///
/// Serializes as an ordered JSON array. Duplicate ids are rejected both on
/// insert and when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<IngredientConfig>", into = "Vec<IngredientConfig>")]
pub struct IngredientSet {
    entries: HashMap<String, IngredientConfig>,
    order: Vec<String>,
}

impl IngredientSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an ingredient. Fails if the id is already present.
    pub fn insert(&mut self, ingredient: IngredientConfig) -> FormulaResult<()> {
        if self.entries.contains_key(&ingredient.id) {
            return Err(FormulaError::duplicate_ingredient(&ingredient.id));
        }
        self.order.push(ingredient.id.clone());
        self.entries.insert(ingredient.id.clone(), ingredient);
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Option<IngredientConfig> {
        let removed = self.entries.remove(id);
        if removed.is_some() {
            self.order.retain(|existing| existing != id);
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&IngredientConfig> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut IngredientConfig> {
        self.entries.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ingredient ids in display order
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// All ingredients in display order
    pub fn iter(&self) -> impl Iterator<Item = &IngredientConfig> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Flour-role ingredients in display order
    pub fn flours(&self) -> impl Iterator<Item = &IngredientConfig> {
        self.iter().filter(|i| i.is_flour())
    }

    /// Non-flour ingredients in display order
    pub fn extras(&self) -> impl Iterator<Item = &IngredientConfig> {
        self.iter().filter(|i| !i.is_flour())
    }

    pub fn flour_percentage_sum(&self) -> f64 {
        self.flours().map(|i| i.baker_percentage).sum()
    }

    pub fn extra_percentage_sum(&self) -> f64 {
        self.extras().map(|i| i.baker_percentage).sum()
    }
}

impl TryFrom<Vec<IngredientConfig>> for IngredientSet {
    type Error = FormulaError;

    fn try_from(ingredients: Vec<IngredientConfig>) -> Result<Self, Self::Error> {
        let mut set = IngredientSet::new();
        for ingredient in ingredients {
            set.insert(ingredient)?;
        }
        Ok(set)
    }
}

impl From<IngredientSet> for Vec<IngredientConfig> {
    fn from(mut set: IngredientSet) -> Self {
        set.order
            .iter()
            .filter_map(|id| set.entries.remove(id))
            .collect()
    }
}

// ============================================================================
// Leavening and Sizing
// ============================================================================

/// Leavening agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YeastType {
    Fresh,
    ActiveDry,
    #[default]
    Instant,
    /// Generic sourdough starter
    SourdoughStarter,
    /// The user's own levain
    UserLevain,
}

impl YeastType {
    /// Sourdough variants are their own preferment
    pub fn is_sourdough(&self) -> bool {
        matches!(self, YeastType::SourdoughStarter | YeastType::UserLevain)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            YeastType::Fresh => "Fresh yeast",
            YeastType::ActiveDry => "Active dry yeast",
            YeastType::Instant => "Instant dry yeast",
            YeastType::SourdoughStarter => "Sourdough starter",
            YeastType::UserLevain => "Levain",
        }
    }
}

/// Dough-making method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FermentationTechnique {
    #[default]
    Direct,
    Poolish,
    Biga,
}

impl FermentationTechnique {
    pub fn is_preferment(&self) -> bool {
        !matches!(self, FermentationTechnique::Direct)
    }

    /// Customary preferment hydration in baker's percent
    pub fn conventional_hydration(&self) -> Option<f64> {
        match self {
            FermentationTechnique::Direct => None,
            FermentationTechnique::Poolish => Some(100.0),
            FermentationTechnique::Biga => Some(55.0),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FermentationTechnique::Direct => "Direct",
            FermentationTechnique::Poolish => "Poolish",
            FermentationTechnique::Biga => "Biga",
        }
    }
}

impl std::fmt::Display for FermentationTechnique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How the batch size is specified
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Sizing {
    /// Number of dough balls times ball weight gives total dough mass
    ByMass { num_pizzas: u32, dough_ball_weight_g: f64 },
    /// Total flour mass given directly
    ByFlour { total_flour_g: f64 },
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::ByMass {
            num_pizzas: 4,
            dough_ball_weight_g: 250.0,
        }
    }
}

impl Sizing {
    /// Target total dough mass, when sizing by mass
    pub fn target_dough_g(&self) -> Option<f64> {
        match self {
            Sizing::ByMass {
                num_pizzas,
                dough_ball_weight_g,
            } => Some(f64::from(*num_pizzas) * dough_ball_weight_g),
            Sizing::ByFlour { .. } => None,
        }
    }
}

// ============================================================================
// Dough Config
// ============================================================================

/// A complete recipe configuration.
///
/// ## JSON Example
///
/// ```json
/// {
///   "hydration": 65.0,
///   "salt": 3.0,
///   "oil": 0.0,
///   "sugar": 0.0,
///   "yeast_type": "instant",
///   "yeast_percentage": 0.2,
///   "fermentation_technique": "poolish",
///   "preferment_flour_percentage": 30.0,
///   "sizing": { "mode": "by_mass", "num_pizzas": 4, "dough_ball_weight_g": 250.0 },
///   "flour_id": "tipo_00_pizzeria",
///   "ingredients": [
///     { "id": "tipo_00_pizzeria", "name": "Tipo 00 Pizzeria", "type": "solid",
///       "role": "flour", "baker_percentage": 100.0 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoughConfig {
    /// Water, % of total flour
    pub hydration: f64,
    pub salt: f64,
    pub oil: f64,
    pub sugar: f64,
    pub yeast_type: YeastType,
    pub yeast_percentage: f64,
    pub fermentation_technique: FermentationTechnique,
    /// Share of **total flour** placed in the preferment
    #[serde(default)]
    pub preferment_flour_percentage: f64,
    /// Overrides the technique's customary preferment hydration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferment_hydration: Option<f64>,
    pub sizing: Sizing,
    /// Main flour id; absorbs whatever the secondary flours leave
    pub flour_id: String,
    pub ingredients: IngredientSet,
}

impl Default for DoughConfig {
    fn default() -> Self {
        DoughConfig::new("tipo_00_pizzeria")
    }
}

impl DoughConfig {
    /// New recipe with a single main flour at 100%.
    pub fn new(main_flour_id: &str) -> Self {
        let mut ingredients = IngredientSet::new();
        // A fresh set cannot hold a duplicate
        let _ = ingredients.insert(IngredientConfig::from_catalog_flour(main_flour_id, 100.0));
        DoughConfig {
            hydration: 65.0,
            salt: 2.5,
            oil: 0.0,
            sugar: 0.0,
            yeast_type: YeastType::default(),
            yeast_percentage: 0.2,
            fermentation_technique: FermentationTechnique::Direct,
            preferment_flour_percentage: 0.0,
            preferment_hydration: None,
            sizing: Sizing::default(),
            flour_id: main_flour_id.to_string(),
            ingredients,
        }
    }

    /// Technique actually used: sourdough is always treated as direct.
    pub fn effective_technique(&self) -> FermentationTechnique {
        if self.yeast_type.is_sourdough() {
            FermentationTechnique::Direct
        } else {
            self.fermentation_technique
        }
    }

    /// Hydration used for the preferment, if one applies
    pub fn effective_preferment_hydration(&self) -> Option<f64> {
        let technique = self.effective_technique();
        if !technique.is_preferment() {
            return None;
        }
        self.preferment_hydration
            .or_else(|| technique.conventional_hydration())
    }

    /// Sum of every non-flour percentage: water, salt, oil, sugar, yeast, extras
    pub fn non_flour_percentage_sum(&self) -> f64 {
        self.hydration
            + self.salt
            + self.oil
            + self.sugar
            + self.yeast_percentage
            + self.ingredients.extra_percentage_sum()
    }

    /// Baker's percentage of a named scalar ingredient
    pub fn scalar_percentage(&self, id: &str) -> Option<f64> {
        match id {
            "water" => Some(self.hydration),
            "salt" => Some(self.salt),
            "oil" => Some(self.oil),
            "sugar" => Some(self.sugar),
            "yeast" => Some(self.yeast_percentage),
            _ => None,
        }
    }

    fn scalar_percentage_mut(&mut self, id: &str) -> Option<&mut f64> {
        match id {
            "water" => Some(&mut self.hydration),
            "salt" => Some(&mut self.salt),
            "oil" => Some(&mut self.oil),
            "sugar" => Some(&mut self.sugar),
            "yeast" => Some(&mut self.yeast_percentage),
            _ => None,
        }
    }

    /// Validate the configuration before it reaches the engine.
    pub fn validate(&self) -> FormulaResult<()> {
        let scalars = [
            ("hydration", self.hydration),
            ("salt", self.salt),
            ("oil", self.oil),
            ("sugar", self.sugar),
            ("yeast_percentage", self.yeast_percentage),
        ];
        for (field, value) in scalars {
            check_percentage(field, value)?;
        }

        check_percentage("preferment_flour_percentage", self.preferment_flour_percentage)?;
        if self.preferment_flour_percentage > 100.0 {
            return Err(FormulaError::invalid_input(
                "preferment_flour_percentage",
                self.preferment_flour_percentage.to_string(),
                "Preferment cannot hold more than all of the flour",
            ));
        }
        if let Some(h) = self.preferment_hydration {
            check_percentage("preferment_hydration", h)?;
        }

        match self.sizing {
            Sizing::ByMass {
                num_pizzas,
                dough_ball_weight_g,
            } => {
                if num_pizzas == 0 {
                    return Err(FormulaError::invalid_input(
                        "num_pizzas",
                        "0",
                        "At least one dough ball is required",
                    ));
                }
                check_positive("dough_ball_weight_g", dough_ball_weight_g)?;
            }
            Sizing::ByFlour { total_flour_g } => check_positive("total_flour_g", total_flour_g)?,
        }

        if self.flour_id.trim().is_empty() {
            return Err(FormulaError::missing_field("flour_id"));
        }
        match self.ingredients.get(&self.flour_id) {
            None => return Err(FormulaError::ingredient_not_found(&self.flour_id)),
            Some(main) if !main.is_flour() => {
                return Err(FormulaError::invalid_input(
                    "flour_id",
                    &self.flour_id,
                    "Main flour must have the flour role",
                ));
            }
            Some(_) => {}
        }

        for ingredient in self.ingredients.iter() {
            check_percentage(&format!("ingredients.{}", ingredient.id), ingredient.baker_percentage)?;
        }

        Ok(())
    }

    // === Flour blend edits (rebalanced after each) ===

    /// Add a secondary flour and rebalance.
    pub fn add_flour(&mut self, mut flour: IngredientConfig) -> FormulaResult<()> {
        check_percentage(&flour.id, flour.baker_percentage)?;
        flour.role = IngredientRole::Flour;
        self.ingredients.insert(flour)?;
        self.rebalance();
        Ok(())
    }

    /// Add a catalog flour by id at the given percentage.
    pub fn add_catalog_flour(&mut self, flour_id: &str, baker_percentage: f64) -> FormulaResult<()> {
        self.add_flour(IngredientConfig::from_catalog_flour(flour_id, baker_percentage))
    }

    /// Remove a secondary flour; the main flour absorbs its share.
    pub fn remove_flour(&mut self, flour_id: &str) -> FormulaResult<IngredientConfig> {
        if flour_id == self.flour_id {
            return Err(FormulaError::main_flour_required(flour_id));
        }
        match self.ingredients.get(flour_id) {
            Some(i) if i.is_flour() => {}
            _ => return Err(FormulaError::ingredient_not_found(flour_id)),
        }
        let removed = self
            .ingredients
            .remove(flour_id)
            .ok_or_else(|| FormulaError::ingredient_not_found(flour_id))?;
        self.rebalance();
        Ok(removed)
    }

    /// Set a secondary flour's percentage and rebalance.
    ///
    /// The main flour's percentage is always derived, so editing it directly
    /// is rejected.
    pub fn set_flour_percentage(&mut self, flour_id: &str, baker_percentage: f64) -> FormulaResult<()> {
        check_percentage(flour_id, baker_percentage)?;
        if flour_id == self.flour_id {
            return Err(FormulaError::invalid_input(
                flour_id,
                baker_percentage.to_string(),
                "Main flour percentage is derived from the secondary flours",
            ));
        }
        let flour = self
            .ingredients
            .get_mut(flour_id)
            .filter(|i| i.is_flour())
            .ok_or_else(|| FormulaError::ingredient_not_found(flour_id))?;
        flour.baker_percentage = baker_percentage;
        flour.manual_override = true;
        self.rebalance();
        Ok(())
    }

    /// Make another flour already in the blend the main flour.
    pub fn set_main_flour(&mut self, flour_id: &str) -> FormulaResult<()> {
        match self.ingredients.get(flour_id) {
            Some(i) if i.is_flour() => {}
            _ => return Err(FormulaError::ingredient_not_found(flour_id)),
        }
        self.flour_id = flour_id.to_string();
        self.rebalance();
        Ok(())
    }

    fn rebalance(&mut self) {
        self.ingredients = balance(&self.ingredients, &self.flour_id);
    }

    // === Extra ingredient edits (never rebalanced) ===

    pub fn add_extra(&mut self, mut extra: IngredientConfig) -> FormulaResult<()> {
        check_percentage(&extra.id, extra.baker_percentage)?;
        if SCALAR_INGREDIENT_IDS.contains(&extra.id.as_str()) {
            return Err(FormulaError::invalid_input(
                "id",
                &extra.id,
                "Named scalar ingredients are set on the recipe directly",
            ));
        }
        extra.role = IngredientRole::Other;
        self.ingredients.insert(extra)
    }

    pub fn remove_extra(&mut self, id: &str) -> FormulaResult<IngredientConfig> {
        match self.ingredients.get(id) {
            Some(i) if !i.is_flour() => {}
            _ => return Err(FormulaError::ingredient_not_found(id)),
        }
        self.ingredients
            .remove(id)
            .ok_or_else(|| FormulaError::ingredient_not_found(id))
    }

    pub fn set_extra_percentage(&mut self, id: &str, baker_percentage: f64) -> FormulaResult<()> {
        check_percentage(id, baker_percentage)?;
        let extra = self
            .ingredients
            .get_mut(id)
            .filter(|i| !i.is_flour())
            .ok_or_else(|| FormulaError::ingredient_not_found(id))?;
        extra.baker_percentage = baker_percentage;
        extra.manual_override = true;
        Ok(())
    }

    /// Apply an edit made in any display unit.
    ///
    /// Non-percent units are converted to a baker's percentage through the
    /// conversion service, which needs `ctx.total_flour_g`. Works for named
    /// scalar ingredients, extras and secondary flours.
    pub fn edit_amount(&mut self, id: &str, amount: f64, unit: Unit, ctx: &ConversionContext) -> FormulaResult<()> {
        check_percentage(id, amount)?;
        let percentage = if unit == Unit::Percent {
            amount
        } else {
            if !ctx.total_flour_g.is_some_and(|t| t.is_finite() && t > 0.0) {
                return Err(FormulaError::missing_field("total_flour_g"));
            }
            let grams = to_mass(amount, unit, id, ctx);
            to_unit(grams, Unit::Percent, id, ctx)
        };

        if let Some(slot) = self.scalar_percentage_mut(id) {
            *slot = percentage;
            return Ok(());
        }

        let is_flour = self
            .ingredients
            .get(id)
            .map(|i| i.is_flour())
            .ok_or_else(|| FormulaError::ingredient_not_found(id))?;
        if is_flour {
            self.set_flour_percentage(id, percentage)?;
        } else {
            self.set_extra_percentage(id, percentage)?;
        }
        if let Some(ingredient) = self.ingredients.get_mut(id) {
            ingredient.selected_unit = unit;
        }
        Ok(())
    }

    /// Name of the main flour from the catalog, or the id when unknown.
    pub fn main_flour_name(&self) -> &str {
        match self.ingredients.get(&self.flour_id) {
            Some(i) => &i.name,
            None => flour_or_generic(&self.flour_id).name,
        }
    }
}

fn check_percentage(field: &str, value: f64) -> FormulaResult<()> {
    if !value.is_finite() {
        return Err(FormulaError::invalid_input(field, value.to_string(), "Value must be a finite number"));
    }
    if value < 0.0 {
        return Err(FormulaError::invalid_input(field, value.to_string(), "Value cannot be negative"));
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> FormulaResult<()> {
    check_percentage(field, value)?;
    if value == 0.0 {
        return Err(FormulaError::invalid_input(field, "0", "Value must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flour_sum(config: &DoughConfig) -> f64 {
        config.ingredients.flour_percentage_sum()
    }

    #[test]
    fn test_new_config_is_valid() {
        let config = DoughConfig::new("tipo_00_pizzeria");
        assert!(config.validate().is_ok());
        assert_eq!(config.main_flour_name(), "Tipo 00 Pizzeria");
        assert_eq!(flour_sum(&config), 100.0);
    }

    #[test]
    fn test_unknown_main_flour_keeps_id_as_name() {
        let config = DoughConfig::new("nonna_blend");
        assert_eq!(config.main_flour_name(), "nonna_blend");
    }

    #[test]
    fn test_set_preserves_order() {
        let mut set = IngredientSet::new();
        set.insert(IngredientConfig::flour("b", "B", 50.0)).unwrap();
        set.insert(IngredientConfig::flour("a", "A", 50.0)).unwrap();
        set.insert(IngredientConfig::extra("honey", "Honey", IngredientType::Liquid, 2.0))
            .unwrap();
        let ids: Vec<_> = set.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "honey"]);

        set.remove("b");
        assert_eq!(set.ids(), ["a", "honey"]);
    }

    #[test]
    fn test_set_rejects_duplicates() {
        let mut set = IngredientSet::new();
        set.insert(IngredientConfig::flour("a", "A", 100.0)).unwrap();
        let err = set.insert(IngredientConfig::flour("a", "A again", 10.0)).unwrap_err();
        assert_eq!(err.error_code(), "DUPLICATE_INGREDIENT");
    }

    #[test]
    fn test_set_serializes_as_ordered_array() {
        let mut set = IngredientSet::new();
        set.insert(IngredientConfig::flour("z", "Z", 100.0)).unwrap();
        set.insert(IngredientConfig::extra("milk", "Milk", IngredientType::Liquid, 5.0))
            .unwrap();
        let json = serde_json::to_string(&set).unwrap();
        assert!(json.starts_with('['));
        assert!(json.find("\"z\"").unwrap() < json.find("\"milk\"").unwrap());

        let roundtrip: IngredientSet = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, set);
    }

    #[test]
    fn test_duplicate_ids_fail_to_deserialize() {
        let json = r#"[
            {"id":"a","name":"A","type":"solid","role":"flour","baker_percentage":50.0},
            {"id":"a","name":"A","type":"solid","role":"flour","baker_percentage":50.0}
        ]"#;
        assert!(serde_json::from_str::<IngredientSet>(json).is_err());
    }

    #[test]
    fn test_add_and_remove_secondary_flour() {
        let mut config = DoughConfig::new("tipo_00_pizzeria");
        config.add_catalog_flour("whole_wheat", 20.0).unwrap();
        assert_eq!(config.ingredients.get("tipo_00_pizzeria").unwrap().baker_percentage, 80.0);

        config.remove_flour("whole_wheat").unwrap();
        assert_eq!(config.ingredients.get("tipo_00_pizzeria").unwrap().baker_percentage, 100.0);
    }

    #[test]
    fn test_main_flour_cannot_be_removed() {
        let mut config = DoughConfig::new("tipo_00_pizzeria");
        let err = config.remove_flour("tipo_00_pizzeria").unwrap_err();
        assert_eq!(err, FormulaError::main_flour_required("tipo_00_pizzeria"));
    }

    #[test]
    fn test_main_flour_percentage_is_derived() {
        let mut config = DoughConfig::new("tipo_00_pizzeria");
        assert!(config.set_flour_percentage("tipo_00_pizzeria", 50.0).is_err());
    }

    #[test]
    fn test_set_flour_percentage_marks_override() {
        let mut config = DoughConfig::new("bread_flour");
        config.add_catalog_flour("whole_rye", 10.0).unwrap();
        config.set_flour_percentage("whole_rye", 30.0).unwrap();

        let rye = config.ingredients.get("whole_rye").unwrap();
        assert!(rye.manual_override);
        assert_eq!(config.ingredients.get("bread_flour").unwrap().baker_percentage, 70.0);
    }

    #[test]
    fn test_set_main_flour_swaps_remainder() {
        let mut config = DoughConfig::new("bread_flour");
        config.add_catalog_flour("spelt", 30.0).unwrap();
        config.set_main_flour("spelt").unwrap();

        // bread flour is now secondary at 70, spelt takes the remaining 30
        assert_eq!(config.flour_id, "spelt");
        assert_eq!(config.ingredients.get("spelt").unwrap().baker_percentage, 30.0);
        assert!((flour_sum(&config) - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_extras_do_not_touch_flours() {
        let mut config = DoughConfig::new("tipo_00");
        config
            .add_extra(IngredientConfig::from_catalog_additive("honey").unwrap())
            .unwrap();
        config.set_extra_percentage("honey", 4.0).unwrap();
        assert_eq!(flour_sum(&config), 100.0);
        assert_eq!(config.ingredients.extra_percentage_sum(), 4.0);

        config.remove_extra("honey").unwrap();
        assert!(config.ingredients.get("honey").is_none());
    }

    #[test]
    fn test_scalar_ids_rejected_as_extras() {
        let mut config = DoughConfig::default();
        let water = IngredientConfig::extra("water", "Water", IngredientType::Liquid, 10.0);
        assert!(config.add_extra(water).is_err());
    }

    #[test]
    fn test_sourdough_forces_direct() {
        let mut config = DoughConfig::default();
        config.fermentation_technique = FermentationTechnique::Poolish;
        assert_eq!(config.effective_technique(), FermentationTechnique::Poolish);
        assert_eq!(config.effective_preferment_hydration(), Some(100.0));

        config.yeast_type = YeastType::UserLevain;
        assert_eq!(config.effective_technique(), FermentationTechnique::Direct);
        assert_eq!(config.effective_preferment_hydration(), None);
    }

    #[test]
    fn test_direct_dough_ignores_preferment_hydration() {
        let mut config = DoughConfig::default();
        config.preferment_hydration = Some(70.0);
        assert!(!config.effective_technique().is_preferment());
        assert_eq!(config.effective_preferment_hydration(), None);

        config.fermentation_technique = FermentationTechnique::Biga;
        assert_eq!(config.effective_preferment_hydration(), Some(70.0));
    }

    #[test]
    fn test_validate_rejects_negative_and_nan() {
        let mut config = DoughConfig::default();
        config.salt = -1.0;
        assert!(config.validate().is_err());

        let mut config = DoughConfig::default();
        config.hydration = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_main_flour() {
        let mut config = DoughConfig::default();
        config.flour_id = "manitoba".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.error_code(), "INGREDIENT_NOT_FOUND");

        config.flour_id = String::new();
        assert_eq!(config.validate().unwrap_err().error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_validate_rejects_zero_sizing() {
        let mut config = DoughConfig::default();
        config.sizing = Sizing::ByMass {
            num_pizzas: 0,
            dough_ball_weight_g: 250.0,
        };
        assert!(config.validate().is_err());

        config.sizing = Sizing::ByFlour { total_flour_g: 0.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_preferment_over_100() {
        let mut config = DoughConfig::default();
        config.preferment_flour_percentage = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_edit_amount_in_grams() {
        let mut config = DoughConfig::new("tipo_00");
        let ctx = ConversionContext::default().with_total_flour(500.0);

        config.edit_amount("water", 350.0, Unit::Grams, &ctx).unwrap();
        assert!((config.hydration - 70.0).abs() < 1e-9);

        config.add_catalog_flour("whole_wheat", 0.0).unwrap();
        config.edit_amount("whole_wheat", 100.0, Unit::Grams, &ctx).unwrap();
        let ww = config.ingredients.get("whole_wheat").unwrap();
        assert!((ww.baker_percentage - 20.0).abs() < 1e-9);
        assert_eq!(ww.selected_unit, Unit::Grams);
        assert!((config.ingredients.get("tipo_00").unwrap().baker_percentage - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_edit_amount_needs_flour_total_for_mass_units() {
        let mut config = DoughConfig::default();
        let ctx = ConversionContext::default();
        assert!(config.edit_amount("salt", 10.0, Unit::Grams, &ctx).is_err());
        assert!(config.edit_amount("salt", 2.8, Unit::Percent, &ctx).is_ok());
        assert_eq!(config.salt, 2.8);
    }

    #[test]
    fn test_edit_amount_rejects_negative() {
        let mut config = DoughConfig::default();
        let ctx = ConversionContext::default().with_total_flour(500.0);
        assert!(config.edit_amount("water", -5.0, Unit::Grams, &ctx).is_err());
        assert_eq!(config.hydration, 65.0);
    }

    #[test]
    fn test_non_flour_sum() {
        let mut config = DoughConfig::default();
        config.hydration = 65.0;
        config.salt = 3.0;
        config.yeast_percentage = 0.2;
        config
            .add_extra(IngredientConfig::extra("milk", "Milk", IngredientType::Liquid, 5.0))
            .unwrap();
        assert!((config.non_flour_percentage_sum() - 73.2).abs() < 1e-9);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let mut config = DoughConfig::default();
        config.fermentation_technique = FermentationTechnique::Biga;
        config.preferment_flour_percentage = 40.0;
        config.add_catalog_flour("manitoba", 25.0).unwrap();

        let json = serde_json::to_string_pretty(&config).unwrap();
        assert!(json.contains("\"mode\": \"by_mass\""));
        assert!(json.contains("\"fermentation_technique\": \"biga\""));
        let roundtrip: DoughConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, config);
    }
}
