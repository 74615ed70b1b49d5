// 🗂️ Class Taxonomy - which classes exist, their names, sections and fees
//
// Shipped with the standard schedule; a taxonomy.json in the show location
// replaces it wholesale.

use crate::entities::show::class_sort_key;
use crate::error::{Result, ShowError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Fee per entry in a paying class
pub const DEFAULT_ENTRY_COST: f64 = 0.5;

// ============================================================================
// DEFINITIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub class_id: String,
    pub name: String,
}

/// A named group of classes, used to scope section prizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Short id, e.g. "H"
    pub id: String,
    pub title: String,
    pub classes: Vec<ClassDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassTaxonomy {
    pub sections: Vec<Section>,

    /// Classes entered without a fee
    #[serde(default)]
    pub free_classes: Vec<String>,

    #[serde(default = "default_entry_cost")]
    pub entry_cost: f64,
}

fn default_entry_cost() -> f64 {
    DEFAULT_ENTRY_COST
}

impl ClassTaxonomy {
    pub fn new(sections: Vec<Section>, free_classes: Vec<String>, entry_cost: f64) -> Result<Self> {
        let taxonomy = ClassTaxonomy {
            sections,
            free_classes,
            entry_cost,
        };
        taxonomy.verify()?;
        Ok(taxonomy)
    }

    /// Load the override file if present, otherwise the built-in schedule
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::builtin());
        }

        let text = fs::read_to_string(path).map_err(|e| ShowError::io(path, e))?;
        let taxonomy: ClassTaxonomy = serde_json::from_str(&text).map_err(|source| {
            ShowError::Serialization {
                path: path.to_path_buf(),
                source,
            }
        })?;
        taxonomy.verify()?;

        tracing::info!(
            path = %path.display(),
            classes = taxonomy.class_ids().len(),
            "loaded class taxonomy"
        );
        Ok(taxonomy)
    }

    /// Class ids must be unique across sections; free classes must exist
    pub fn verify(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for definition in self.sections.iter().flat_map(|s| &s.classes) {
            if !seen.insert(definition.class_id.as_str()) {
                return Err(ShowError::Consistency(format!(
                    "class {} defined more than once",
                    definition.class_id
                )));
            }
        }
        if let Some(unknown) = self.free_classes.iter().find(|c| !seen.contains(c.as_str())) {
            return Err(ShowError::Consistency(format!(
                "free class {} is not in the schedule",
                unknown
            )));
        }
        if !self.entry_cost.is_finite() || self.entry_cost < 0.0 {
            return Err(ShowError::Consistency(format!(
                "entry cost must be non-negative, got {}",
                self.entry_cost
            )));
        }
        Ok(())
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    fn definitions(&self) -> impl Iterator<Item = (&Section, &ClassDefinition)> {
        self.sections
            .iter()
            .flat_map(|s| s.classes.iter().map(move |c| (s, c)))
    }

    pub fn is_valid(&self, class_id: &str) -> bool {
        self.definitions().any(|(_, c)| c.class_id == class_id)
    }

    pub fn class_name(&self, class_id: &str) -> Option<&str> {
        self.definitions()
            .find(|(_, c)| c.class_id == class_id)
            .map(|(_, c)| c.name.as_str())
    }

    /// Section id holding `class_id`
    pub fn section_of(&self, class_id: &str) -> Option<&str> {
        self.definitions()
            .find(|(_, c)| c.class_id == class_id)
            .map(|(s, _)| s.id.as_str())
    }

    pub fn section(&self, section_id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == section_id)
    }

    /// (class id, name) pairs of a section
    pub fn section_classes(&self, section_id: &str) -> Option<Vec<(&str, &str)>> {
        self.section(section_id).map(|s| {
            s.classes
                .iter()
                .map(|c| (c.class_id.as_str(), c.name.as_str()))
                .collect()
        })
    }

    /// Every known class id, in natural class order
    pub fn class_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.definitions().map(|(_, c)| c.class_id.as_str()).collect();
        ids.sort_by_key(|id| class_sort_key(id));
        ids
    }

    pub fn is_free(&self, class_id: &str) -> bool {
        self.free_classes.iter().any(|c| c == class_id)
    }

    pub fn entry_cost(&self) -> f64 {
        self.entry_cost
    }

    // ========================================================================
    // BUILT-IN SCHEDULE
    // ========================================================================

    pub fn builtin() -> Self {
        let section = |id: &str, title: &str, classes: &[(&str, &str)]| Section {
            id: id.to_string(),
            title: title.to_string(),
            classes: classes
                .iter()
                .map(|(class_id, name)| ClassDefinition {
                    class_id: class_id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        };

        let sections = vec![
            section(
                "A",
                "Vegetables",
                &[
                    ("1", "Three potatoes, white"),
                    ("2", "Three potatoes, coloured"),
                    ("3", "Five shallots"),
                    ("4", "Three onions"),
                    ("5", "Three carrots"),
                    ("6", "Five runner beans"),
                    ("7", "Five french beans"),
                    ("8", "Two courgettes"),
                    ("9", "Five tomatoes"),
                    ("10", "Any other vegetable"),
                ],
            ),
            section(
                "B",
                "Fruit",
                &[
                    ("11", "Three dessert apples"),
                    ("12", "Three cooking apples"),
                    ("13", "Plate of soft fruit"),
                    ("14", "Three plums"),
                    ("15", "Any other fruit"),
                ],
            ),
            section(
                "C",
                "Flowers",
                &[
                    ("16", "Three roses"),
                    ("17", "Vase of sweet peas"),
                    ("18", "Three dahlias"),
                    ("19", "Vase of garden flowers"),
                    ("20", "Pot plant, flowering"),
                    ("21", "Pot plant, foliage"),
                    ("22", "Cactus or succulent"),
                    ("23", "Single bloom"),
                    ("24", "Herbs, three varieties"),
                ],
            ),
            section(
                "D",
                "Floral Art",
                &[
                    ("25A", "Arrangement in a teacup"),
                    ("25B", "Table arrangement"),
                    ("25C", "Miniature arrangement"),
                    ("26", "Buttonhole"),
                ],
            ),
            section(
                "E",
                "Domestic",
                &[
                    ("27", "Victoria sandwich"),
                    ("28", "Fruit cake"),
                    ("29", "Six scones"),
                    ("30", "Loaf of bread"),
                    ("31", "Six biscuits"),
                    ("32", "Quiche"),
                    ("33", "Sausage rolls"),
                    ("34", "Gentleman's cake"),
                ],
            ),
            section(
                "F",
                "Preserves",
                &[
                    ("35", "Jar of jam"),
                    ("36", "Jar of marmalade"),
                    ("37", "Jar of chutney"),
                    ("38", "Jar of lemon curd"),
                    ("39", "Jar of jelly"),
                    ("40", "Bottle of cordial"),
                ],
            ),
            section(
                "G",
                "Handicrafts",
                &[
                    ("41", "Knitted item"),
                    ("42", "Crocheted item"),
                    ("43", "Embroidery"),
                    ("44", "Patchwork"),
                    ("45", "Woodwork"),
                    ("46", "Pottery"),
                    ("47", "Greetings card"),
                ],
            ),
            section(
                "H",
                "Photography",
                &[
                    ("48", "Landscape"),
                    ("49", "Portrait"),
                    ("50", "Garden wildlife"),
                    ("51", "Village life"),
                    ("52", "Black and white"),
                    ("53", "Close up"),
                ],
            ),
            section(
                "J",
                "Children",
                &[
                    ("54", "Decorated biscuit, under 8"),
                    ("55", "Vegetable animal, under 8"),
                    ("56", "Painting, under 12"),
                    ("57", "Miniature garden, under 12"),
                    ("58", "Lego model, under 12"),
                    ("59", "Photograph, under 16"),
                    ("60", "Cupcakes, under 16"),
                ],
            ),
            section(
                "K",
                "Open",
                &[
                    ("61", "Longest runner bean"),
                    ("62", "Heaviest marrow"),
                    ("63", "Tallest sunflower"),
                    ("64", "Oddest shaped vegetable"),
                    ("65", "Wonky vegetable"),
                ],
            ),
        ];

        let free_classes = ["54", "55", "56", "57", "58", "59", "60"]
            .iter()
            .map(|c| c.to_string())
            .collect();

        ClassTaxonomy {
            sections,
            free_classes,
            entry_cost: DEFAULT_ENTRY_COST,
        }
    }
}

impl Default for ClassTaxonomy {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_consistent() {
        let taxonomy = ClassTaxonomy::builtin();
        assert!(taxonomy.verify().is_ok());
        assert_eq!(taxonomy.class_ids().len(), 67);
        assert_eq!(taxonomy.class_ids()[0], "1");
        assert_eq!(taxonomy.class_ids().last(), Some(&"65"));
    }

    #[test]
    fn test_lookups() {
        let taxonomy = ClassTaxonomy::builtin();

        assert!(taxonomy.is_valid("25B"));
        assert!(!taxonomy.is_valid("99"));
        assert_eq!(taxonomy.class_name("16"), Some("Three roses"));
        assert_eq!(taxonomy.section_of("42"), Some("G"));
        assert_eq!(taxonomy.section_classes("D").unwrap().len(), 4);
        assert!(taxonomy.section_classes("Z").is_none());
        assert!(taxonomy.is_free("56"));
        assert!(!taxonomy.is_free("1"));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let dup = Section {
            id: "A".into(),
            title: "Dup".into(),
            classes: vec![
                ClassDefinition { class_id: "1".into(), name: "One".into() },
                ClassDefinition { class_id: "1".into(), name: "Also one".into() },
            ],
        };
        assert!(matches!(
            ClassTaxonomy::new(vec![dup], vec![], 1.0),
            Err(ShowError::Consistency(_))
        ));
    }

    #[test]
    fn test_load_override_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxonomy.json");

        assert_eq!(ClassTaxonomy::load(&path).unwrap(), ClassTaxonomy::builtin());

        fs::write(
            &path,
            r#"{"sections": [
                {"id": "A", "title": "Veg", "classes": [{"class_id": "1", "name": "Spuds"}]}
            ]}"#,
        )
        .unwrap();
        let loaded = ClassTaxonomy::load(&path).unwrap();
        assert_eq!(loaded.class_ids(), vec!["1"]);
        assert_eq!(loaded.entry_cost(), DEFAULT_ENTRY_COST);
        assert!(loaded.free_classes.is_empty());
    }
}
