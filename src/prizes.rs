// 🏆 Scoring & Prize Engine - rankings, point-based trophies, manual awards
//
// Prize rules are data: a tagged enum evaluated against a Show, so the prize
// list can be read from prizes.json instead of being compiled in.

use crate::entities::{Contestant, PointsTally, Show};
use crate::error::{Result, ShowError};
use crate::taxonomy::ClassTaxonomy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// ============================================================================
// RANKING
// ============================================================================

/// Sum of class points per contestant over the whole show
fn show_tally(show: &Show) -> PointsTally {
    let mut tally = PointsTally::new();
    for show_class in show.classes() {
        for (contestant, points) in show_class.points().into_vec() {
            tally.add(&contestant, points);
        }
    }
    tally
}

/// Contestants by total points, highest first.
///
/// The sort is stable: equal totals keep the order in which contestants were
/// first credited (walking classes in natural order).
pub fn sort_contestant_by_points(show: &Show) -> Vec<(Contestant, u32)> {
    let mut ranking = show_tally(show).into_vec();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking
}

/// `"<name>: <points>"` per contestant, in ranking order
pub fn ranking_lines(show: &Show) -> Vec<String> {
    sort_contestant_by_points(show)
        .into_iter()
        .map(|(c, points)| format!("{}: {}", c.name, points))
        .collect()
}

// ============================================================================
// PRIZE RULES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PrizeRule {
    /// Most points across an explicit list of classes
    HighestPointsInClasses { class_ids: Vec<String> },

    /// Most points across every class of a section
    HighestPointsInSection { section: String },

    /// Most points in the whole show
    OverallHighestPoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prize {
    pub name: String,
    #[serde(flatten)]
    pub rule: PrizeRule,
}

/// Everyone tied at the top of a tally; empty when nobody scored
fn top_of(tally: &PointsTally) -> Vec<Contestant> {
    match tally.max() {
        Some(max) => tally.holding(max),
        None => Vec::new(),
    }
}

fn highest_in_classes(show: &Show, class_ids: &[&str]) -> Vec<Contestant> {
    let mut tally = PointsTally::new();
    for class_id in class_ids {
        // classes nobody entered were never allocated
        let Some(show_class) = show.get_class(class_id) else {
            continue;
        };
        for (contestant, points) in show_class.points().into_vec() {
            tally.add(&contestant, points);
        }
    }
    top_of(&tally)
}

impl Prize {
    pub fn new(name: impl Into<String>, rule: PrizeRule) -> Self {
        Prize {
            name: name.into(),
            rule,
        }
    }

    /// Winners of this prize; several when tied
    pub fn winner(&self, show: &Show, taxonomy: &ClassTaxonomy) -> Result<Vec<Contestant>> {
        match &self.rule {
            PrizeRule::HighestPointsInClasses { class_ids } => {
                let ids: Vec<&str> = class_ids.iter().map(String::as_str).collect();
                Ok(highest_in_classes(show, &ids))
            }
            PrizeRule::HighestPointsInSection { section } => {
                let classes = taxonomy.section_classes(section).ok_or_else(|| {
                    ShowError::Consistency(format!(
                        "prize '{}' refers to unknown section {}",
                        self.name, section
                    ))
                })?;
                let ids: Vec<&str> = classes.into_iter().map(|(id, _)| id).collect();
                Ok(highest_in_classes(show, &ids))
            }
            PrizeRule::OverallHighestPoints => {
                let ranking = sort_contestant_by_points(show);
                let Some(max_score) = ranking.first().map(|(_, p)| *p) else {
                    return Ok(Vec::new());
                };
                if let Some((c, p)) = ranking.iter().find(|(_, p)| *p > max_score) {
                    return Err(ShowError::Consistency(format!(
                        "{} scored {} above the top score {}",
                        c.name, p, max_score
                    )));
                }
                Ok(ranking
                    .into_iter()
                    .filter(|(_, p)| *p == max_score)
                    .map(|(c, _)| c)
                    .collect())
            }
        }
    }
}

// ============================================================================
// CATALOGUE
// ============================================================================

/// The show's standing trophies
pub fn default_prizes() -> Vec<Prize> {
    let section = |name: &str, section: &str| {
        Prize::new(
            name,
            PrizeRule::HighestPointsInSection {
                section: section.to_string(),
            },
        )
    };
    let classes = |name: &str, ids: &[&str]| {
        Prize::new(
            name,
            PrizeRule::HighestPointsInClasses {
                class_ids: ids.iter().map(|id| id.to_string()).collect(),
            },
        )
    };

    vec![
        section("William Trow-Poole Trophy", "H"),
        section("Joan Hollier Plate", "F"),
        Prize::new("M & B Shield", PrizeRule::OverallHighestPoints),
        classes("Mrs Ann Porter Cup", &["16"]),
        classes("Harold Herbert Cup", &["25B", "25C"]),
        section("Butler Trophy", "E"),
        section("Court House Salver", "B"),
        section("Children's Cup", "J"),
    ]
}

/// prizes.json if present, the standing trophies otherwise
pub fn load_prizes(path: &Path) -> Result<Vec<Prize>> {
    if !path.exists() {
        return Ok(default_prizes());
    }
    let text = fs::read_to_string(path).map_err(|e| ShowError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| ShowError::Serialization {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// REPORT
// ============================================================================

/// One line per rule prize (winners sorted), then one per manual prize
pub fn report_prizes(
    show: &Show,
    taxonomy: &ClassTaxonomy,
    prizes: &[Prize],
) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(prizes.len() + show.prizes().len());

    for prize in prizes {
        let mut winners = prize.winner(show, taxonomy)?;
        winners.sort_by_key(Contestant::key);
        let names: Vec<&str> = winners.iter().map(|w| w.name.as_str()).collect();
        lines.push(format!("{}: {}", prize.name, names.join(", ")));
    }

    for manual in show.prizes() {
        lines.push(format!("{}: {}", manual.prize_name, manual.contestant.name));
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{EntryLabel, Judgment, ManualPrize, Placement, ShowClass};

    fn alice() -> Contestant {
        Contestant::new("Alice Appleby", ["1", "2", "3"])
    }
    fn bob() -> Contestant {
        Contestant::new("Bob Beetroot", ["1", "2", "2", "42"])
    }
    fn carole() -> Contestant {
        Contestant::new("Carole Carrot", ["1", "42"])
    }
    fn dahlia() -> Contestant {
        Contestant::new("Dahlia Date", ["1", "3", "3"])
    }

    fn at(contestant: Contestant, number: usize) -> Placement {
        Placement::new(contestant, EntryLabel::Local(number))
    }

    /// The four-contestant show, judged
    fn judged_show() -> Show {
        let class = |id: &str, roster: Vec<Contestant>, judgment: Judgment| {
            ShowClass::new(id, format!("Class {}", id), roster, 2)
                .unwrap()
                .with_judgment(judgment)
        };

        Show::new(vec![
            class(
                "1",
                vec![alice(), bob(), carole(), dahlia()],
                Judgment {
                    first: vec![at(alice(), 1)],
                    second: vec![at(bob(), 2)],
                    third: vec![at(carole(), 3)],
                    commendations: vec![at(dahlia(), 4)],
                },
            ),
            class(
                "2",
                vec![alice(), bob(), bob()],
                Judgment {
                    first: vec![at(bob(), 2)],
                    second: vec![at(alice(), 1)],
                    ..Judgment::default()
                },
            ),
            class(
                "3",
                vec![alice(), dahlia(), dahlia()],
                Judgment {
                    first: vec![at(dahlia(), 2)],
                    second: vec![at(alice(), 1), at(dahlia(), 3)],
                    ..Judgment::default()
                },
            ),
            class(
                "42",
                vec![bob(), carole()],
                Judgment {
                    first: vec![at(bob(), 1)],
                    second: vec![at(carole(), 2)],
                    ..Judgment::default()
                },
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_ranking_sums_best_placing_per_class() {
        let ranking = sort_contestant_by_points(&judged_show());
        let summary: Vec<(&str, u32)> = ranking
            .iter()
            .map(|(c, p)| (c.name.as_str(), *p))
            .collect();

        // Alice 3+2+2, Bob 2+3+3, Carole 1+2, Dahlia 3 (second in class 3 ignored)
        assert_eq!(
            summary,
            vec![
                ("Bob Beetroot", 8),
                ("Alice Appleby", 7),
                ("Carole Carrot", 3),
                ("Dahlia Date", 3),
            ]
        );
    }

    #[test]
    fn test_ranking_ties_keep_credit_order() {
        let ranking = ranking_lines(&judged_show());
        // Carole was credited in class 1, before Dahlia in class 3
        assert_eq!(ranking[2], "Carole Carrot: 3");
        assert_eq!(ranking[3], "Dahlia Date: 3");
    }

    #[test]
    fn test_overall_highest_points() {
        let prize = Prize::new("Shield", PrizeRule::OverallHighestPoints);
        let winners = prize.winner(&judged_show(), &ClassTaxonomy::builtin()).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].name, "Bob Beetroot");
    }

    #[test]
    fn test_overall_highest_points_returns_all_tied() {
        let class = ShowClass::new("1", "Potatoes", vec![alice(), bob()], 2)
            .unwrap()
            .with_judgment(Judgment {
                first: vec![at(alice(), 1), at(bob(), 2)],
                ..Judgment::default()
            });
        let show = Show::new(vec![class]).unwrap();

        let prize = Prize::new("Shield", PrizeRule::OverallHighestPoints);
        let winners = prize.winner(&show, &ClassTaxonomy::builtin()).unwrap();
        assert_eq!(winners.len(), 2);
    }

    #[test]
    fn test_class_list_prize_ignores_other_classes() {
        let prize = Prize::new(
            "Onion Cup",
            PrizeRule::HighestPointsInClasses {
                class_ids: vec!["3".into(), "99".into()],
            },
        );
        let winners = prize.winner(&judged_show(), &ClassTaxonomy::builtin()).unwrap();
        assert_eq!(winners.len(), 1);
        assert_eq!(winners[0].name, "Dahlia Date");
    }

    #[test]
    fn test_no_points_no_winners() {
        let roses = ShowClass::new("16", "Three roses", vec![alice()], 2).unwrap();
        let unjudged = Show::new(vec![roses]).unwrap();
        let taxonomy = ClassTaxonomy::builtin();

        for prize in default_prizes() {
            assert!(prize.winner(&unjudged, &taxonomy).unwrap().is_empty(), "{}", prize.name);
        }
    }

    #[test]
    fn test_section_prize() {
        // section A holds classes 1, 2 and 3
        let prize = Prize::new(
            "Veg Trophy",
            PrizeRule::HighestPointsInSection { section: "A".into() },
        );
        let winners = prize.winner(&judged_show(), &ClassTaxonomy::builtin()).unwrap();
        let names: Vec<&str> = winners.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Appleby"]);

        let bad = Prize::new("Nowhere", PrizeRule::HighestPointsInSection { section: "Z".into() });
        assert!(matches!(
            bad.winner(&judged_show(), &ClassTaxonomy::builtin()),
            Err(ShowError::Consistency(_))
        ));
    }

    #[test]
    fn test_report_lines() {
        let show = judged_show().with_prize(ManualPrize {
            contestant: carole(),
            class_id: "42".into(),
            prize_name: "Wonky Wooden Spoon".into(),
        });
        let prizes = vec![
            Prize::new("Shield", PrizeRule::OverallHighestPoints),
            Prize::new(
                "Tie Cup",
                PrizeRule::HighestPointsInClasses {
                    class_ids: vec!["42".into(), "3".into()],
                },
            ),
        ];

        let lines = report_prizes(&show, &ClassTaxonomy::builtin(), &prizes).unwrap();
        assert_eq!(
            lines,
            vec![
                "Shield: Bob Beetroot".to_string(),
                "Tie Cup: Bob Beetroot, Dahlia Date".to_string(),
                "Wonky Wooden Spoon: Carole Carrot".to_string(),
            ]
        );
    }

    #[test]
    fn test_prize_catalogue_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prizes.json");
        assert_eq!(load_prizes(&path).unwrap(), default_prizes());

        fs::write(
            &path,
            r#"[{"name": "Rose Bowl", "rule": "highest_points_in_classes", "class_ids": ["16"]},
                {"name": "Shield", "rule": "overall_highest_points"}]"#,
        )
        .unwrap();
        let prizes = load_prizes(&path).unwrap();
        assert_eq!(prizes.len(), 2);
        assert_eq!(prizes[1].rule, PrizeRule::OverallHighestPoints);
    }
}
