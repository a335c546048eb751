//! Lead quality scoring.
//!
//! Converts a wizard submission into a weighted score in the 50–100 range,
//! plus a letter grade used for triage in the back office. The function is
//! pure and total: an unrecognized timeline value contributes no bonus
//! instead of failing, so a wizard option added ahead of a backend deploy
//! still produces a usable score.

/// Compute the quality score for a lead from budget (万), area (㎡) and the
/// submitted timeline value.
///
/// Base score is 50. Budget contributes up to +30, area up to +10, timeline
/// up to +10. The sum is capped at 100.
pub fn lead_score(budget: f64, area: f64, timeline: &str) -> i64 {
    let mut score: i64 = 50;

    // Budget tier, evaluated high to low
    score += if budget >= 50.0 {
        30
    } else if budget >= 30.0 {
        25
    } else if budget >= 20.0 {
        20
    } else if budget >= 10.0 {
        15
    } else {
        10
    };

    // Area tier
    score += if area >= 200.0 {
        10
    } else if area >= 150.0 {
        8
    } else if area >= 100.0 {
        6
    } else if area >= 80.0 {
        4
    } else {
        2
    };

    score += timeline_bonus(timeline);

    score.min(100)
}

/// Bonus contributed by the timeline choice. Unknown values score 0.
fn timeline_bonus(timeline: &str) -> i64 {
    match timeline {
        "within_1_month" => 10,
        "within_1_3_months" => 7,
        "within_3_6_months" => 5,
        "over_6_months" => 3,
        "no_plan" => 0,
        _ => 0,
    }
}

/// Letter grade derived from a lead score, for quick triage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Bucket a score into a grade: ≥90 A, ≥75 B, ≥60 C, below D.
    pub fn from_score(score: i64) -> Self {
        if score >= 90 {
            Grade::A
        } else if score >= 75 {
            Grade::B
        } else if score >= 60 {
            Grade::C
        } else {
            Grade::D
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_is_deterministic() {
        for _ in 0..10 {
            assert_eq!(lead_score(25.0, 95.0, "within_3_6_months"), 50 + 20 + 4 + 5);
        }
    }

    #[test]
    fn test_score_bounds() {
        let budgets = [0.5, 9.0, 10.0, 19.9, 20.0, 29.9, 30.0, 49.9, 50.0, 500.0];
        let areas = [1.0, 79.9, 80.0, 99.9, 100.0, 149.9, 150.0, 199.9, 200.0, 800.0];
        let timelines = [
            "within_1_month",
            "within_1_3_months",
            "within_3_6_months",
            "over_6_months",
            "no_plan",
            "whenever",
        ];

        for &budget in &budgets {
            for &area in &areas {
                for timeline in timelines {
                    let score = lead_score(budget, area, timeline);
                    assert!((50..=100).contains(&score), "score {} out of range", score);
                }
            }
        }
    }

    #[test]
    fn test_budget_monotonicity() {
        let budgets = [5.0, 10.0, 20.0, 30.0, 50.0];
        for pair in budgets.windows(2) {
            assert!(
                lead_score(pair[0], 120.0, "no_plan") <= lead_score(pair[1], 120.0, "no_plan"),
                "raising budget from {} to {} lowered the score",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_area_monotonicity() {
        let areas = [50.0, 80.0, 100.0, 150.0, 200.0];
        for pair in areas.windows(2) {
            assert!(
                lead_score(15.0, pair[0], "no_plan") <= lead_score(15.0, pair[1], "no_plan"),
                "raising area from {} to {} lowered the score",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_timeline_monotonicity() {
        let timelines = [
            "no_plan",
            "over_6_months",
            "within_3_6_months",
            "within_1_3_months",
            "within_1_month",
        ];
        for pair in timelines.windows(2) {
            assert!(
                lead_score(15.0, 120.0, pair[0]) <= lead_score(15.0, 120.0, pair[1]),
                "moving timeline up from {} to {} lowered the score",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_max_score_is_capped_at_100() {
        assert_eq!(lead_score(50.0, 200.0, "within_1_month"), 100);
        assert_eq!(lead_score(999.0, 999.0, "within_1_month"), 100);
    }

    #[test]
    fn test_minimal_lead() {
        assert_eq!(lead_score(9.0, 50.0, "no_plan"), 62);
    }

    #[test]
    fn test_unknown_timeline_scores_zero_bonus() {
        assert_eq!(
            lead_score(25.0, 95.0, "next_decade"),
            lead_score(25.0, 95.0, "no_plan")
        );
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_score(100), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(89), Grade::B);
        assert_eq!(Grade::from_score(75), Grade::B);
        assert_eq!(Grade::from_score(74), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::C);
        assert_eq!(Grade::from_score(59), Grade::D);
        assert_eq!(Grade::from_score(50), Grade::D);
    }

    #[test]
    fn test_grade_display() {
        assert_eq!(Grade::A.to_string(), "A");
        assert_eq!(Grade::D.as_str(), "D");
    }
}
