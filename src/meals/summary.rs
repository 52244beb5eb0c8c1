//! Diet summary over a user's full meal history.
//!
//! Meals are walked in `(date, id)` ascending order so two meals sharing a
//! timestamp always land in the same relative position, whatever order the
//! store returned them in.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::Meal;

/// The part of a meal the summary looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DietEntry {
    pub id: Uuid,
    pub date: OffsetDateTime,
    pub in_diet: bool,
}

impl From<&Meal> for DietEntry {
    fn from(m: &Meal) -> Self {
        Self {
            id: m.id,
            date: m.date,
            in_diet: m.in_diet,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub total_meals: u64,
    pub total_meals_in_diet: u64,
    pub total_meals_out_diet: u64,
    /// Longest run of consecutive in-diet meals; `0` when there are none.
    pub best_sequence: u64,
}

/// Computes totals and the best in-diet streak.
///
/// Input order does not matter. The caller must pass the complete history of
/// one user; a partial page yields a wrong streak.
pub fn summarize(entries: &[DietEntry]) -> MealSummary {
    let mut ordered: Vec<&DietEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

    let mut summary = MealSummary::default();
    let mut streak = 0u64;

    for entry in ordered {
        summary.total_meals += 1;
        if entry.in_diet {
            summary.total_meals_in_diet += 1;
            streak += 1;
            summary.best_sequence = summary.best_sequence.max(streak);
        } else {
            summary.total_meals_out_diet += 1;
            streak = 0;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn entry(n: u128, date: OffsetDateTime, in_diet: bool) -> DietEntry {
        DietEntry { id: id(n), date, in_diet }
    }

    /// One entry per flag, one day apart, ids ascending.
    fn daily(flags: &[bool]) -> Vec<DietEntry> {
        let start = datetime!(2024-09-30 07:00 UTC);
        flags
            .iter()
            .enumerate()
            .map(|(i, &f)| entry(i as u128 + 1, start + time::Duration::days(i as i64), f))
            .collect()
    }

    fn assert_invariants(s: &MealSummary) {
        assert_eq!(s.total_meals, s.total_meals_in_diet + s.total_meals_out_diet);
        assert!(s.best_sequence <= s.total_meals_in_diet);
        assert!(s.best_sequence <= s.total_meals);
    }

    #[test]
    fn empty_history_is_all_zero() {
        let s = summarize(&[]);
        assert_eq!(s, MealSummary::default());
        assert_eq!(s.best_sequence, 0);
    }

    #[test]
    fn single_in_diet_meal() {
        let s = summarize(&daily(&[true]));
        assert_eq!(
            s,
            MealSummary {
                total_meals: 1,
                total_meals_in_diet: 1,
                total_meals_out_diet: 0,
                best_sequence: 1,
            }
        );
    }

    #[test]
    fn single_out_of_diet_meal() {
        let s = summarize(&daily(&[false]));
        assert_eq!(s.total_meals_out_diet, 1);
        assert_eq!(s.best_sequence, 0);
    }

    #[test]
    fn streak_broken_by_out_of_diet_meal() {
        let s = summarize(&daily(&[true, true, false, true]));
        assert_eq!(
            (s.total_meals, s.total_meals_in_diet, s.total_meals_out_diet, s.best_sequence),
            (4, 3, 1, 2)
        );
    }

    #[test]
    fn streak_after_leading_out_of_diet_meal() {
        let s = summarize(&daily(&[false, true, true, true]));
        assert_eq!(
            (s.total_meals, s.total_meals_in_diet, s.total_meals_out_diet, s.best_sequence),
            (4, 3, 1, 3)
        );
    }

    #[test]
    fn all_in_diet_streak_equals_total() {
        let s = summarize(&daily(&[true; 7]));
        assert_eq!(s.best_sequence, s.total_meals);
        assert_eq!(s.total_meals, 7);
    }

    #[test]
    fn no_in_diet_meals_reports_zero_streak() {
        let s = summarize(&daily(&[false; 5]));
        assert_eq!(s.best_sequence, 0);
        assert_eq!(s.total_meals_out_diet, 5);
    }

    #[test]
    fn same_date_ties_break_by_id() {
        let at = datetime!(2024-10-01 07:00 UTC);
        // id1 (in) sorts before id2 (out), so the in-diet run is cut at length 1.
        let meals = vec![
            entry(2, at, false),
            entry(1, at, true),
            entry(3, at + time::Duration::hours(1), false),
        ];
        let first = summarize(&meals);
        assert_eq!(first.best_sequence, 1);
        for _ in 0..10 {
            assert_eq!(summarize(&meals), first);
        }
    }

    #[test]
    fn tie_order_decides_grouping() {
        let at = datetime!(2024-10-01 12:00 UTC);
        let before = datetime!(2024-10-01 08:00 UTC);
        // in(before), then same-date pair out(id 5) / in(id 9): the out meal
        // sorts first and splits the run.
        let split = vec![entry(1, before, true), entry(5, at, false), entry(9, at, true)];
        assert_eq!(summarize(&split).best_sequence, 1);

        // With the ids swapped the in-diet meal comes first and extends the run.
        let joined = vec![entry(1, before, true), entry(9, at, false), entry(5, at, true)];
        assert_eq!(summarize(&joined).best_sequence, 2);
    }

    #[test]
    fn input_array_order_is_irrelevant() {
        let meals = daily(&[true, false, true, true, true, false, true, true]);
        let expected = summarize(&meals);
        assert_eq!(expected.best_sequence, 3);

        let mut reversed = meals.clone();
        reversed.reverse();
        assert_eq!(summarize(&reversed), expected);

        let mut rotated = meals.clone();
        rotated.rotate_left(3);
        assert_eq!(summarize(&rotated), expected);

        let mut interleaved: Vec<DietEntry> = meals.iter().step_by(2).copied().collect();
        interleaved.extend(meals.iter().skip(1).step_by(2).copied());
        assert_eq!(summarize(&interleaved), expected);
    }

    #[test]
    fn invariants_hold_over_many_patterns() {
        // every flag pattern of length 0..=8
        for len in 0..=8u32 {
            for bits in 0..(1u32 << len) {
                let flags: Vec<bool> = (0..len).map(|i| bits & (1 << i) != 0).collect();
                let s = summarize(&daily(&flags));
                assert_invariants(&s);

                let longest = flags
                    .split(|f| !*f)
                    .map(|run| run.len() as u64)
                    .max()
                    .unwrap_or(0);
                assert_eq!(s.best_sequence, longest, "flags {flags:?}");
            }
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let s = summarize(&daily(&[true, false]));
        let json = serde_json::to_value(s).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalMeals": 2,
                "totalMealsInDiet": 1,
                "totalMealsOutDiet": 1,
                "bestSequence": 1
            })
        );
    }

    #[test]
    fn zero_streak_is_serialized_not_omitted() {
        let json = serde_json::to_value(summarize(&daily(&[false]))).unwrap();
        assert_eq!(json["bestSequence"], 0);
    }
}
