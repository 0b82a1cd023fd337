use seedlab_bridge::analysis::{GerminationRepetitionInput, TetrazolioRepetitionInput};

use super::ValidationError;

/// Allowed deviation of a repetition total from the expected seed count.
pub const TOLERANCE_PERCENT: u32 = 5;

/// Fewest repetitions an analysis may expect.
pub const MIN_REPETITIONS: u32 = 2;

/// Checks that `total` lies within ±[`TOLERANCE_PERCENT`] of `expected`.
pub fn check_tolerance(total: i64, expected: u32) -> Result<(), ValidationError> {
    let expected_seeds = i64::from(expected);
    let deviation = (i128::from(total) - i128::from(expected_seeds)).abs();
    if deviation * 100 <= i128::from(expected_seeds) * i128::from(TOLERANCE_PERCENT) {
        return Ok(());
    }

    let margin = i64::from(TOLERANCE_PERCENT);
    Err(ValidationError::OutOfTolerance {
        total,
        expected,
        min: (expected_seeds * (100 - margin) + 99) / 100,
        max: expected_seeds * (100 + margin) / 100,
    })
}

fn check_counts(counts: &[(&'static str, i64)]) -> Result<i64, ValidationError> {
    if let Some((field, _)) = counts.iter().find(|(_, value)| *value < 0) {
        return Err(ValidationError::NegativeCount { field });
    }

    let total = counts
        .iter()
        .try_fold(0i64, |sum, (_, value)| sum.checked_add(*value))
        .ok_or(ValidationError::CountTooLarge)?;
    if total == 0 {
        return Err(ValidationError::EmptyRepetition);
    }
    Ok(total)
}

fn check_limit(existing: usize, expected_repetitions: u32) -> Result<(), ValidationError> {
    if existing >= expected_repetitions as usize {
        return Err(ValidationError::RepetitionLimitReached {
            expected: expected_repetitions,
        });
    }
    Ok(())
}

/// Checks the counts of a tetrazolio repetition on their own: no negative
/// values, a positive total within tolerance of `seeds_per_repetition`.
pub fn check_tetrazolio_counts(
    input: &TetrazolioRepetitionInput,
    seeds_per_repetition: u32,
) -> Result<(), ValidationError> {
    let total = check_counts(&[
        ("viables", input.viables_num),
        ("duras", input.duras),
        ("no viables", input.no_viables_num),
    ])?;
    check_tolerance(total, seeds_per_repetition)
}

pub fn check_germination_counts(
    input: &GerminationRepetitionInput,
    seeds_per_repetition: u32,
) -> Result<(), ValidationError> {
    let total = check_counts(&[
        ("normales", input.normales),
        ("anormales", input.anormales),
        ("duras", input.duras),
        ("frescas", input.frescas),
        ("muertas", input.muertas),
    ])?;
    check_tolerance(total, seeds_per_repetition)
}

/// Validates a new tetrazolio repetition against the analysis settings and
/// the repetitions already recorded.
pub fn validate_tetrazolio_repetition(
    input: &TetrazolioRepetitionInput,
    seeds_per_repetition: u32,
    existing: usize,
    expected_repetitions: u32,
) -> Result<(), ValidationError> {
    check_limit(existing, expected_repetitions)?;
    check_tetrazolio_counts(input, seeds_per_repetition)
}

pub fn validate_germination_repetition(
    input: &GerminationRepetitionInput,
    seeds_per_repetition: u32,
    existing: usize,
    expected_repetitions: u32,
) -> Result<(), ValidationError> {
    check_limit(existing, expected_repetitions)?;
    check_germination_counts(input, seeds_per_repetition)
}

/// Validates a new value for `numRepeticionesEsperadas`.
///
/// It may not drop below the repetitions already recorded nor below
/// [`MIN_REPETITIONS`]; the error carries the value the field falls back to,
/// `max(existing, MIN_REPETITIONS)`.
pub fn check_expected_repetitions(requested: u32, existing: u32) -> Result<u32, ValidationError> {
    let clamped = existing.max(MIN_REPETITIONS);
    if requested < existing {
        return Err(ValidationError::ExpectedBelowExisting {
            requested,
            existing,
            clamped,
        });
    }
    if requested < MIN_REPETITIONS {
        return Err(ValidationError::ExpectedBelowMinimum { requested, clamped });
    }
    Ok(requested)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tz(viables_num: i64, duras: i64, no_viables_num: i64) -> TetrazolioRepetitionInput {
        TetrazolioRepetitionInput {
            viables_num,
            duras,
            no_viables_num,
        }
    }

    #[test]
    fn ten_percent_over_is_rejected() {
        let result = validate_tetrazolio_repetition(&tz(40, 5, 10), 50, 0, 4);
        assert_eq!(
            result,
            Err(ValidationError::OutOfTolerance {
                total: 55,
                expected: 50,
                min: 48,
                max: 52,
            })
        );
    }

    #[test]
    fn two_percent_over_is_accepted() {
        assert_eq!(validate_tetrazolio_repetition(&tz(40, 5, 6), 50, 0, 4), Ok(()));
    }

    #[test]
    fn tolerance_bounds_are_inclusive() {
        assert!(check_tolerance(105, 100).is_ok());
        assert!(check_tolerance(95, 100).is_ok());
        assert!(check_tolerance(106, 100).is_err());
        assert!(check_tolerance(94, 100).is_err());
    }

    #[test]
    fn negative_and_empty_counts() {
        assert_eq!(
            validate_tetrazolio_repetition(&tz(-1, 26, 25), 50, 0, 4),
            Err(ValidationError::NegativeCount { field: "viables" })
        );
        assert_eq!(
            validate_tetrazolio_repetition(&tz(0, 0, 0), 50, 0, 4),
            Err(ValidationError::EmptyRepetition)
        );
    }

    #[test]
    fn huge_counts_are_rejected_instead_of_overflowing() {
        assert!(matches!(
            validate_tetrazolio_repetition(&tz(999_999_999_999_999_999, 0, 0), 50, 0, 4),
            Err(ValidationError::OutOfTolerance { expected: 50, .. })
        ));
        assert_eq!(
            validate_tetrazolio_repetition(&tz(i64::MAX, 1, 0), 50, 0, 4),
            Err(ValidationError::CountTooLarge)
        );
        assert!(check_tolerance(i64::MAX, u32::MAX).is_err());
    }

    #[test]
    fn repetition_limit() {
        assert_eq!(
            validate_tetrazolio_repetition(&tz(40, 5, 5), 50, 4, 4),
            Err(ValidationError::RepetitionLimitReached { expected: 4 })
        );
    }

    #[test]
    fn germination_uses_all_five_counts() {
        let input = GerminationRepetitionInput {
            normales: 85,
            anormales: 5,
            duras: 3,
            frescas: 4,
            muertas: 3,
        };
        assert_eq!(validate_germination_repetition(&input, 100, 1, 4), Ok(()));

        let input = GerminationRepetitionInput {
            muertas: 13,
            ..input
        };
        assert!(matches!(
            validate_germination_repetition(&input, 100, 1, 4),
            Err(ValidationError::OutOfTolerance { total: 110, .. })
        ));
    }

    #[test]
    fn expected_repetitions_cannot_drop_below_existing() {
        assert_eq!(
            check_expected_repetitions(3, 5),
            Err(ValidationError::ExpectedBelowExisting {
                requested: 3,
                existing: 5,
                clamped: 5,
            })
        );
        assert_eq!(check_expected_repetitions(3, 5).unwrap_err().clamped_value(), Some(5));
    }

    #[test]
    fn expected_repetitions_clamp_to_minimum() {
        let error = check_expected_repetitions(0, 1).unwrap_err();
        assert_eq!(error.clamped_value(), Some(2));

        let error = check_expected_repetitions(1, 0).unwrap_err();
        assert_eq!(
            error,
            ValidationError::ExpectedBelowMinimum {
                requested: 1,
                clamped: 2,
            }
        );
    }

    #[test]
    fn expected_repetitions_may_grow_or_match() {
        assert_eq!(check_expected_repetitions(5, 5), Ok(5));
        assert_eq!(check_expected_repetitions(8, 3), Ok(8));
        assert_eq!(check_expected_repetitions(2, 0), Ok(2));
    }
}
