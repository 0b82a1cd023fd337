use seedlab_bridge::analysis::{
    GerminationPercentages, GerminationRepetition, TetrazolioPercentages, TetrazolioRepetition,
};

use super::ValidationError;

/// Rounds `counts` to whole percentages of their sum so that the result
/// always adds up to exactly 100.
///
/// Every share is floored first; the points still missing go, one each, to
/// the shares with the largest fractional part. Ties favour the earlier
/// category. Returns all zeros when there is nothing to distribute or a
/// count is negative.
pub fn round_to_hundred(counts: &[i64]) -> Vec<u32> {
    let total: i128 = counts.iter().map(|count| i128::from(*count)).sum();
    if total <= 0 || counts.iter().any(|count| *count < 0) {
        return vec![0; counts.len()];
    }

    let mut shares: Vec<(usize, u32, i128)> = counts
        .iter()
        .enumerate()
        .map(|(index, count)| {
            let scaled = i128::from(*count) * 100;
            let floor = u32::try_from(scaled / total).unwrap_or(0);
            (index, floor, scaled % total)
        })
        .collect();

    let assigned: u32 = shares.iter().map(|(_, floor, _)| floor).sum();
    let missing = 100u32.saturating_sub(assigned) as usize;

    let mut by_remainder: Vec<usize> = (0..shares.len()).collect();
    by_remainder.sort_by(|a, b| shares[*b].2.cmp(&shares[*a].2).then(a.cmp(b)));
    for index in by_remainder.into_iter().take(missing) {
        shares[index].1 += 1;
    }

    shares.into_iter().map(|(_, value, _)| value).collect()
}

/// Confirms that percentages typed or computed elsewhere add up to 100.
pub fn check_sum(values: &[u32]) -> Result<(), ValidationError> {
    let total: i64 = values.iter().map(|value| i64::from(*value)).sum();
    if total != 100 {
        return Err(ValidationError::PercentagesDoNotAddUp { total });
    }
    Ok(())
}

/// Adds up the per-category counts of every repetition.
fn accumulate<const N: usize>(
    rows: impl IntoIterator<Item = [i64; N]>,
) -> Result<[i64; N], ValidationError> {
    let mut counts = [0i64; N];
    for row in rows {
        for (sum, value) in counts.iter_mut().zip(row) {
            if value < 0 {
                return Err(ValidationError::NegativeRecordedCount);
            }
            *sum = sum.checked_add(value).ok_or(ValidationError::CountTooLarge)?;
        }
    }
    Ok(counts)
}

fn rounded<const N: usize>(counts: [i64; N]) -> Result<[f64; N], ValidationError> {
    let total = counts
        .iter()
        .try_fold(0i64, |sum, count| sum.checked_add(*count))
        .ok_or(ValidationError::CountTooLarge)?;
    if total <= 0 {
        return Err(ValidationError::NoRepetitions);
    }
    let values = round_to_hundred(&counts);
    check_sum(&values)?;

    let mut out = [0.0; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = f64::from(value);
    }
    Ok(out)
}

pub fn tetrazolio_percentages(
    repetitions: &[TetrazolioRepetition],
) -> Result<TetrazolioPercentages, ValidationError> {
    let counts = accumulate(
        repetitions
            .iter()
            .map(|rep| [rep.viables_num, rep.no_viables_num, rep.duras]),
    )?;
    let [viables, no_viables, duras] = rounded(counts)?;
    Ok(TetrazolioPercentages {
        viables,
        no_viables,
        duras,
    })
}

pub fn germination_percentages(
    repetitions: &[GerminationRepetition],
) -> Result<GerminationPercentages, ValidationError> {
    let counts = accumulate(repetitions.iter().map(|rep| {
        [rep.normales, rep.anormales, rep.duras, rep.frescas, rep.muertas]
    }))?;
    let [normales, anormales, duras, frescas, muertas] = rounded(counts)?;
    Ok(GerminationPercentages {
        normales,
        anormales,
        duras,
        frescas,
        muertas,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn thirds_add_up_to_hundred() {
        assert_eq!(round_to_hundred(&[1, 1, 1]), vec![34, 33, 33]);
    }

    #[test]
    fn largest_remainder_gets_the_extra_point() {
        // 33.6 / 33.3 / 33.1
        assert_eq!(round_to_hundred(&[336, 333, 331]), vec![34, 33, 33]);
        // 12.5 / 12.5 / 75.0, ties go to the first
        assert_eq!(round_to_hundred(&[1, 1, 6]), vec![13, 12, 75]);
    }

    #[test]
    fn exact_shares_are_untouched() {
        assert_eq!(round_to_hundred(&[50, 25, 25]), vec![50, 25, 25]);
        assert_eq!(round_to_hundred(&[0, 0, 7]), vec![0, 0, 100]);
    }

    #[test]
    fn nothing_to_distribute() {
        assert_eq!(round_to_hundred(&[0, 0]), vec![0, 0]);
        assert_eq!(check_sum(&[0, 0]), Err(ValidationError::PercentagesDoNotAddUp { total: 0 }));
    }

    #[test]
    fn sums_are_always_hundred() {
        for counts in [[7i64, 13, 29, 3, 1], [1, 2, 3, 4, 5], [99, 1, 0, 0, 0], [17, 17, 17, 17, 17]] {
            let total: u32 = round_to_hundred(&counts).iter().sum();
            assert_eq!(total, 100, "{counts:?}");
        }
    }

    #[test]
    fn tetrazolio_from_repetitions() {
        let reps = vec![
            TetrazolioRepetition {
                id: 1,
                numero: 1,
                viables_num: 40,
                duras: 3,
                no_viables_num: 7,
            },
            TetrazolioRepetition {
                id: 2,
                numero: 2,
                viables_num: 42,
                duras: 2,
                no_viables_num: 6,
            },
        ];
        assert_eq!(
            tetrazolio_percentages(&reps),
            Ok(TetrazolioPercentages {
                viables: 82.0,
                no_viables: 13.0,
                duras: 5.0,
            })
        );
    }

    #[test]
    fn negative_recorded_counts_are_rejected() {
        let reps = vec![TetrazolioRepetition {
            id: 1,
            numero: 1,
            viables_num: 60,
            duras: -5,
            no_viables_num: 0,
        }];
        assert_eq!(
            tetrazolio_percentages(&reps),
            Err(ValidationError::NegativeRecordedCount)
        );
        assert_eq!(round_to_hundred(&[60, -5, 0]), vec![0, 0, 0]);
    }

    #[test]
    fn overflowing_recorded_counts_are_rejected() {
        let rep = |viables_num| TetrazolioRepetition {
            id: 1,
            numero: 1,
            viables_num,
            duras: 0,
            no_viables_num: 0,
        };
        assert_eq!(
            tetrazolio_percentages(&[rep(i64::MAX), rep(1)]),
            Err(ValidationError::CountTooLarge)
        );
        assert_eq!(round_to_hundred(&[i64::MAX / 2, i64::MAX / 2]), vec![50, 50]);
    }

    #[test]
    fn no_repetitions_is_an_error() {
        assert_eq!(germination_percentages(&[]), Err(ValidationError::NoRepetitions));
    }
}
