//! Arithmetic cross-checks between itemized bookings and declared totals.

use rust_decimal::Decimal;
use stan_core::{Statement, within_tolerance};

use crate::error::{ParseError, SummaryKind};
use crate::scanner::Draft;

/// Check `draft` and turn it into the final statement.
pub fn reconcile(draft: Draft, filename: &str, locale: &str, currency: &str) -> Result<Statement, ParseError> {
    check(&draft)?;

    Ok(Statement {
        filename: filename.to_string(),
        locale: locale.to_string(),
        currency: currency.to_string(),
        bank_id: draft.bic,
        account_id: draft.iban,
        from_date: draft.from_date,
        to_date: draft.to_date,
        balance_old: draft.balance_old,
        balance_new: draft.balance_new,
        sum_in: draft.sum_in,
        sum_out: draft.sum_out,
        bookings: draft.bookings,
    })
}

pub fn check(draft: &Draft) -> Result<(), ParseError> {
    if draft.from_date > draft.to_date {
        return Err(ParseError::InvalidPeriod {
            from: draft.from_date,
            to: draft.to_date,
        });
    }

    let (calc_in, calc_out) = draft.bookings.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(calc_in, calc_out), item| {
            if item.amount > Decimal::ZERO {
                (calc_in + item.amount, calc_out)
            } else {
                (calc_in, calc_out + item.amount)
            }
        },
    );

    if !within_tolerance(calc_in, draft.sum_in) {
        return Err(ParseError::SummaryMismatch {
            kind: SummaryKind::Incoming,
            declared: draft.sum_in,
            calculated: calc_in,
        });
    }

    if !within_tolerance(calc_out, draft.sum_out) {
        return Err(ParseError::SummaryMismatch {
            kind: SummaryKind::Outgoing,
            declared: draft.sum_out,
            calculated: calc_out,
        });
    }

    let balance_calc = draft.balance_old + draft.sum_in + draft.sum_out;
    if !within_tolerance(balance_calc, draft.balance_new) {
        return Err(ParseError::BalanceMismatch {
            balance_old: draft.balance_old,
            sum_in: draft.sum_in,
            sum_out: draft.sum_out,
            balance_new: draft.balance_new,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use stan_core::BookingItem;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn draft(amounts: &[i64], old: i64, sum_in: i64, sum_out: i64, new: i64) -> Draft {
        let date = NaiveDate::from_ymd_opt(2017, 3, 1).unwrap();
        Draft {
            from_date: date,
            to_date: NaiveDate::from_ymd_opt(2017, 3, 31).unwrap(),
            iban: "DE12345678901234567890".to_string(),
            bic: "PBNKDEFFXXX".to_string(),
            sum_in: dec(sum_in),
            sum_out: dec(sum_out),
            balance_old: dec(old),
            balance_new: dec(new),
            bookings: amounts
                .iter()
                .map(|&a| BookingItem::new(date, date, "x", dec(a)))
                .collect(),
        }
    }

    #[test]
    fn test_consistent_draft_becomes_statement() {
        let st = reconcile(draft(&[100000, -5000], 0, 100000, -5000, 95000), "a.txt", "de-DE", "EUR").unwrap();
        assert_eq!(st.bank_id, "PBNKDEFFXXX");
        assert_eq!(st.account_id, "DE12345678901234567890");
        assert_eq!(st.bookings.len(), 2);
        assert_eq!(st.filename, "a.txt");
    }

    #[test]
    fn test_generated_consistent_drafts_pass() {
        for seed in 1..50i64 {
            let amounts: Vec<i64> = (0..seed % 7).map(|i| (seed * 37 + i * 101) % 5000 - 2500).collect();
            let sum_in: i64 = amounts.iter().filter(|&&a| a > 0).sum();
            let sum_out: i64 = amounts.iter().filter(|&&a| a <= 0).sum();
            let old = seed * 1000 - 20000;
            assert_eq!(check(&draft(&amounts, old, sum_in, sum_out, old + sum_in + sum_out)), Ok(()));
        }
    }

    #[test]
    fn test_zero_outgoing_total_is_accepted() {
        assert_eq!(check(&draft(&[500, 0], 100, 500, 0, 600)), Ok(()));
        assert_eq!(check(&draft(&[], 100, 0, 0, 100)), Ok(()));
    }

    #[test]
    fn test_perturbed_incoming_total_is_rejected() {
        assert!(matches!(
            check(&draft(&[100000, -5000], 0, 100002, -5000, 95002)),
            Err(ParseError::SummaryMismatch {
                kind: SummaryKind::Incoming,
                ..
            })
        ));
    }

    #[test]
    fn test_perturbed_outgoing_total_is_rejected() {
        assert!(matches!(
            check(&draft(&[100000, -5000], 0, 100000, -5002, 94998)),
            Err(ParseError::SummaryMismatch {
                kind: SummaryKind::Outgoing,
                ..
            })
        ));
    }

    #[test]
    fn test_perturbed_balance_is_rejected() {
        assert!(matches!(
            check(&draft(&[100000, -5000], 0, 100000, -5000, 95002)),
            Err(ParseError::BalanceMismatch { .. })
        ));
        assert!(matches!(
            check(&draft(&[100000, -5000], 2, 100000, -5000, 95000)),
            Err(ParseError::BalanceMismatch { .. })
        ));
    }

    #[test]
    fn test_reversed_period_is_rejected() {
        let mut d = draft(&[], 0, 0, 0, 0);
        std::mem::swap(&mut d.from_date, &mut d.to_date);
        assert!(matches!(check(&d), Err(ParseError::InvalidPeriod { .. })));
    }
}
