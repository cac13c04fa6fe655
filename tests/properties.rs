use chrono::{Duration, NaiveDate};
use dojo_billing_rs::{
    DebtorEnumerator, FeeCalculator, Money, Payment, PaymentAccumulator, PaymentId, PaymentState,
    Period, PeriodId, PersonalDetails, Student, StudentId,
};
use proptest::prelude::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn period(base_cents: i64, surcharge_cents: i64) -> Period {
    Period {
        id: PeriodId(1),
        name: "March 2024".to_string(),
        start_date: date(2024, 3, 1),
        end_date: date(2024, 3, 31),
        due_date: date(2024, 3, 10),
        base_amount: Money::from_cents(base_cents),
        surcharge_amount: Money::from_cents(surcharge_cents),
    }
}

fn roster(size: usize) -> Vec<Student> {
    (1..=size as i64)
        .map(|id| {
            let mut s = Student::new(
                PersonalDetails::new(format!("Student {}", id), format!("{}", 30_000_000 + id)),
                date(2024, 1, 1),
            );
            s.id = StudentId(id);
            s
        })
        .collect()
}

fn payments(amounts: &[i64], students: &[usize], periods: &[usize]) -> Vec<Payment> {
    amounts
        .iter()
        .zip(students)
        .zip(periods)
        .enumerate()
        .map(|(i, ((amount, student), period))| Payment {
            id: PaymentId(i as i64 + 1),
            student_id: StudentId(*student as i64),
            period_id: PeriodId(*period as i64),
            payment_date: date(2024, 3, 5),
            amount: Money::from_cents(*amount),
            method: "cash".to_string(),
        })
        .collect()
}

proptest! {
    #[test]
    fn amount_paid_ignores_order(
        amounts in prop::collection::vec(1i64..=50_000, 0..=20),
        students in prop::collection::vec(1usize..=3, 0..=20),
        periods in prop::collection::vec(1usize..=2, 0..=20),
        rotation in 0usize..=20,
    ) {
        let forward = payments(&amounts, &students, &periods);
        let mut shuffled = forward.clone();
        shuffled.reverse();
        if !shuffled.is_empty() {
            let by = rotation % shuffled.len();
            shuffled.rotate_left(by);
        }

        for student in 1..=3 {
            for period in 1..=2 {
                prop_assert_eq!(
                    PaymentAccumulator::amount_paid(&forward, StudentId(student), PeriodId(period)),
                    PaymentAccumulator::amount_paid(&shuffled, StudentId(student), PeriodId(period))
                );
            }
        }
    }
}

proptest! {
    #[test]
    fn classify_is_a_partition(due in 0i64..=100_000, paid in 0i64..=200_000) {
        let due = Money::from_cents(due);
        let paid = Money::from_cents(paid);

        let expected = if paid == due {
            PaymentState::Complete
        } else if paid > due {
            PaymentState::Overpaid
        } else if paid.is_zero() {
            PaymentState::None
        } else {
            PaymentState::Partial
        };
        prop_assert_eq!(PaymentAccumulator::classify(due, paid), expected);
    }
}

proptest! {
    #[test]
    fn surcharge_only_after_due_date(
        base in 1i64..=100_000,
        surcharge in 0i64..=50_000,
        offset in -40i64..=40,
    ) {
        let p = period(base, surcharge);
        let evaluated_on = p.due_date + Duration::days(offset);
        let assessment = FeeCalculator::amount_due(&p, evaluated_on);

        prop_assert_eq!(assessment.surcharge_applied, offset > 0);
        let expected = if offset > 0 { p.base_amount + p.surcharge_amount } else { p.base_amount };
        prop_assert_eq!(assessment.total_due, expected);
        prop_assert!(assessment.total_due >= p.base_amount);
    }
}

proptest! {
    #[test]
    fn debtors_owe_exactly_the_shortfall(
        amounts in prop::collection::vec(1i64..=30_000, 0..=25),
        students in prop::collection::vec(1usize..=6, 0..=25),
        periods in prop::collection::vec(1usize..=2, 0..=25),
        base in 0i64..=40_000,
        surcharge in 0i64..=10_000,
        day in 1u32..=31,
    ) {
        let p = period(base, surcharge);
        let roster = roster(5);
        let history = payments(&amounts, &students, &periods);
        let today = date(2024, 3, day);

        let debtors = DebtorEnumerator::debtors_for_period(&p, &roster, &history, today);
        let due = FeeCalculator::amount_due(&p, today).total_due;

        for student in &roster {
            let paid = PaymentAccumulator::amount_paid(&history, student.id, p.id);
            let listed = debtors.iter().find(|d| d.student.id == student.id);
            match PaymentAccumulator::classify(due, paid) {
                PaymentState::None | PaymentState::Partial => {
                    let debtor = listed.expect("short payer must be listed");
                    prop_assert_eq!(debtor.amount_owed, due - paid);
                    prop_assert!(debtor.amount_owed.is_positive());
                }
                PaymentState::Complete | PaymentState::Overpaid => prop_assert!(listed.is_none()),
            }
        }

        // debtors come out in roster order
        let ids: Vec<StudentId> = debtors.iter().map(|d| d.student.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        prop_assert_eq!(ids, sorted);
    }
}

proptest! {
    #[test]
    fn enumeration_is_idempotent(
        amounts in prop::collection::vec(1i64..=30_000, 0..=15),
        students in prop::collection::vec(1usize..=4, 0..=15),
        periods in prop::collection::vec(1usize..=2, 0..=15),
    ) {
        let p = period(10_000, 2_000);
        let roster = roster(4);
        let history = payments(&amounts, &students, &periods);
        let today = date(2024, 3, 20);

        let first = DebtorEnumerator::debtors_for_period(&p, &roster, &history, today);
        let second = DebtorEnumerator::debtors_for_period(&p, &roster, &history, today);
        prop_assert_eq!(first, second);
    }
}
