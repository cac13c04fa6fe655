/// quick start - register a student, open this month's period and take a payment
use dojo_billing_rs::chrono::Days;
use dojo_billing_rs::{
    BillingMonth, Money, Period, PersonalDetails, SafeTimeProvider, School, SchoolConfig,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let time = SafeTimeProvider::new(TimeSource::System);
    let today = time.now().date_naive();
    let month = BillingMonth::of(today);

    let mut school = School::in_memory(SchoolConfig::development())?;

    let student = school.register_student(PersonalDetails::new("Ana Paz", "30.123.456"), today, &time)?;

    let period = school.register_period(
        Period::builder()
            .name(format!("fee {}", month))
            .start_date(month.first_day())
            .end_date(month.last_day())
            .due_date(month.first_day() + Days::new(9))
            .base_amount(Money::from_major(15_000))
            .surcharge_amount(Money::from_major(2_000)),
        &time,
    )?;

    // pay part of the fee now
    let receipt = school.record_payment_now(student.id, period.id, Money::from_major(10_000), "cash")?;

    println!("paid {} of {}", receipt.paid_after(), receipt.assessment.total_due);
    println!("still owed: {}", receipt.outstanding_after());
    println!("state: {:?}", receipt.state_after);

    Ok(())
}
