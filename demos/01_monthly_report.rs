/// monthly report - a month of payments under a controlled clock
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use dojo_billing_rs::{
    BillingMonth, Money, Period, PersonalDetails, SafeTimeProvider, School, SchoolConfig,
    TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== monthly report example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let date = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();

    let mut school = School::in_memory(SchoolConfig::development())?;

    let ana = school.register_student(PersonalDetails::new("Ana Paz", "30123456"), date(2, 1), &time)?;
    let bruno = school.register_student(PersonalDetails::new("Bruno Díaz", "28999111"), date(2, 1), &time)?;
    let carla = school.register_student(PersonalDetails::new("Carla Gómez", "35111222"), date(2, 1), &time)?;

    let march = school.register_period(
        Period::builder()
            .name("March 2024")
            .start_date(date(3, 1))
            .end_date(date(3, 31))
            .due_date(date(3, 10))
            .base_amount(Money::from_major(100))
            .surcharge_amount(Money::from_major(20)),
        &time,
    )?;

    controller.advance(Duration::days(4));
    school.record_payment(ana.id, march.id, Money::from_major(100), "cash", &time)?;
    school.record_payment(bruno.id, march.id, Money::from_major(50), "transfer", &time)?;

    // past the due date
    controller.advance(Duration::days(10));
    println!("today: {}", time.now().format("%Y-%m-%d"));
    let late = school.record_payment(bruno.id, march.id, Money::from_major(70), "cash", &time)?;
    println!("bruno's second installment surcharged: {}", late.surcharge_applied());

    println!("\ndebtors:");
    for debtor in school.debtors_for_current_period(&time) {
        println!("  {} owes {}", debtor.student.name(), debtor.amount_owed);
    }

    let month = BillingMonth::new(2024, 3).ok_or("bad month")?;
    if school.students_without_payment_in_month(month).iter().any(|s| s.id == carla.id) {
        println!("  {} has not paid anything this month", carla.name());
    }

    let report = school.monthly_report(month);
    println!("\n{}", report.to_json_pretty()?);

    println!("\nevents:");
    for event in school.take_events() {
        println!("  {:?}", event);
    }

    Ok(())
}
