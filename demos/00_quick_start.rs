/// quick start - value a monthly plan as of a fixed day
use chrono::NaiveDate;
use recurring_valuation_rs::{
    calculate, InvestmentKind, InvestmentSnapshot, InvestmentType, Money, Rate, RecurringFrequency,
    RecurringPlan, Uuid,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // 1,000 a month at 6%, started in january
    let plan = RecurringPlan::new(Money::from_major(1_000), RecurringFrequency::Monthly, Rate::from_percentage(6));
    let start_date = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or("bad start date")?;
    let snapshot = InvestmentSnapshot {
        id: Uuid::new_v4(),
        name: "index fund sip".to_string(),
        investment_type: InvestmentType::Sip,
        start_date,
        kind: InvestmentKind::Recurring(plan),
    };

    let today = NaiveDate::from_ymd_opt(2023, 3, 20).ok_or("bad valuation date")?;
    let result = calculate(&snapshot, today).ok_or("investment is not recurring")?;

    for month in &result.monthly_breakdown {
        println!(
            "{}  +{}  interest {}  balance {}",
            month.month, month.contribution, month.interest, month.balance
        );
    }
    println!("\ninvested {} worth {} ({}%)", result.total_invested, result.current_value, result.profit_loss_percentage);

    Ok(())
}
