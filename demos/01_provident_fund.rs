/// provident fund - annual crediting with controlled time
use chrono::{Duration, TimeZone, Utc};
use recurring_valuation_rs::{
    DepositEntry, InvestmentKind, InvestmentSnapshot, InvestmentType, Money, MonthKey, Rate,
    RecurringFrequency, RecurringPlan, SafeTimeProvider, SchemeConfig, TimeSource, Uuid, ValuationEngine,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== provident fund example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 4, 20, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let engine = ValuationEngine::new(&time);

    let opened = engine.today();
    let next_month = MonthKey::from_date(opened).succ_opt().ok_or("month overflow")?;
    let config = SchemeConfig::provident_fund(opened)
        .with_deposit(DepositEntry::manual(opened, Money::from_major(50_000)))
        .with_recurring(Money::from_major(5_000), next_month);

    let snapshot = InvestmentSnapshot {
        id: Uuid::new_v4(),
        name: "ppf".to_string(),
        investment_type: InvestmentType::Ppf,
        start_date: opened,
        kind: InvestmentKind::SchemeGoverned {
            plan: RecurringPlan::new(Money::ZERO, RecurringFrequency::Yearly, Rate::ZERO),
            annual_limit: None,
            config: Some(config),
        },
    };

    for _ in 0..3 {
        controller.advance(Duration::days(180));
        let result = engine.calculate_current_value(&snapshot).ok_or("not a scheme investment")?;
        let scheme = result.scheme.as_ref().ok_or("missing scheme summary")?;

        println!("as of {}", engine.today());
        println!("  invested:          {}", result.total_invested);
        println!("  value:             {}", result.current_value);
        println!("  credited interest: {}", scheme.credited_interest);
        println!("  accrued interest:  {}", scheme.accrued_interest);
        println!("  limit remaining:   {}", scheme.annual_limit_remaining);
        if let Some(projected) = result.projected_maturity_value {
            println!("  at maturity:       {}", projected);
        }
    }

    Ok(())
}
