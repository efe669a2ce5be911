/// record store - persisted records, validated config writes, portfolio valuation
use chrono::{NaiveDate, TimeZone, Utc};
use recurring_valuation_rs::store::{save_scheme_config, value_portfolio};
use recurring_valuation_rs::{
    InMemoryStore, InvestmentRecord, InvestmentSnapshot, InvestmentStore, InvestmentType, Money, MonthKey,
    RecurringFrequency, SchemeConfig, Uuid,
};

const RECORD: &str = r#"{
    "id": "6f1c1f7e-8a57-4d55-9a43-4d1f0a6f7c11",
    "name": "Quarterly RD",
    "type": "RECURRING_DEPOSIT",
    "isRecurring": true,
    "recurringAmount": "3000",
    "recurringFrequency": "QUARTERLY",
    "interestRate": "6.5",
    "startDate": "01/04/2023",
    "skippedMonths": ["2023-07"],
    "createdAt": "2023-04-01T00:00:00Z"
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    println!("=== record store example ===\n");

    let store = InMemoryStore::new();
    let deposit: InvestmentRecord = serde_json::from_str(RECORD)?;
    store.insert(deposit);

    let mut ppf = InvestmentRecord::simple(
        Uuid::new_v4(),
        "PPF",
        InvestmentType::Ppf,
        Utc.with_ymd_and_hms(2020, 4, 1, 0, 0, 0).unwrap(),
    );
    ppf.is_recurring = true;
    ppf.recurring_amount = Some(Money::from_major(150_000));
    ppf.recurring_frequency = Some(RecurringFrequency::Yearly);
    let ppf_id = ppf.id;
    store.insert(ppf);

    // a maturity inside the lock-in period is refused
    let opened = NaiveDate::from_ymd_opt(2020, 4, 1).ok_or("bad date")?;
    let mut short = SchemeConfig::provident_fund(opened);
    short.maturity_date = NaiveDate::from_ymd_opt(2025, 4, 1);
    if let Err(e) = save_scheme_config(&store, ppf_id, short) {
        println!("rejected: {}", e);
    }
    let config = SchemeConfig::provident_fund(opened).with_recurring(Money::from_major(12_500), MonthKey::new(2020, 4)?);
    save_scheme_config(&store, ppf_id, config)?;

    let today = NaiveDate::from_ymd_opt(2024, 6, 30).ok_or("bad date")?;
    for (id, result) in value_portfolio(&store, today)? {
        let snapshot = InvestmentSnapshot::try_from(store.get_investment(id)?)?;
        println!("{}: invested {} worth {}", snapshot.name, result.total_invested, result.current_value);
    }

    Ok(())
}
