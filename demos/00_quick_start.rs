/// quick start - derive what is owed on one installment
use loan_repayment_rs::{
    compute_loan_metrics, compute_schedule_metrics, select_display_metrics,
    validate_payment_amount, EngineConfig, PaymentMode, ScheduleItem,
};
use chrono::NaiveDate;

const BODY: &str = r#"{
    "success": true,
    "data": {
        "id": "sch-1", "loanId": "ln-1", "sequence": 1,
        "dueDate": "2024-05-15",
        "totalDue": "5000.00", "paidAmount": "2000.00", "status": "PARTIAL",
        "loan": {"id": "ln-1", "loanNumber": "LN-0001", "principalAmount": "100000", "status": "ACTIVE"}
    }
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = EngineConfig::default();
    let item = ScheduleItem::from_response(BODY)?;
    let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();

    let schedule = compute_schedule_metrics(&item, today, &config.calendar);
    let loan = compute_loan_metrics(&item, None);
    let display = select_display_metrics(PaymentMode::DueToday, &schedule, &loan);

    println!("left on installment: {}", schedule.total_left_to_pay.format(&config.currency));
    println!("due today:           {}", schedule.due_today.format(&config.currency));
    println!("loan outstanding:    {} (estimate)", loan.total_left_to_pay.format(&config.currency));

    match validate_payment_amount("3500", &display, &config.currency) {
        Ok(amount) => println!("accepted {}", amount),
        Err(e) => println!("rejected: {}", e),
    }

    Ok(())
}
