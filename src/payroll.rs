use serde::{Deserialize, Serialize};

use crate::{consts, entity::user};

/// One computed payslip, every currency line already rounded to whole pesos
/// so line-item sums match the displayed totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    pub overtime_hours: f64,
    pub overtime_pay: i64,
    pub gratification: i64,
    pub taxable_income: i64,
    pub non_taxable_income: i64,
    pub afp_amount: i64,
    pub health_amount: i64,
    pub unemployment_insurance_amount: i64,
    pub income_tax: i64,
    pub total_deductions: i64,
    pub net_salary: i64,
}

/// Computes an employee's monthly payslip from master data and the number of
/// attended days in the month.
pub fn compute_payroll(employee: &user::Model, present_days: u64) -> PayrollBreakdown {
    let base_salary = employee.salary as f64;

    let overtime_hours = present_days as f64 * consts::OVERTIME_HOURS_PER_DAY;
    let hourly_rate = base_salary / consts::STANDARD_MONTHLY_HOURS;
    let overtime_pay = (overtime_hours * hourly_rate * consts::OVERTIME_RATE_MULTIPLIER).round() as i64;

    let gratification_cap =
        consts::GRATIFICATION_CAP_FACTOR * consts::MINIMUM_MONTHLY_INCOME / 12.0;
    let gratification = (base_salary * consts::GRATIFICATION_RATE).min(gratification_cap).round() as i64;

    let taxable_income = employee.salary + gratification + overtime_pay;

    let afp_amount = (taxable_income as f64 * afp_rate(&employee.afp)).round() as i64;
    let health_amount = (taxable_income as f64 * consts::HEALTH_RATE).round() as i64;
    let unemployment_insurance_amount =
        (taxable_income as f64 * consts::UNEMPLOYMENT_INSURANCE_RATE).round() as i64;

    let tax_base = taxable_income - (afp_amount + health_amount + unemployment_insurance_amount);
    let income_tax = income_tax(tax_base);

    let non_taxable_income = employee.meal_allowance + employee.transport_allowance;
    let total_deductions = afp_amount + health_amount + unemployment_insurance_amount + income_tax;

    PayrollBreakdown {
        overtime_hours,
        overtime_pay,
        gratification,
        taxable_income,
        non_taxable_income,
        afp_amount,
        health_amount,
        unemployment_insurance_amount,
        income_tax,
        total_deductions,
        net_salary: taxable_income + non_taxable_income - total_deductions,
    }
}

/// Contribution rate for an AFP plan name, matched ignoring case and spaces
/// so "PLAN VITAL" and "PlanVital" both resolve.
pub fn afp_rate(plan: &str) -> f64 {
    let normalized: String = plan
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    consts::AFP_RATES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, rate)| *rate)
        .unwrap_or(consts::DEFAULT_AFP_RATE)
}

/// Progressive monthly income tax over the post-deduction taxable base.
/// Zero below the exempt threshold, clamped at zero after the bracket
/// deduction is applied.
pub fn income_tax(tax_base: i64) -> i64 {
    let bracket = consts::TAX_BRACKETS
        .iter()
        .find(|bracket| tax_base <= bracket.upper)
        .expect("bracket table ends with an open upper bound");

    let tax = (tax_base as f64 * bracket.rate - bracket.deduction).round() as i64;

    tax.max(0)
}
