use chrono::FixedOffset;

/// Civil timezone every wall-clock read is normalized to before deriving
/// date, weekday, or time-of-day (Chile, fixed offset).
pub fn company_tz() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

pub const STATUS_PRESENT: &str = "Present";

// Observation labels, as printed on attendance sheets
pub const OBS_TIME_IN_FAVOR: &str = "Tiempo a favor";
pub const OBS_LATE: &str = "Atraso";
pub const OBS_DISCOUNT: &str = "Descuento";
pub const OBS_WORKED_HOLIDAY: &str = "Feriado Trabajado";
pub const OBS_INCOMPLETE_SHIFT: &str = "Falta cumplir horario";
pub const OBS_OVERTIME: &str = "Hora Extra";
pub const OBS_PENDING_AUTHORIZATION: &str = "Horas Extras por Autorizar";

/// Minutes of lateness tolerated as "Atraso" before it becomes "Descuento".
pub const LATE_TOLERANCE_MINUTES: i32 = 60;

pub const VACATION_ALLOWANCE_DAYS: u32 = 15;

// ---- Payroll policy (Chilean payslip, monthly CLP) ----

pub const STANDARD_MONTHLY_HOURS: f64 = 160.0;
/// Placeholder heuristic: half an overtime hour per attended day.
pub const OVERTIME_HOURS_PER_DAY: f64 = 0.5;
pub const OVERTIME_RATE_MULTIPLIER: f64 = 1.5;

pub const GRATIFICATION_RATE: f64 = 0.25;
/// Ingreso mínimo mensual; caps gratification at 4.75 * IMM / 12.
pub const MINIMUM_MONTHLY_INCOME: f64 = 500_000.0;
pub const GRATIFICATION_CAP_FACTOR: f64 = 4.75;

pub const HEALTH_RATE: f64 = 0.07;
pub const UNEMPLOYMENT_INSURANCE_RATE: f64 = 0.006;

/// Employee contribution rate per AFP, 10% fund share plus commission.
/// Plan names are matched case-insensitively ignoring spaces.
pub const AFP_RATES: &[(&str, f64)] = &[
    ("CAPITAL", 0.1144),
    ("CUPRUM", 0.1144),
    ("HABITAT", 0.1127),
    ("MODELO", 0.1058),
    ("PLANVITAL", 0.1116),
    ("PROVIDA", 0.1145),
    ("UNO", 0.1049),
];
pub const DEFAULT_AFP_RATE: f64 = 0.1144;

pub struct TaxBracket {
    /// Upper bound of the bracket's taxable base, inclusive.
    pub upper: i64,
    pub rate: f64,
    pub deduction: f64,
}

/// Monthly Impuesto Único brackets, CLP at UTM ~66.000.
/// Tax for a base landing in a bracket is `base * rate - deduction`.
pub const TAX_BRACKETS: &[TaxBracket] = &[
    TaxBracket { upper: 891_000, rate: 0.0, deduction: 0.0 },
    TaxBracket { upper: 1_980_000, rate: 0.04, deduction: 35_640.0 },
    TaxBracket { upper: 3_300_000, rate: 0.08, deduction: 114_840.0 },
    TaxBracket { upper: 4_620_000, rate: 0.135, deduction: 296_340.0 },
    TaxBracket { upper: 5_940_000, rate: 0.23, deduction: 735_240.0 },
    TaxBracket { upper: 7_920_000, rate: 0.304, deduction: 1_174_800.0 },
    TaxBracket { upper: 20_460_000, rate: 0.35, deduction: 1_539_120.0 },
    TaxBracket { upper: i64::MAX, rate: 0.40, deduction: 2_562_120.0 },
];
