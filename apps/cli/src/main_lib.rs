use anyhow::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use permafolio_core::{
    allocation::{
        render_advice, AllocationEngine, AllocationEngineTrait, AllocationSnapshot, AssetBucket,
        BucketValues,
    },
    calculators::{
        calculate_cost_average, calculate_futures, calculate_usdt_round_trip,
        calculate_volatility, convert_rate, CostAverageInput, FuturesPosition, MonthlyCashFlow,
        RateInput, TradeResult, UsdtRoundTrip,
    },
    constants::CALCULATION_SCALE,
    errors::ValidationError,
    settings::{Settings, SettingsUpdate},
    utils::decimal_utils::{format_decimal, parse_decimal_or_zero},
};

use crate::cli::{AllocateArgs, Cli, Command};
use crate::config::Config;

/// Logs go to stderr; stdout carries only the command output.
pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Reads the settings file if one is configured, then applies env overrides.
pub fn load_settings(config: &Config) -> anyhow::Result<Settings> {
    let settings = match &config.settings_file {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?,
        None => Settings::default(),
    };
    let update = SettingsUpdate {
        currency_unit: config.currency_unit.clone(),
        ..Default::default()
    };
    Ok(settings.apply(&update)?)
}

/// Lenient number: blank or unparseable text is zero.
fn number(input: &str) -> Decimal {
    parse_decimal_or_zero(input, CALCULATION_SCALE)
}

/// Lenient amount that must not be negative.
fn amount(field: &str, input: &str) -> anyhow::Result<Decimal> {
    let value = number(input);
    if value.is_sign_negative() {
        tracing::warn!("Rejected negative amount {} for {}", value, field);
        return Err(ValidationError::NegativeAmount {
            field: field.to_string(),
        }
        .into());
    }
    Ok(value)
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Runs one subcommand and returns what should be printed.
pub fn run(cli: Cli, settings: &Settings) -> anyhow::Result<String> {
    let json = cli.json;
    match cli.command {
        Command::Allocate(args) => run_allocate(&args, settings, json),
        Command::Futures {
            contract_size,
            quantity,
            leverage,
            entry,
            exit,
            side,
        } => {
            let position = FuturesPosition {
                contract_size: number(&contract_size),
                quantity: number(&quantity),
                leverage: number(&leverage),
                entry_price: number(&entry),
                exit_price: number(&exit),
                side: side.into(),
            };
            let outcome = calculate_futures(&position);
            if json {
                return to_json(&outcome);
            }
            Ok(format!(
                "Margin: {}\nProfit: {}\nReturn on margin: {}%\n",
                format_decimal(outcome.margin, settings.money_scale),
                format_decimal(outcome.profit, settings.money_scale),
                format_decimal(outcome.roi_percent, settings.percent_scale)
            ))
        }
        Command::Rates {
            value,
            kind,
            compounding,
            cpi,
        } => {
            let input = RateInput {
                kind: kind.into(),
                value: number(&value),
                compounding: compounding.into(),
                cpi_percent: number(&cpi),
            };
            let rates = convert_rate(&input)?;
            if json {
                return to_json(&rates);
            }
            Ok(format!(
                "Effective annual rate: {}%\nMonthly rate: {}%\nDaily rate: {}%\n\
                 7-day annualised yield: {}%\nIncome per 10 000: {}\nReal annual rate: {}%\n",
                format_decimal(rates.effective_annual, 4),
                format_decimal(rates.monthly, 4),
                format_decimal(rates.daily, 6),
                format_decimal(rates.seven_day_yield, 4),
                format_decimal(rates.income_per_ten_thousand, 4),
                format_decimal(rates.real_annual, 4)
            ))
        }
        Command::Usdt {
            buy_price,
            spend,
            sell_price,
            fee,
        } => {
            let trip = UsdtRoundTrip {
                buy_price: number(&buy_price),
                spend_amount: number(&spend),
                sell_price: number(&sell_price),
                network_fee: number(&fee),
            };
            let outcome = calculate_usdt_round_trip(&trip)?;
            if json {
                return to_json(&outcome);
            }
            let verdict = match outcome.result {
                TradeResult::Profit => "Profit",
                TradeResult::Loss => "Loss",
                TradeResult::BreakEven => "Break-even",
            };
            Ok(format!(
                "USDT bought: {}\n{}: {} {}\n",
                format_decimal(outcome.quantity, 2),
                verdict,
                format_decimal(outcome.pnl.abs(), 2),
                settings.currency_unit
            ))
        }
        Command::Average {
            first_price,
            first_quantity,
            rebuy_price,
            rebuy_quantity,
            commission,
            stamp_duty,
            transfer_fee,
        } => {
            let input = CostAverageInput {
                first_price: number(&first_price),
                first_quantity: number(&first_quantity),
                rebuy_price: number(&rebuy_price),
                rebuy_quantity: number(&rebuy_quantity),
                commission_per_ten_thousand: number(&commission),
                stamp_duty_percent: number(&stamp_duty),
                transfer_fee_percent: number(&transfer_fee),
            };
            let outcome = calculate_cost_average(&input)?;
            if json {
                return to_json(&outcome);
            }
            Ok(format!(
                "Total quantity: {}\nCost per share: {} {}\nProfit at rebuy price: {} {}\n",
                outcome.total_quantity.normalize(),
                format_decimal(outcome.cost_per_share, 4),
                settings.currency_unit,
                format_decimal(outcome.current_profit, 2),
                settings.currency_unit
            ))
        }
        Command::Volatility {
            income,
            expense,
            savings,
        } => {
            let months = monthly_cash_flows(&income, &expense, &savings)?;
            let report = calculate_volatility(&months)?;
            if json {
                return to_json(&report);
            }
            Ok(format!(
                "Income volatility (Iv): {}\nExpense volatility (Cv): {}\nSavings buffer (Sb): {}\n\
                 Volatility index (E): {}\nSavings coefficient (S): {}\nTier: {}\n",
                format_decimal(report.income_volatility, 4),
                format_decimal(report.expense_volatility, 4),
                format_decimal(report.savings_buffer, 4),
                format_decimal(report.index, 4),
                format_decimal(report.savings_coefficient, 4),
                report.tier
            ))
        }
    }
}

fn run_allocate(args: &AllocateArgs, settings: &Settings, json: bool) -> anyhow::Result<String> {
    let mut holdings = BucketValues::default();
    for (bucket, raw) in [
        (AssetBucket::ReverseRepo, &args.reverse_repo),
        (AssetBucket::Sp500Etf, &args.sp500),
        (AssetBucket::CashFlowEtf, &args.cash_flow),
        (AssetBucket::Treasury10y, &args.treasury),
        (AssetBucket::GoldEtf, &args.gold),
    ] {
        holdings.set(bucket, amount(bucket.as_str(), raw)?);
    }
    let nominal_total = match &args.nominal_total {
        Some(raw) => amount("nominalTotal", raw)?,
        None => settings.default_nominal_total,
    };
    let contribution = amount("contribution", &args.contribution)?;

    let engine = AllocationEngine::permanent_portfolio()?;
    let report = engine.evaluate(
        &AllocationSnapshot::new(holdings, nominal_total),
        contribution,
    );
    tracing::info!(
        "Evaluated portfolio of {}: rebalancing needed = {}",
        report.effective_total,
        report.needs_rebalancing()
    );

    if json {
        return to_json(&report);
    }
    Ok(render_advice(&report, settings))
}

fn monthly_cash_flows(
    income: &[String],
    expense: &[String],
    savings: &[String],
) -> anyhow::Result<Vec<MonthlyCashFlow>> {
    if income.len() != expense.len() {
        return Err(ValidationError::InvalidInput(format!(
            "got {} incomes but {} expenses",
            income.len(),
            expense.len()
        ))
        .into());
    }
    if !savings.is_empty() && savings.len() != income.len() {
        return Err(ValidationError::InvalidInput(format!(
            "got {} savings for {} months",
            savings.len(),
            income.len()
        ))
        .into());
    }
    Ok(income
        .iter()
        .zip(expense)
        .enumerate()
        .map(|(i, (inc, exp))| MonthlyCashFlow {
            income: number(inc),
            expense: number(exp),
            savings: savings.get(i).map(|s| number(s)),
        })
        .collect())
}
