use clap::{Args, Parser, Subcommand, ValueEnum};

use permafolio_core::calculators::{Compounding, PositionSide, RateKind};

#[derive(Parser, Debug)]
#[command(name = "permafolio", version)]
#[command(about = "Permanent-portfolio allocation and personal finance calculators")]
pub struct Cli {
    /// Print the result as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Amounts are read as text: blank or unparseable values count as zero.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the permanent portfolio and split a new contribution
    Allocate(AllocateArgs),

    /// Margin, profit and return of a futures position
    Futures {
        #[arg(long, default_value = "1")]
        contract_size: String,
        #[arg(long, default_value = "1")]
        quantity: String,
        /// 0 means unleveraged
        #[arg(long, default_value = "1")]
        leverage: String,
        #[arg(long)]
        entry: String,
        #[arg(long)]
        exit: String,
        #[arg(long, value_enum, default_value_t = SideArg::Long)]
        side: SideArg,
    },

    /// Convert a quoted interest rate into every other quote
    Rates {
        value: String,
        #[arg(long, value_enum, default_value_t = RateKindArg::Annual)]
        kind: RateKindArg,
        #[arg(long, value_enum, default_value_t = CompoundingArg::Annual)]
        compounding: CompoundingArg,
        /// Inflation rate in percent
        #[arg(long, default_value = "0")]
        cpi: String,
    },

    /// Profit or loss of buying USDT and selling it back
    Usdt {
        #[arg(long)]
        buy_price: String,
        #[arg(long)]
        spend: String,
        #[arg(long)]
        sell_price: String,
        /// Network fee in USDT
        #[arg(long, default_value = "0")]
        fee: String,
    },

    /// Average cost after buying the same stock again
    Average {
        #[arg(long)]
        first_price: String,
        #[arg(long)]
        first_quantity: String,
        #[arg(long)]
        rebuy_price: String,
        #[arg(long)]
        rebuy_quantity: String,
        /// Commission per ten thousand
        #[arg(long, default_value = "0")]
        commission: String,
        /// Stamp duty in percent
        #[arg(long, default_value = "0")]
        stamp_duty: String,
        /// Transfer fee in percent
        #[arg(long, default_value = "0")]
        transfer_fee: String,
    },

    /// Household volatility index over twelve months
    Volatility {
        /// Twelve comma-separated monthly incomes
        #[arg(long, value_delimiter = ',', required = true)]
        income: Vec<String>,
        /// Twelve comma-separated monthly expenses
        #[arg(long, value_delimiter = ',', required = true)]
        expense: Vec<String>,
        /// Twelve comma-separated monthly savings; defaults to income minus expense
        #[arg(long, value_delimiter = ',')]
        savings: Vec<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct AllocateArgs {
    #[arg(long, default_value = "")]
    pub reverse_repo: String,
    #[arg(long, default_value = "")]
    pub sp500: String,
    #[arg(long, default_value = "")]
    pub cash_flow: String,
    #[arg(long, default_value = "")]
    pub treasury: String,
    #[arg(long, default_value = "")]
    pub gold: String,
    /// Portfolio size used while nothing is held; defaults to the settings value
    #[arg(long)]
    pub nominal_total: Option<String>,
    /// New money to split by the target ratios
    #[arg(long, default_value = "")]
    pub contribution: String,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    Long,
    Short,
}

impl From<SideArg> for PositionSide {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Long => PositionSide::Long,
            SideArg::Short => PositionSide::Short,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RateKindArg {
    Annual,
    Monthly,
    Daily,
    SevenDay,
    #[value(name = "income-per-10k")]
    IncomePer10k,
    ReverseRepo,
}

impl From<RateKindArg> for RateKind {
    fn from(kind: RateKindArg) -> Self {
        match kind {
            RateKindArg::Annual => RateKind::Annual,
            RateKindArg::Monthly => RateKind::Monthly,
            RateKindArg::Daily => RateKind::Daily,
            RateKindArg::SevenDay => RateKind::SevenDayYield,
            RateKindArg::IncomePer10k => RateKind::IncomePerTenThousand,
            RateKindArg::ReverseRepo => RateKind::ReverseRepoYield,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CompoundingArg {
    Annual,
    SemiAnnual,
    Quarterly,
    Monthly,
    Daily,
}

impl From<CompoundingArg> for Compounding {
    fn from(compounding: CompoundingArg) -> Self {
        match compounding {
            CompoundingArg::Annual => Compounding::Annual,
            CompoundingArg::SemiAnnual => Compounding::SemiAnnual,
            CompoundingArg::Quarterly => Compounding::Quarterly,
            CompoundingArg::Monthly => Compounding::Monthly,
            CompoundingArg::Daily => Compounding::Daily,
        }
    }
}
