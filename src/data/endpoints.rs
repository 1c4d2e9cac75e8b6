//! Static table of every supported Alpha Vantage function.
//!
//! Each descriptor lists the parameters upstream requires, the optional ones
//! (with the default sent when the caller leaves them out) and the body
//! formats the function can return.

use super::ResponseFormat;

/// Where a function is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    /// `https://www.alphavantage.co/query?function=...`
    Query,
    /// The analytics host; the path is appended to the analytics base URL and
    /// no `function` parameter is sent.
    Analytics(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalParam {
    pub name: &'static str,
    pub default: Option<&'static str>,
}

const fn opt(name: &'static str) -> OptionalParam {
    OptionalParam {
        name,
        default: None,
    }
}

const fn def(name: &'static str, value: &'static str) -> OptionalParam {
    OptionalParam {
        name,
        default: Some(value),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub function: &'static str,
    pub host: Host,
    pub required: &'static [&'static str],
    pub optional: &'static [OptionalParam],
    pub formats: &'static [ResponseFormat],
    /// Upper bound on comma-separated entries in the `symbol` parameter.
    pub max_symbols: Option<usize>,
}

impl EndpointDescriptor {
    const fn new(
        function: &'static str,
        required: &'static [&'static str],
        optional: &'static [OptionalParam],
        formats: &'static [ResponseFormat],
    ) -> Self {
        Self {
            function,
            host: Host::Query,
            required,
            optional,
            formats,
            max_symbols: None,
        }
    }

    pub fn supports(&self, format: ResponseFormat) -> bool {
        self.formats.contains(&format)
    }

    /// `datatype` is only meaningful when upstream can answer in either format.
    pub fn sends_datatype(&self) -> bool {
        self.formats.len() > 1
    }

    pub fn is_known_param(&self, name: &str) -> bool {
        self.required.contains(&name) || self.optional.iter().any(|p| p.name == name)
    }
}

const BOTH: &[ResponseFormat] = &[ResponseFormat::Csv, ResponseFormat::Json];
const JSON: &[ResponseFormat] = &[ResponseFormat::Json];
const CSV: &[ResponseFormat] = &[ResponseFormat::Csv];

const SYMBOL: &[&str] = &["symbol"];
const FX_PAIR: &[&str] = &["from_symbol", "to_symbol"];
const CRYPTO_PAIR: &[&str] = &["symbol", "market"];
const ANALYTICS_REQUIRED: &[&str] = &["SYMBOLS", "RANGE", "CALCULATIONS"];

const MONTHLY: &[OptionalParam] = &[def("interval", "monthly")];

const MOVING_AVERAGE: &[OptionalParam] = &[
    def("interval", "weekly"),
    def("time_period", "10"),
    def("series_type", "open"),
    opt("month"),
];
const DAILY_ONLY: &[OptionalParam] = &[def("interval", "daily"), opt("month")];
const DAILY_14: &[OptionalParam] = &[def("interval", "daily"), def("time_period", "14"), opt("month")];
const DAILY_10: &[OptionalParam] = &[def("interval", "daily"), def("time_period", "10"), opt("month")];
const DAILY_10_CLOSE: &[OptionalParam] = &[
    def("interval", "daily"),
    def("time_period", "10"),
    def("series_type", "close"),
    opt("month"),
];
const DAILY_CLOSE: &[OptionalParam] = &[
    def("interval", "daily"),
    def("series_type", "close"),
    opt("month"),
];
const WEEKLY_CLOSE: &[OptionalParam] = &[
    def("interval", "weekly"),
    def("series_type", "close"),
    opt("month"),
];
const PRICE_OSCILLATOR: &[OptionalParam] = &[
    def("interval", "daily"),
    def("series_type", "close"),
    def("fastperiod", "12"),
    def("slowperiod", "26"),
    def("matype", "0"),
    opt("month"),
];

pub static ENDPOINTS: &[EndpointDescriptor] = &[
    // Core stock time series
    EndpointDescriptor::new(
        "TIME_SERIES_INTRADAY",
        &["symbol", "interval"],
        &[
            def("adjusted", "true"),
            def("extended_hours", "true"),
            def("outputsize", "full"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new("TIME_SERIES_DAILY", SYMBOL, &[def("outputsize", "full")], BOTH),
    EndpointDescriptor::new("TIME_SERIES_DAILY_ADJUSTED", SYMBOL, &[def("outputsize", "full")], BOTH),
    EndpointDescriptor::new("TIME_SERIES_WEEKLY", SYMBOL, &[], BOTH),
    EndpointDescriptor::new("TIME_SERIES_WEEKLY_ADJUSTED", SYMBOL, &[], BOTH),
    EndpointDescriptor::new("TIME_SERIES_MONTHLY", SYMBOL, &[], BOTH),
    EndpointDescriptor::new("TIME_SERIES_MONTHLY_ADJUSTED", SYMBOL, &[], BOTH),
    EndpointDescriptor {
        max_symbols: Some(100),
        ..EndpointDescriptor::new("REALTIME_BULK_QUOTES", SYMBOL, &[], JSON)
    },
    EndpointDescriptor::new("SYMBOL_SEARCH", &["keywords"], &[], BOTH),
    EndpointDescriptor::new("MARKET_STATUS", &[], &[], JSON),
    // Options and market intelligence
    EndpointDescriptor::new("REALTIME_OPTIONS", SYMBOL, &[opt("contract")], BOTH),
    EndpointDescriptor::new("HISTORICAL_OPTIONS", SYMBOL, &[opt("date")], BOTH),
    EndpointDescriptor::new(
        "NEWS_SENTIMENT",
        &[],
        &[
            opt("tickers"),
            opt("topics"),
            opt("time_from"),
            opt("time_to"),
            def("sort", "LATEST"),
            opt("limit"),
        ],
        JSON,
    ),
    EndpointDescriptor::new("TOP_GAINERS_LOSERS", &[], &[], JSON),
    EndpointDescriptor::new("INSIDER_TRANSACTIONS", SYMBOL, &[], JSON),
    EndpointDescriptor {
        host: Host::Analytics("analytics"),
        ..EndpointDescriptor::new(
            "ANALYTICS_FIXED_WINDOW",
            ANALYTICS_REQUIRED,
            &[def("OHLC", "close"), def("INTERVAL", "DAILY")],
            JSON,
        )
    },
    EndpointDescriptor {
        host: Host::Analytics("running_analytics"),
        ..EndpointDescriptor::new(
            "ANALYTICS_SLIDING_WINDOW",
            ANALYTICS_REQUIRED,
            &[
                def("OHLC", "close"),
                def("INTERVAL", "DAILY"),
                def("WINDOW_SIZE", "20"),
            ],
            JSON,
        )
    },
    // Fundamentals
    EndpointDescriptor::new("OVERVIEW", SYMBOL, &[], JSON),
    EndpointDescriptor::new("ETF_PROFILE", SYMBOL, &[], JSON),
    EndpointDescriptor::new("DIVIDENDS", SYMBOL, &[], JSON),
    EndpointDescriptor::new("SPLITS", SYMBOL, &[], JSON),
    EndpointDescriptor::new("INCOME_STATEMENT", SYMBOL, &[], JSON),
    EndpointDescriptor::new("BALANCE_SHEET", SYMBOL, &[], JSON),
    EndpointDescriptor::new("CASH_FLOW", SYMBOL, &[], JSON),
    EndpointDescriptor::new("EARNINGS", SYMBOL, &[], JSON),
    EndpointDescriptor::new("LISTING_STATUS", &[], &[opt("date"), opt("state")], CSV),
    EndpointDescriptor::new(
        "EARNINGS_CALENDAR",
        &[],
        &[opt("symbol"), def("horizon", "3month")],
        CSV,
    ),
    EndpointDescriptor::new("IPO_CALENDAR", &[], &[], CSV),
    // Forex
    EndpointDescriptor::new(
        "CURRENCY_EXCHANGE_RATE",
        &["from_currency", "to_currency"],
        &[],
        JSON,
    ),
    EndpointDescriptor::new(
        "FX_INTRADAY",
        &["from_symbol", "to_symbol", "interval"],
        &[def("outputsize", "full")],
        BOTH,
    ),
    EndpointDescriptor::new("FX_DAILY", FX_PAIR, &[opt("outputsize")], BOTH),
    EndpointDescriptor::new("FX_WEEKLY", FX_PAIR, &[], BOTH),
    EndpointDescriptor::new("FX_MONTHLY", FX_PAIR, &[], BOTH),
    // Crypto
    EndpointDescriptor::new(
        "CRYPTO_INTRADAY",
        &["symbol", "market", "interval"],
        &[def("outputsize", "full")],
        BOTH,
    ),
    EndpointDescriptor::new("DIGITAL_CURRENCY_DAILY", CRYPTO_PAIR, &[], BOTH),
    EndpointDescriptor::new("DIGITAL_CURRENCY_WEEKLY", CRYPTO_PAIR, &[], BOTH),
    EndpointDescriptor::new("DIGITAL_CURRENCY_MONTHLY", CRYPTO_PAIR, &[], BOTH),
    // Commodities
    EndpointDescriptor::new("WTI", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("BRENT", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("NATURAL_GAS", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("COPPER", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("ALUMINUM", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("WHEAT", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("CORN", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("COTTON", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("SUGAR", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("COFFEE", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("ALL_COMMODITIES", &[], MONTHLY, BOTH),
    // Economic indicators
    EndpointDescriptor::new("REAL_GDP", &[], &[def("interval", "annual")], BOTH),
    EndpointDescriptor::new("REAL_GDP_PER_CAPITA", &[], &[], BOTH),
    EndpointDescriptor::new(
        "TREASURY_YIELD",
        &[],
        &[def("interval", "monthly"), def("maturity", "10year")],
        BOTH,
    ),
    EndpointDescriptor::new("FEDERAL_FUNDS_RATE", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("CPI", &[], MONTHLY, BOTH),
    EndpointDescriptor::new("INFLATION", &[], &[], BOTH),
    EndpointDescriptor::new("RETAIL_SALES", &[], &[], BOTH),
    EndpointDescriptor::new("DURABLES", &[], &[], BOTH),
    EndpointDescriptor::new("UNEMPLOYMENT", &[], &[], BOTH),
    EndpointDescriptor::new("NONFARM_PAYROLL", &[], &[], BOTH),
    // Technical indicators
    EndpointDescriptor::new("SMA", SYMBOL, MOVING_AVERAGE, BOTH),
    EndpointDescriptor::new("EMA", SYMBOL, MOVING_AVERAGE, BOTH),
    EndpointDescriptor::new("WMA", SYMBOL, MOVING_AVERAGE, BOTH),
    EndpointDescriptor::new("DEMA", SYMBOL, MOVING_AVERAGE, BOTH),
    EndpointDescriptor::new("TEMA", SYMBOL, MOVING_AVERAGE, BOTH),
    EndpointDescriptor::new("TRIMA", SYMBOL, MOVING_AVERAGE, BOTH),
    EndpointDescriptor::new("KAMA", SYMBOL, MOVING_AVERAGE, BOTH),
    EndpointDescriptor::new(
        "MAMA",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("series_type", "close"),
            def("fastlimit", "0.02"),
            def("slowlimit", "0.02"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new("VWAP", SYMBOL, &[def("interval", "15min"), opt("month")], BOTH),
    EndpointDescriptor::new(
        "T3",
        SYMBOL,
        &[
            def("interval", "weekly"),
            def("time_period", "10"),
            def("series_type", "close"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new(
        "MACD",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("series_type", "close"),
            def("fastperiod", "12"),
            def("slowperiod", "26"),
            def("signalperiod", "9"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new(
        "MACDEXT",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("series_type", "close"),
            def("fastperiod", "12"),
            def("slowperiod", "26"),
            def("signalperiod", "9"),
            def("fastmatype", "0"),
            def("slowmatype", "0"),
            def("signalmatype", "0"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new(
        "STOCH",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("fastkperiod", "5"),
            def("slowkperiod", "3"),
            def("slowdperiod", "3"),
            def("slowkmatype", "0"),
            def("slowdmatype", "0"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new(
        "STOCHF",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("fastkperiod", "5"),
            def("fastdperiod", "3"),
            def("fastdmatype", "0"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new(
        "RSI",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("time_period", "14"),
            def("series_type", "close"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new(
        "STOCHRSI",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("time_period", "14"),
            def("series_type", "close"),
            def("fastkperiod", "5"),
            def("fastdperiod", "3"),
            def("fastdmatype", "0"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new("WILLR", SYMBOL, DAILY_14, BOTH),
    EndpointDescriptor::new("ADX", SYMBOL, DAILY_14, BOTH),
    EndpointDescriptor::new("ADXR", SYMBOL, DAILY_14, BOTH),
    EndpointDescriptor::new("APO", SYMBOL, PRICE_OSCILLATOR, BOTH),
    EndpointDescriptor::new("PPO", SYMBOL, PRICE_OSCILLATOR, BOTH),
    EndpointDescriptor::new("MOM", SYMBOL, DAILY_10_CLOSE, BOTH),
    EndpointDescriptor::new("BOP", SYMBOL, DAILY_ONLY, BOTH),
    EndpointDescriptor::new("CCI", SYMBOL, DAILY_14, BOTH),
    EndpointDescriptor::new(
        "CMO",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("time_period", "14"),
            def("series_type", "close"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new("ROC", SYMBOL, DAILY_10_CLOSE, BOTH),
    EndpointDescriptor::new("ROCR", SYMBOL, DAILY_10_CLOSE, BOTH),
    EndpointDescriptor::new("AROON", SYMBOL, DAILY_14, BOTH),
    EndpointDescriptor::new("AROONOSC", SYMBOL, DAILY_10, BOTH),
    EndpointDescriptor::new("MFI", SYMBOL, DAILY_10, BOTH),
    EndpointDescriptor::new("TRIX", SYMBOL, DAILY_10_CLOSE, BOTH),
    EndpointDescriptor::new(
        "ULTOSC",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("timeperiod1", "8"),
            def("timeperiod2", "14"),
            def("timeperiod3", "28"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new("DX", SYMBOL, DAILY_10, BOTH),
    EndpointDescriptor::new(
        "MINUS_DI",
        SYMBOL,
        &[def("interval", "weekly"), def("time_period", "10"), opt("month")],
        BOTH,
    ),
    EndpointDescriptor::new("PLUS_DI", SYMBOL, DAILY_10, BOTH),
    EndpointDescriptor::new("MINUS_DM", SYMBOL, DAILY_10, BOTH),
    EndpointDescriptor::new("PLUS_DM", SYMBOL, DAILY_10, BOTH),
    EndpointDescriptor::new(
        "BBANDS",
        SYMBOL,
        &[
            def("interval", "weekly"),
            def("time_period", "5"),
            def("series_type", "close"),
            def("nbdevup", "3"),
            def("nbdevdn", "3"),
            def("matype", "0"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new("MIDPOINT", SYMBOL, DAILY_10_CLOSE, BOTH),
    EndpointDescriptor::new("MIDPRICE", SYMBOL, DAILY_10, BOTH),
    EndpointDescriptor::new(
        "SAR",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("acceleration", "0.02"),
            def("maximum", "0.2"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new("TRANGE", SYMBOL, DAILY_ONLY, BOTH),
    EndpointDescriptor::new("ATR", SYMBOL, DAILY_14, BOTH),
    EndpointDescriptor::new(
        "NATR",
        SYMBOL,
        &[def("interval", "weekly"), def("time_period", "14"), opt("month")],
        BOTH,
    ),
    EndpointDescriptor::new("AD", SYMBOL, DAILY_ONLY, BOTH),
    EndpointDescriptor::new(
        "ADOSC",
        SYMBOL,
        &[
            def("interval", "daily"),
            def("fastperiod", "5"),
            def("slowperiod", "10"),
            opt("month"),
        ],
        BOTH,
    ),
    EndpointDescriptor::new("OBV", SYMBOL, DAILY_ONLY, BOTH),
    EndpointDescriptor::new("HT_TRENDLINE", SYMBOL, DAILY_CLOSE, BOTH),
    EndpointDescriptor::new("HT_SINE", SYMBOL, DAILY_CLOSE, BOTH),
    EndpointDescriptor::new("HT_TRENDMODE", SYMBOL, WEEKLY_CLOSE, BOTH),
    EndpointDescriptor::new("HT_DCPERIOD", SYMBOL, DAILY_CLOSE, BOTH),
    EndpointDescriptor::new("HT_DCPHASE", SYMBOL, DAILY_CLOSE, BOTH),
    EndpointDescriptor::new("HT_PHASOR", SYMBOL, WEEKLY_CLOSE, BOTH),
];

/// Looks a function up by name, ignoring ASCII case.
pub fn lookup(function: &str) -> Option<&'static EndpointDescriptor> {
    let function = function.trim();
    ENDPOINTS
        .iter()
        .find(|e| e.function.eq_ignore_ascii_case(function))
}
