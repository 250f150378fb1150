//! CLI definition and dispatch.

use chrono::Local;
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvPriceFeed;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::paper_gateway::PaperGateway;
use crate::domain::bot_config::{
    BotConfig, DEFAULT_INSTRUMENT, DEFAULT_LOG_TAIL, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_TRADE_SIZE,
};
use crate::domain::config_validation::validate_bot_config;
use crate::domain::engine::{Engine, Tick};
use crate::domain::error::TicktraderError;
use crate::domain::indicator::{latest_snapshot, IndicatorPeriods};
use crate::domain::position::Position;
use crate::domain::risk::{DailyRiskGovernor, DEFAULT_MAX_TRADES_PER_DAY};
use crate::domain::signal::evaluate_signal;
use crate::domain::state::BotState;
use crate::domain::strategy::Strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::execution_port::ExecutionPort;
use crate::ports::market_data_port::MarketDataPort;

pub const DEFAULT_HISTORY_LIMIT: usize = 200;
pub const DEFAULT_KLINE_INTERVAL: &str = "1m";

#[derive(Parser, Debug)]
#[command(name = "ticktrader", about = "EMA/RSI single-instrument trading bot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the evaluation loop
    Run {
        #[arg(short, long)]
        config: PathBuf,
        /// Stop after this many ticks
        #[arg(long)]
        ticks: Option<u64>,
    },
    /// Print the latest indicator snapshot and the signal for a flat position
    Inspect {
        #[arg(short, long)]
        config: PathBuf,
        /// Read prices from this CSV file instead of the configured feed
        #[arg(long)]
        prices: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Csv(PathBuf),
    Binance { interval: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    pub source: FeedSource,
    pub limit: usize,
    pub base_url: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Run { config, ticks } => run_bot(&config, ticks),
        Command::Inspect { config, prices } => run_inspect(&config, prices),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, TicktraderError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Read `[bot]`, `[strategy]` and `[risk]`, then validate. Exit offsets are
/// stored as fractions from here on.
pub fn build_bot_config(adapter: &dyn ConfigPort) -> Result<BotConfig, TicktraderError> {
    let defaults = Strategy::default();
    let periods = IndicatorPeriods {
        fast: adapter.get_usize("strategy", "fast_period", defaults.periods.fast)?,
        slow: adapter.get_usize("strategy", "slow_period", defaults.periods.slow)?,
        oscillator: adapter.get_usize("strategy", "rsi_period", defaults.periods.oscillator)?,
    };

    let max_trades = adapter.get_int(
        "risk",
        "max_trades_per_day",
        DEFAULT_MAX_TRADES_PER_DAY as i64,
    )?;
    let max_trades = u32::try_from(max_trades).map_err(|_| {
        TicktraderError::invalid("risk", "max_trades_per_day", "max_trades_per_day out of range")
    })?;

    let poll_interval = adapter.get_int("bot", "poll_interval_secs", DEFAULT_POLL_INTERVAL_SECS as i64)?;
    let poll_interval_secs = u64::try_from(poll_interval).map_err(|_| {
        TicktraderError::invalid("bot", "poll_interval_secs", "poll_interval_secs must not be negative")
    })?;

    let config = BotConfig {
        instrument: adapter
            .get_string("bot", "instrument")
            .map(|s| s.to_uppercase())
            .unwrap_or_else(|| DEFAULT_INSTRUMENT.to_string()),
        trade_size: adapter.get_double("bot", "trade_size", DEFAULT_TRADE_SIZE)?,
        live: adapter.get_bool("bot", "live", false)?,
        strategy: Strategy {
            periods,
            buy_threshold: adapter.get_double("strategy", "buy_threshold", defaults.buy_threshold)?,
            sell_threshold: adapter.get_double("strategy", "sell_threshold", defaults.sell_threshold)?,
            take_profit: adapter.get_percent("strategy", "take_profit_pct", defaults.take_profit)?,
            stop_loss: adapter.get_percent("strategy", "stop_loss_pct", defaults.stop_loss)?,
        },
        risk: DailyRiskGovernor::new(max_trades),
        poll_interval_secs,
        log_tail: adapter.get_usize("bot", "log_tail", DEFAULT_LOG_TAIL)?,
    };

    validate_bot_config(&config)?;
    Ok(config)
}

pub fn build_feed_settings(adapter: &dyn ConfigPort) -> Result<FeedSettings, TicktraderError> {
    let source = adapter
        .get_string("feed", "source")
        .unwrap_or_else(|| "binance".to_string())
        .to_lowercase();

    let source = match source.as_str() {
        "csv" => {
            let path = adapter
                .get_string("feed", "path")
                .ok_or_else(|| TicktraderError::ConfigMissing {
                    section: "feed".into(),
                    key: "path".into(),
                })?;
            FeedSource::Csv(PathBuf::from(path))
        }
        "binance" => FeedSource::Binance {
            interval: adapter
                .get_string("feed", "interval")
                .unwrap_or_else(|| DEFAULT_KLINE_INTERVAL.to_string()),
        },
        other => {
            return Err(TicktraderError::invalid(
                "feed",
                "source",
                format!("unknown feed source {:?} (expected csv or binance)", other),
            ));
        }
    };

    let limit = adapter.get_usize("feed", "limit", DEFAULT_HISTORY_LIMIT)?;
    if limit == 0 {
        return Err(TicktraderError::invalid("feed", "limit", "limit must be at least 1"));
    }

    Ok(FeedSettings {
        source,
        limit,
        base_url: adapter.get_string("binance", "base_url"),
    })
}

pub fn build_feed(settings: &FeedSettings) -> Result<Box<dyn MarketDataPort>, TicktraderError> {
    match &settings.source {
        FeedSource::Csv(path) => Ok(Box::new(CsvPriceFeed::new(path.clone()))),
        #[cfg(feature = "binance")]
        FeedSource::Binance { interval } => {
            use crate::adapters::binance::BinanceKlineFeed;
            Ok(Box::new(BinanceKlineFeed::new(
                settings.base_url.clone(),
                interval.clone(),
            )?))
        }
        #[cfg(not(feature = "binance"))]
        FeedSource::Binance { .. } => Err(TicktraderError::invalid(
            "feed",
            "source",
            "binance feed requires the binance feature",
        )),
    }
}

/// Chosen once per session. Live orders need `live = true` and credentials;
/// anything less falls back to the paper gateway.
pub fn select_gateway(
    config: &BotConfig,
    settings: &FeedSettings,
) -> Result<Box<dyn ExecutionPort>, TicktraderError> {
    if !config.live {
        return Ok(Box::new(PaperGateway::new()));
    }

    #[cfg(feature = "binance")]
    {
        binance_gateway(settings, crate::adapters::binance::Credentials::from_env())
    }

    #[cfg(not(feature = "binance"))]
    {
        let _ = settings;
        warn!("live = true but this build has no binance feature; orders will be simulated");
        Ok(Box::new(PaperGateway::new()))
    }
}

#[cfg(feature = "binance")]
fn binance_gateway(
    settings: &FeedSettings,
    credentials: Option<crate::adapters::binance::Credentials>,
) -> Result<Box<dyn ExecutionPort>, TicktraderError> {
    use crate::adapters::binance::{BinanceGateway, API_KEY_ENV, API_SECRET_ENV};

    match credentials {
        Some(credentials) => Ok(Box::new(BinanceGateway::new(
            settings.base_url.clone(),
            credentials,
        )?)),
        None => {
            warn!(
                "live = true but {} / {} are not set; orders will be simulated",
                API_KEY_ENV, API_SECRET_ENV
            );
            Ok(Box::new(PaperGateway::new()))
        }
    }
}

/// Fetch and evaluate repeatedly. Feed and gateway failures are logged and
/// the loop carries on; the state keeps whatever transition already happened.
/// Returns the number of ticks performed.
pub fn run_loop(
    engine: &Engine,
    feed: &dyn MarketDataPort,
    state: &mut BotState,
    limit: usize,
    max_ticks: Option<u64>,
    interval: Duration,
) -> u64 {
    let instrument = engine.config().instrument.clone();
    let mut ticks = 0u64;

    loop {
        if max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        if ticks > 0 && !interval.is_zero() {
            thread::sleep(interval);
        }
        ticks += 1;

        let bars = match feed.fetch_recent(&instrument, limit) {
            Ok(bars) => bars,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        let now = Local::now().naive_local();
        match engine.evaluate(state, &bars, now) {
            Ok(Tick::Entered { .. }) | Ok(Tick::Exited { .. }) => {
                eprintln!("{}", engine.status(state));
            }
            Ok(_) => {}
            Err(e) => {
                error!("tick {}: {}", ticks, e);
                eprintln!("{}", engine.status(state));
            }
        }
    }

    ticks
}

fn run_bot(config_path: &Path, max_ticks: Option<u64>) -> Result<(), TicktraderError> {
    let adapter = load_config(config_path)?;
    let config = build_bot_config(&adapter)?;
    let settings = build_feed_settings(&adapter)?;

    let feed = build_feed(&settings)?;
    let gateway = select_gateway(&config, &settings)?;
    let interval = Duration::from_secs(config.poll_interval_secs);
    let engine = Engine::new(config, gateway)?;

    info!(
        "Trading {} in {} mode, polling every {}s",
        engine.config().instrument,
        if engine.is_live() { "live" } else { "paper" },
        interval.as_secs()
    );

    let mut state = BotState::new();
    let ticks = run_loop(&engine, feed.as_ref(), &mut state, settings.limit, max_ticks, interval);

    eprintln!("\n=== Session Summary ({} ticks) ===", ticks);
    eprint!("{}", engine.status(&state));
    Ok(())
}

fn run_inspect(config_path: &Path, prices: Option<PathBuf>) -> Result<(), TicktraderError> {
    let adapter = load_config(config_path)?;
    let config = build_bot_config(&adapter)?;
    let mut settings = build_feed_settings(&adapter)?;
    if let Some(path) = prices {
        settings.source = FeedSource::Csv(path);
    }

    let feed = build_feed(&settings)?;
    let bars = feed.fetch_recent(&config.instrument, settings.limit)?;
    let Some(latest) = bars.last() else {
        return Err(TicktraderError::MarketData {
            instrument: config.instrument.clone(),
            reason: "feed returned no bars".into(),
        });
    };

    let snapshot = latest_snapshot(&bars, &config.strategy.periods);
    let signal = evaluate_signal(&config.strategy, snapshot.as_ref(), latest.close, &Position::Flat);

    println!("{} bars, last close {:.2}", bars.len(), latest.close);
    let warmup = config.strategy.periods.warmup();
    if bars.len() < warmup {
        println!("indicators need at least {} bars; signal stays HOLD until then", warmup);
    }
    if let Some(s) = &snapshot {
        println!("{}", s);
    }
    println!("signal when flat: {:?}", signal);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), TicktraderError> {
    let adapter = load_config(config_path)?;
    let config = build_bot_config(&adapter)?;
    let settings = build_feed_settings(&adapter)?;

    eprintln!("Instrument:        {}", config.instrument);
    eprintln!("Trade size:        {}", config.trade_size);
    eprintln!("Live:              {}", config.live);
    eprintln!(
        "EMA fast/slow:     {}/{}",
        config.strategy.periods.fast, config.strategy.periods.slow
    );
    eprintln!("RSI period:        {}", config.strategy.periods.oscillator);
    eprintln!(
        "RSI buy/sell:      {}/{}",
        config.strategy.buy_threshold, config.strategy.sell_threshold
    );
    eprintln!("Take profit:       {:.4}%", config.strategy.take_profit * 100.0);
    eprintln!("Stop loss:         {:.4}%", config.strategy.stop_loss * 100.0);
    eprintln!("Max trades/day:    {}", config.risk.max_trades_per_day);
    eprintln!("Feed:              {:?} (limit {})", settings.source, settings.limit);
    eprintln!("\nConfiguration is valid.");
    Ok(())
}

#[cfg(all(test, feature = "binance"))]
mod tests {
    use super::*;
    use crate::adapters::binance::Credentials;

    fn settings() -> FeedSettings {
        FeedSettings {
            source: FeedSource::Binance {
                interval: DEFAULT_KLINE_INTERVAL.to_string(),
            },
            limit: DEFAULT_HISTORY_LIMIT,
            base_url: None,
        }
    }

    #[test]
    fn missing_credentials_fall_back_to_paper() {
        let gateway = binance_gateway(&settings(), None).unwrap();
        assert!(!gateway.is_live());
    }

    #[test]
    fn credentials_select_live_gateway() {
        let credentials = Credentials {
            api_key: "key".into(),
            api_secret: "secret".into(),
        };
        let gateway = binance_gateway(&settings(), Some(credentials)).unwrap();
        assert!(gateway.is_live());
    }
}
