//! Runtime configuration.
//!
//! Everything is read once at startup into an explicit [`Config`] that is
//! handed to each component. [`Config::from_lookup`] takes the key source as a
//! closure so tests never touch the process environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::error::{Result, WatchError};
use crate::models::Source;

pub const DEFAULT_USER_AGENT: &str = "xrpl-monitor/1.0";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_PRICE_API_URL: &str = "https://api.binance.com";

const DEFAULT_SOURCES: &[(&str, &str)] = &[
    ("Ripple News", "https://ripple.com/insights/"),
    ("XRPL Foundation Blog", "https://xrpl.org/blog/"),
    ("Circle Blog", "https://www.circle.com/en/blog"),
    ("Tether Blog", "https://tether.to/en/news/"),
    ("XRPLF GitHub", "https://github.com/XRPLF"),
];

const DEFAULT_KEYWORDS: &[&str] = &[
    "usdc",
    "usdt",
    "stablecoin",
    "rlusd",
    "xsgd",
    "integration",
    "sidechain",
    "euro",
    "eur",
    "tokenize",
    "tokenization",
];

/// Deployment environment name (`APP_ENV`), `sandbox` when unset
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Bot credentials; both halves are required for dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramCredentials {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    pub fetch_timeout_seconds: u64,
    pub notify_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_seconds: 20,
            notify_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetectorConfig {
    pub sources: Vec<Source>,
    pub keywords: Vec<String>,
    /// Require word boundaries around keywords ("eur" no longer matches "europe")
    pub whole_words: bool,
    pub snapshot_path: PathBuf,
    pub max_excerpts: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            whole_words: false,
            snapshot_path: PathBuf::from("seen.json"),
            max_excerpts: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignalConfig {
    pub api_url: String,
    pub symbol: String,
    pub interval: String,
    pub limit: usize,
    pub rsi_period: usize,
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
    pub ma_fast_period: usize,
    pub ma_slow_period: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_PRICE_API_URL.to_string(),
            symbol: "XRPUSDT".to_string(),
            interval: "1h".to_string(),
            limit: 100,
            rsi_period: 14,
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
            ma_fast_period: 9,
            ma_slow_period: 21,
        }
    }
}

impl SignalConfig {
    /// Shortest series the engine accepts
    pub fn min_closes(&self) -> usize {
        (self.rsi_period + 1)
            .max(self.ma_slow_period)
            .max(self.ma_fast_period)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_url: String,
    pub http: HttpConfig,
    pub detector: DetectorConfig,
    pub signals: SignalConfig,
    pub pages_enabled: bool,
    pub prices_enabled: bool,
    pub heartbeat_enabled: bool,
    pub strict_exit: bool,
    /// Keys whose values were rejected at load time and replaced by defaults
    pub rejected_keys: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "sandbox".to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            http: HttpConfig::default(),
            detector: DetectorConfig::default(),
            signals: SignalConfig::default(),
            pages_enabled: true,
            prices_enabled: true,
            heartbeat_enabled: true,
            strict_exit: false,
            rejected_keys: Vec::new(),
        }
    }
}

impl Config {
    /// Load from the process environment (after `.env` has been applied)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Rejected values are
    /// logged as configuration errors, replaced by their default and listed
    /// in [`Config::rejected_keys`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Config::default();
        let mut rejected = Vec::new();

        if let Some(env) = get("APP_ENV") {
            config.environment = env;
        }
        config.telegram_bot_token = get("TELEGRAM_BOT_TOKEN");
        config.telegram_chat_id = get("TELEGRAM_CHAT_ID");
        if let Some(url) = get("TELEGRAM_API_URL") {
            config.telegram_api_url = url;
        }

        if let Some(agent) = get("WATCH_USER_AGENT") {
            config.http.user_agent = agent;
        }
        parse_into(&get, "FETCH_TIMEOUT_SECONDS", &mut config.http.fetch_timeout_seconds, &mut rejected);
        parse_into(&get, "NOTIFY_TIMEOUT_SECONDS", &mut config.http.notify_timeout_seconds, &mut rejected);

        if let Some(raw) = get("WATCH_SOURCES") {
            let sources = parse_sources(&raw);
            if sources.is_empty() {
                reject(&mut rejected, "WATCH_SOURCES", &raw, "no valid name=url pairs");
            } else {
                config.detector.sources = sources;
            }
        }
        if let Some(raw) = get("WATCH_KEYWORDS") {
            let keywords = parse_keywords(&raw);
            if keywords.is_empty() {
                reject(&mut rejected, "WATCH_KEYWORDS", &raw, "no keywords after parsing");
            } else {
                config.detector.keywords = keywords;
            }
        }
        parse_bool_into(&get, "WATCH_KEYWORD_WHOLE_WORDS", &mut config.detector.whole_words, &mut rejected);
        if let Some(path) = get("WATCH_SNAPSHOT_PATH") {
            config.detector.snapshot_path = PathBuf::from(path);
        }

        if let Some(url) = get("PRICE_API_URL") {
            config.signals.api_url = url;
        }
        if let Some(symbol) = get("PRICE_SYMBOL") {
            config.signals.symbol = symbol.to_uppercase();
        }
        if let Some(interval) = get("PRICE_INTERVAL") {
            config.signals.interval = interval;
        }
        parse_into(&get, "PRICE_LIMIT", &mut config.signals.limit, &mut rejected);
        parse_into(&get, "RSI_PERIOD", &mut config.signals.rsi_period, &mut rejected);
        parse_into(&get, "RSI_OVERSOLD", &mut config.signals.rsi_oversold, &mut rejected);
        parse_into(&get, "RSI_OVERBOUGHT", &mut config.signals.rsi_overbought, &mut rejected);
        parse_into(&get, "MA_FAST_PERIOD", &mut config.signals.ma_fast_period, &mut rejected);
        parse_into(&get, "MA_SLOW_PERIOD", &mut config.signals.ma_slow_period, &mut rejected);

        parse_bool_into(&get, "WATCH_PAGES", &mut config.pages_enabled, &mut rejected);
        parse_bool_into(&get, "WATCH_PRICES", &mut config.prices_enabled, &mut rejected);
        parse_bool_into(&get, "HEARTBEAT_ENABLED", &mut config.heartbeat_enabled, &mut rejected);
        parse_bool_into(&get, "WATCH_STRICT_EXIT", &mut config.strict_exit, &mut rejected);

        config.sanitize(&mut rejected);
        config.rejected_keys = rejected;
        config
    }

    /// Resolve the bot credentials. Either half missing is a configuration
    /// failure, which callers treat as "dispatch disabled".
    pub fn telegram_credentials(&self) -> Result<TelegramCredentials> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(bot_token), Some(chat_id)) => Ok(TelegramCredentials {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            (None, Some(_)) => Err(WatchError::Config("TELEGRAM_BOT_TOKEN is not set".into())),
            (Some(_), None) => Err(WatchError::Config("TELEGRAM_CHAT_ID is not set".into())),
            (None, None) => Err(WatchError::Config(
                "TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID are not set".into(),
            )),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }

    /// Reset values that parse but cannot work. Only the offending fields
    /// are replaced; everything else the operator set is kept.
    fn sanitize(&mut self, rejected: &mut Vec<String>) {
        let http = HttpConfig::default();
        if self.http.fetch_timeout_seconds == 0 {
            reject(rejected, "FETCH_TIMEOUT_SECONDS", "0", "timeout must be > 0");
            self.http.fetch_timeout_seconds = http.fetch_timeout_seconds;
        }
        if self.http.notify_timeout_seconds == 0 {
            reject(rejected, "NOTIFY_TIMEOUT_SECONDS", "0", "timeout must be > 0");
            self.http.notify_timeout_seconds = http.notify_timeout_seconds;
        }

        let defaults = SignalConfig::default();
        let s = &mut self.signals;
        for (key, slot, default) in [
            ("RSI_PERIOD", &mut s.rsi_period, defaults.rsi_period),
            ("MA_FAST_PERIOD", &mut s.ma_fast_period, defaults.ma_fast_period),
            ("MA_SLOW_PERIOD", &mut s.ma_slow_period, defaults.ma_slow_period),
        ] {
            if *slot == 0 {
                reject(rejected, key, "0", "period must be > 0");
                *slot = default;
            }
        }

        if !(0.0..=100.0).contains(&s.rsi_oversold)
            || !(0.0..=100.0).contains(&s.rsi_overbought)
            || s.rsi_oversold >= s.rsi_overbought
        {
            let value = format!("{} / {}", s.rsi_oversold, s.rsi_overbought);
            reject(
                rejected,
                "RSI_OVERSOLD/RSI_OVERBOUGHT",
                &value,
                "thresholds must satisfy 0 <= oversold < overbought <= 100",
            );
            s.rsi_oversold = defaults.rsi_oversold;
            s.rsi_overbought = defaults.rsi_overbought;
        }

        let required = s.min_closes();
        if s.limit < required {
            let reason = format!("below the {} closes the indicators need", required);
            reject(rejected, "PRICE_LIMIT", &s.limit.to_string(), &reason);
            s.limit = defaults.limit.max(required);
        }
    }
}

/// `Name=url;Name=url`. Malformed pairs are logged and dropped.
pub fn parse_sources(raw: &str) -> Vec<Source> {
    raw.split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let source = Source::parse_pair(pair);
            if source.is_none() {
                warn!(pair = %pair, "Ignoring malformed source entry");
            }
            source
        })
        .collect()
}

/// Comma separated, lower-cased, duplicates removed (first occurrence wins)
pub fn parse_keywords(raw: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for keyword in raw.split(',').map(|k| k.trim().to_lowercase()) {
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}

fn default_sources() -> Vec<Source> {
    DEFAULT_SOURCES
        .iter()
        .filter_map(|(name, url)| Source::parse_pair(&format!("{}={}", name, url)))
        .collect()
}

fn reject(rejected: &mut Vec<String>, key: &str, value: &str, reason: &str) {
    let e = WatchError::Config(format!("{}={:?}: {}", key, value, reason));
    warn!(kind = e.kind(), error = %e, "Invalid setting, using default");
    rejected.push(key.to_string());
}

fn parse_into<T, G>(get: &G, key: &str, slot: &mut T, rejected: &mut Vec<String>)
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(key) {
        match raw.parse::<T>() {
            Ok(value) => *slot = value,
            Err(_) => reject(rejected, key, &raw, "not a valid number"),
        }
    }
}

fn parse_bool_into<G>(get: &G, key: &str, slot: &mut bool, rejected: &mut Vec<String>)
where
    G: Fn(&str) -> Option<String>,
{
    if let Some(raw) = get(key) {
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => *slot = true,
            "0" | "false" | "no" | "off" => *slot = false,
            _ => reject(rejected, key, &raw, "not a boolean"),
        }
    }
}
