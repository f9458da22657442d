//! HTML message rendering for Telegram.

use crate::models::{Alert, SignalAlert, SignalAlertKind};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Telegram rejects longer messages
pub const MAX_MESSAGE_CHARS: usize = 4096;
pub const MAX_TITLE_CHARS: usize = 200;

/// Escape the three characters Telegram's HTML mode cares about
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Page alert with one bullet per excerpt. Titles are shortened and bullets
/// that would push the message past [`MAX_MESSAGE_CHARS`] are left out.
pub fn page_alert(alert: &Alert) -> String {
    let mut message = format!(
        "🚨 <b>{}</b>\n{}\nKeywords: {}\nTime: {}\n",
        escape_html(&alert.source),
        escape_html(alert.endpoint.as_str()),
        escape_html(&alert.keywords.join(", ")),
        alert.timestamp.format(TIME_FORMAT),
    );

    let mut length = message.chars().count();
    for excerpt in &alert.excerpts {
        let mut line = format!("\n• {}", escape_html(&truncate(&excerpt.title, MAX_TITLE_CHARS)));
        if let Some(link) = &excerpt.link {
            line.push_str(" — ");
            line.push_str(&escape_html(link));
        }

        let line_length = line.chars().count();
        if length + line_length > MAX_MESSAGE_CHARS {
            break;
        }
        length += line_length;
        message.push_str(&line);
    }

    message
}

pub fn signal_alert(alert: &SignalAlert) -> String {
    let symbol = escape_html(&alert.symbol);
    let time = alert.timestamp.format(TIME_FORMAT);

    let headline = match alert.kind {
        SignalAlertKind::Oversold => format!("📉 <b>{}</b> RSI oversold: {:.2}", symbol, alert.value),
        SignalAlertKind::Overbought => format!("📈 <b>{}</b> RSI overbought: {:.2}", symbol, alert.value),
        SignalAlertKind::BullishCross => format!(
            "🟢 <b>{}</b> bullish MA cross: fast {:.4} &gt; slow {:.4}",
            symbol,
            alert.value,
            alert.reference.unwrap_or_default()
        ),
        SignalAlertKind::BearishCross => format!(
            "🔴 <b>{}</b> bearish MA cross: fast {:.4} &lt; slow {:.4}",
            symbol,
            alert.value,
            alert.reference.unwrap_or_default()
        ),
    };

    format!("{}\nPrice: {}\nTime: {}", headline, format_price(alert.price), time)
}

pub fn heartbeat() -> String {
    "✅ Monitor is alive and checking on schedule.".to_string()
}

fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.6}", price)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
