//! Terminal rendering of published controller state.

use fx_format::format_display;
use fx_types::{RateSet, ViewState};
use tokio::sync::watch;

/// Prints every state the controller publishes until it is dropped.
pub async fn render_loop(mut rx: watch::Receiver<ViewState>) {
    while rx.changed().await.is_ok() {
        let view = rx.borrow_and_update().clone();
        if let Some(text) = render(&view) {
            println!("{}", text);
        }
    }
}

/// Text for a state; `Idle` has nothing to show.
pub fn render(view: &ViewState) -> Option<String> {
    match view {
        ViewState::Idle => None,
        ViewState::Loading { base } => Some(format!("… loading rates for {}", base)),
        ViewState::Ready(result) => Some(format!(
            "{} = {}\n{}",
            format_display(result.amount, result.source.as_str()),
            result.display_amount,
            result.display_rate
        )),
        ViewState::Failed { message, retryable } => {
            let hint = if *retryable { " (try again)" } else { "" };
            Some(format!("✗ {}{}", message, hint))
        }
    }
}

/// One-line age of `rates`, e.g. `USD rates as of 2024-05-01 (fetched ...)`.
pub fn rates_freshness(rates: &RateSet) -> String {
    let fetched = rates.fetched_at().format("%Y-%m-%d %H:%M:%S UTC");
    match rates.provider_date() {
        Some(date) => format!(
            "{} rates as of {} (fetched {})",
            rates.base_code(),
            date,
            fetched
        ),
        None => format!("{} rates fetched {}", rates.base_code(), fetched),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_types::ConversionResult;

    fn usd_rates() -> RateSet {
        let inr: fx_types::CurrencyCode = "INR".parse().unwrap();
        RateSet::new("USD".parse().unwrap(), [(inr, 83.0)]).unwrap()
    }

    #[test]
    fn test_rates_freshness() {
        let rates = usd_rates();
        let fetched = rates.fetched_at().format("%Y-%m-%d %H:%M:%S UTC").to_string();
        assert_eq!(
            rates_freshness(&rates),
            format!("USD rates fetched {}", fetched)
        );

        let dated = rates.with_provider_date(Some("2024-05-01".into()));
        assert_eq!(
            rates_freshness(&dated),
            format!("USD rates as of 2024-05-01 (fetched {})", fetched)
        );
    }

    #[test]
    fn test_render_result() {
        let view = ViewState::Ready(ConversionResult {
            source: "USD".parse().unwrap(),
            target: "INR".parse().unwrap(),
            amount: 10.0,
            converted_amount: 830.0,
            effective_rate: 83.0,
            display_amount: "₹830.00".into(),
            display_rate: "1 USD = 83.0000 INR".into(),
        });
        assert_eq!(
            render(&view).unwrap(),
            "$10.00 = ₹830.00\n1 USD = 83.0000 INR"
        );
    }

    #[test]
    fn test_render_states() {
        assert_eq!(render(&ViewState::Idle), None);
        assert_eq!(
            render(&ViewState::Loading {
                base: "EUR".parse().unwrap()
            })
            .unwrap(),
            "… loading rates for EUR"
        );
        assert_eq!(
            render(&ViewState::Failed {
                message: "Rate provider returned HTTP 503".into(),
                retryable: true,
            })
            .unwrap(),
            "✗ Rate provider returned HTTP 503 (try again)"
        );
    }
}
