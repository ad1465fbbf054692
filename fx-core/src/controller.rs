//! Conversion Controller
//!
//! Owns the user-facing state (selection, known currencies, current rate set)
//! and decides when rates must be re-fetched. Every state transition is
//! published on a watch channel as a [`ViewState`]; rendering happens in
//! whoever subscribes.
//!
//! ## Stale responses
//!
//! Each fetch is tagged with a sequence number and the base it was issued for.
//! A response is applied only while its sequence is the latest one issued and
//! its base is still the selected source. Anything else is dropped.

use std::collections::BTreeSet;

use tokio::sync::{Mutex, MutexGuard, watch};

use fx_types::ports::known_currencies;
use fx_types::{
    ConversionRequest, ConversionResult, ConvertError, CurrencyCode, RateRepository, RateSet,
    Selection, ViewState, validate_amount,
};

use crate::conversion::convert;

/// Startup settings for a [`ConversionController`].
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Base fetched by `initialize` to discover the supported currencies.
    pub bootstrap_base: CurrencyCode,
    pub default_source: CurrencyCode,
    pub default_target: CurrencyCode,
    pub default_amount: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            bootstrap_base: CurrencyCode::from_static("USD"),
            default_source: CurrencyCode::from_static("USD"),
            default_target: CurrencyCode::from_static("INR"),
            default_amount: 1.0,
        }
    }
}

/// A fetch in flight.
#[derive(Debug, Clone)]
struct FetchTicket {
    seq: u64,
    base: CurrencyCode,
}

struct State {
    currencies: BTreeSet<CurrencyCode>,
    rates: Option<RateSet>,
    selection: Selection,
    last_result: Option<ConversionResult>,
    ready: bool,
    disposed: bool,
    latest_seq: u64,
}

impl State {
    fn ensure_ready(&self) -> Result<(), ConvertError> {
        if self.ready && !self.disposed {
            Ok(())
        } else {
            Err(ConvertError::NotReady)
        }
    }

    fn rates_match_source(&self) -> bool {
        self.rates
            .as_ref()
            .is_some_and(|r| *r.base_code() == self.selection.source)
    }

    fn issue(&mut self, base: CurrencyCode) -> FetchTicket {
        self.latest_seq += 1;
        FetchTicket {
            seq: self.latest_seq,
            base,
        }
    }

    /// Makes every fetch in flight stale.
    fn invalidate_pending(&mut self) {
        self.latest_seq += 1;
    }

    fn is_latest(&self, ticket: &FetchTicket) -> bool {
        !self.disposed && ticket.seq == self.latest_seq
    }
}

/// Conversion workflow controller.
///
/// Generic over `R: RateRepository` - the adapter is injected at construction.
/// All operations take `&self`; the state lock is never held across a fetch,
/// so overlapping operations are allowed and resolved by sequence tags.
pub struct ConversionController<R: RateRepository> {
    repo: R,
    config: ControllerConfig,
    state: Mutex<State>,
    view: watch::Sender<ViewState>,
}

impl<R: RateRepository> ConversionController<R> {
    /// Creates a controller. Nothing is fetched until [`initialize`](Self::initialize).
    pub fn new(repo: R, config: ControllerConfig) -> Self {
        let selection = Selection {
            source: config.default_source.clone(),
            target: config.default_target.clone(),
            amount: config.default_amount,
        };
        let (view, _) = watch::channel(ViewState::Idle);

        Self {
            repo,
            config,
            state: Mutex::new(State {
                currencies: BTreeSet::new(),
                rates: None,
                selection,
                last_result: None,
                ready: false,
                disposed: false,
                latest_seq: 0,
            }),
            view,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Subscribes to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.subscribe()
    }

    /// Returns the state currently published.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────────

    /// Fetches the bootstrap base to discover the supported currencies.
    ///
    /// On failure the controller becomes not ready but keeps its previous
    /// currencies and rates; calling this again retries. A bootstrap overtaken
    /// by a later request is not applied and returns `Superseded`.
    pub async fn initialize(&self) -> Result<(), ConvertError> {
        let ticket = {
            let mut state = self.state.lock().await;
            if state.disposed {
                return Err(ConvertError::NotReady);
            }
            self.begin_fetch(&mut state, self.config.bootstrap_base.clone())
        };

        let fetched = self.repo.fetch_rates(&ticket.base).await;

        let mut state = self.state.lock().await;
        if state.disposed {
            return Err(ConvertError::NotReady);
        }
        if !state.is_latest(&ticket) {
            tracing::debug!(base = %ticket.base, seq = ticket.seq, "discarding superseded bootstrap response");
            return Err(ConvertError::Superseded);
        }

        let rates = match fetched {
            Ok(rates) => rates,
            Err(e) => {
                state.ready = false;
                return Err(self.fail(e.into()));
            }
        };

        let currencies = known_currencies(&rates);
        if currencies.contains(&self.config.default_source)
            && currencies.contains(&self.config.default_target)
        {
            state.selection.source = self.config.default_source.clone();
            state.selection.target = self.config.default_target.clone();
        }

        tracing::info!(
            base = %rates.base_code(),
            currencies = currencies.len(),
            "exchange rates loaded"
        );

        state.currencies = currencies;
        state.rates = Some(rates);
        state.ready = true;
        self.publish(ViewState::Idle);
        Ok(())
    }

    /// Drops all state and makes fetches in flight stale.
    ///
    /// A disposed controller rejects every further operation with `NotReady`.
    pub async fn dispose(&self) {
        let mut state = self.state.lock().await;
        state.disposed = true;
        state.ready = false;
        state.rates = None;
        state.currencies.clear();
        state.last_result = None;
        state.invalidate_pending();
        self.publish(ViewState::Idle);
        tracing::debug!("conversion controller disposed");
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // User Actions
    // ─────────────────────────────────────────────────────────────────────────────

    /// Selects a new source currency, fetching its rates if they are not held.
    ///
    /// Returns `Ok(None)` when a later request superseded this one.
    pub async fn set_source_code(
        &self,
        code: CurrencyCode,
    ) -> Result<Option<ConversionResult>, ConvertError> {
        let mut state = self.state.lock().await;
        state.ensure_ready()?;
        state.selection.source = code;
        self.run(state, false).await
    }

    /// Selects a new target currency and recomputes.
    pub async fn set_target_code(
        &self,
        code: CurrencyCode,
    ) -> Result<Option<ConversionResult>, ConvertError> {
        let mut state = self.state.lock().await;
        state.ensure_ready()?;
        state.selection.target = code;
        self.run(state, false).await
    }

    /// Changes the amount and recomputes. Invalid amounts leave state untouched.
    pub async fn set_amount(&self, amount: f64) -> Result<Option<ConversionResult>, ConvertError> {
        let amount = validate_amount(amount).map_err(|e| self.fail(e))?;
        let mut state = self.state.lock().await;
        state.ensure_ready()?;
        state.selection.amount = amount;
        self.run(state, false).await
    }

    /// Exchanges source and target, then always re-fetches for the new source.
    pub async fn swap(&self) -> Result<Option<ConversionResult>, ConvertError> {
        let mut state = self.state.lock().await;
        state.ensure_ready()?;
        let selection = &mut state.selection;
        std::mem::swap(&mut selection.source, &mut selection.target);
        tracing::debug!(source = %selection.source, target = %selection.target, "swapped currencies");
        self.run(state, true).await
    }

    /// Converts `request`, fetching rates for its source first when needed.
    ///
    /// The amount is validated before anything else; an invalid request changes
    /// neither the selection nor the last result.
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<Option<ConversionResult>, ConvertError> {
        request.validate().map_err(|e| self.fail(e))?;
        let mut state = self.state.lock().await;
        state.ensure_ready()?;
        state.selection = Selection {
            source: request.source,
            target: request.target,
            amount: request.amount,
        };
        self.run(state, false).await
    }

    /// Re-runs the conversion for the current selection.
    pub async fn convert_selection(&self) -> Result<Option<ConversionResult>, ConvertError> {
        let state = self.state.lock().await;
        state.ensure_ready()?;
        self.run(state, false).await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────────

    pub async fn is_ready(&self) -> bool {
        let state = self.state.lock().await;
        state.ready && !state.disposed
    }

    /// Codes discovered by `initialize`, base included.
    pub async fn currencies(&self) -> BTreeSet<CurrencyCode> {
        self.state.lock().await.currencies.clone()
    }

    /// The rate set currently held, if any.
    pub async fn rates(&self) -> Option<RateSet> {
        self.state.lock().await.rates.clone()
    }

    pub async fn selection(&self) -> Selection {
        self.state.lock().await.selection.clone()
    }

    /// The last successful conversion.
    pub async fn last_result(&self) -> Option<ConversionResult> {
        self.state.lock().await.last_result.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────────

    /// Computes now if the held rates fit the source (or no rate is needed),
    /// otherwise fetches first.
    async fn run(
        &self,
        mut state: MutexGuard<'_, State>,
        force_fetch: bool,
    ) -> Result<Option<ConversionResult>, ConvertError> {
        let identity = state.selection.source == state.selection.target;
        if (identity || state.rates_match_source()) && !force_fetch {
            state.invalidate_pending();
            return self.recompute(&mut state).map(Some);
        }

        let base = state.selection.source.clone();
        let ticket = self.begin_fetch(&mut state, base);
        drop(state);

        let fetched = self.repo.fetch_rates(&ticket.base).await;

        let mut state = self.state.lock().await;
        if !state.is_latest(&ticket) || state.selection.source != ticket.base {
            tracing::debug!(base = %ticket.base, seq = ticket.seq, "discarding stale rate response");
            return Ok(None);
        }

        match fetched {
            Ok(rates) => {
                state.rates = Some(rates);
                self.recompute(&mut state).map(Some)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn begin_fetch(&self, state: &mut State, base: CurrencyCode) -> FetchTicket {
        let ticket = state.issue(base);
        tracing::debug!(base = %ticket.base, seq = ticket.seq, "requesting rates");
        self.publish(ViewState::Loading {
            base: ticket.base.clone(),
        });
        ticket
    }

    fn recompute(&self, state: &mut State) -> Result<ConversionResult, ConvertError> {
        let request = ConversionRequest::new(
            state.selection.amount,
            state.selection.source.clone(),
            state.selection.target.clone(),
        );

        match convert(state.rates.as_ref(), &request) {
            Ok(result) => {
                state.last_result = Some(result.clone());
                self.publish(ViewState::Ready(result.clone()));
                Ok(result)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Publishes `err` as the current failure and hands it back.
    fn fail(&self, err: ConvertError) -> ConvertError {
        tracing::warn!(error = %err, "conversion failed");
        self.publish(ViewState::Failed {
            message: err.to_string(),
            retryable: err.is_retryable(),
        });
        err
    }

    fn publish(&self, view: ViewState) {
        self.view.send_replace(view);
    }
}
