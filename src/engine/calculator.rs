use crate::domain::{Decimal, OperationKind, TaxCategory, TaxSettings, TradingPair, WalletId};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxComputationRequest {
    pub wallet_id: WalletId,
    pub operation: OperationKind,
    pub gross_amount: Decimal,
    /// Required for the trading family, ignored for staking.
    pub trading_pair: Option<TradingPair>,
}

/// Why a request was let through untaxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExemptReason {
    TaxDisabled,
    WalletExempt,
    PairNotTaxed,
}

impl ExemptReason {
    /// Human readable reason as shown to the dashboard.
    pub fn message(&self, category: TaxCategory) -> &'static str {
        match (self, category) {
            (ExemptReason::TaxDisabled, TaxCategory::Trading) => "Tax collection disabled",
            (ExemptReason::TaxDisabled, TaxCategory::Staking) => "Staking tax collection disabled",
            (ExemptReason::WalletExempt, TaxCategory::Trading) => "Wallet is tax-exempt",
            (ExemptReason::WalletExempt, TaxCategory::Staking) => "Wallet is tax-exempt for staking",
            (ExemptReason::PairNotTaxed, _) => "Trading pair not subject to tax",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxComputationResult {
    pub gross_amount: Decimal,
    pub tax_amount: Decimal,
    pub net_amount: Decimal,
    pub applied_rate: Decimal,
    pub exempt_reason: Option<ExemptReason>,
}

impl TaxComputationResult {
    fn exempt(gross_amount: Decimal, reason: ExemptReason) -> Self {
        Self {
            gross_amount,
            tax_amount: Decimal::ZERO,
            net_amount: gross_amount,
            applied_rate: Decimal::ZERO,
            exempt_reason: Some(reason),
        }
    }

    pub fn is_exempt(&self) -> bool {
        self.exempt_reason.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRequest {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,
    /// Named after the request field carrying the amount.
    #[error("{0} is too large")]
    AmountOutOfRange(&'static str),
    #[error("Operation {operation} is not a {category} operation")]
    OperationMismatch {
        operation: OperationKind,
        category: TaxCategory,
    },
}

/// Stateless tax computation.
pub struct TaxCalculator;

impl TaxCalculator {
    /// Compute the tax outcome of one request under `settings`.
    ///
    /// Exemptions are checked in order (disabled, wallet, trading pair) and
    /// short-circuit. Otherwise the rate from the `category` namespace is
    /// applied and the result clamped into
    /// `[minimum_tax_amount, maximum_tax_amount]`. The net amount is not
    /// floored, so a minimum above the gross amount yields a negative net.
    pub fn compute(
        request: &TaxComputationRequest,
        settings: &TaxSettings,
        category: TaxCategory,
    ) -> Result<TaxComputationResult, InvalidRequest> {
        Self::validate(request, category)?;
        let gross = request.gross_amount;

        if !settings.is_enabled {
            return Ok(TaxComputationResult::exempt(gross, ExemptReason::TaxDisabled));
        }
        if settings.is_wallet_exempt(&request.wallet_id) {
            return Ok(TaxComputationResult::exempt(gross, ExemptReason::WalletExempt));
        }
        if category == TaxCategory::Trading {
            let taxed = request
                .trading_pair
                .as_ref()
                .is_some_and(|pair| settings.is_pair_taxed(pair));
            if !taxed {
                return Ok(TaxComputationResult::exempt(gross, ExemptReason::PairNotTaxed));
            }
        }

        let rate = settings
            .rate_for(category, request.operation)
            .ok_or(InvalidRequest::OperationMismatch {
                operation: request.operation,
                category,
            })?;

        let out_of_range = || {
            InvalidRequest::AmountOutOfRange(match category {
                TaxCategory::Trading => "swapAmount",
                TaxCategory::Staking => "amount",
            })
        };
        let raw_tax = gross.percent(rate).ok_or_else(out_of_range)?;
        let tax_amount =
            raw_tax.clamp_between(settings.minimum_tax_amount, settings.maximum_tax_amount);
        let net_amount = gross.checked_sub(tax_amount).ok_or_else(out_of_range)?;

        Ok(TaxComputationResult {
            gross_amount: gross,
            tax_amount,
            net_amount,
            applied_rate: rate,
            exempt_reason: None,
        })
    }

    fn validate(request: &TaxComputationRequest, category: TaxCategory) -> Result<(), InvalidRequest> {
        if request.wallet_id.as_str().trim().is_empty() {
            return Err(InvalidRequest::MissingField("walletId"));
        }
        if !request.gross_amount.is_positive() {
            return Err(InvalidRequest::NonPositiveAmount);
        }
        if request.operation.category() != category {
            return Err(InvalidRequest::OperationMismatch {
                operation: request.operation,
                category,
            });
        }
        if category == TaxCategory::Trading
            && request
                .trading_pair
                .as_ref()
                .map_or(true, |p| p.as_str().trim().is_empty())
        {
            return Err(InvalidRequest::MissingField("tradingPair"));
        }
        Ok(())
    }
}
