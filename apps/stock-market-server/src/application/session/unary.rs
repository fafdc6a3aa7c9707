//! Unary price lookup.

use tracing::debug;

use super::CallContext;
use crate::application::services::PriceService;
use crate::domain::error::ServiceError;
use crate::domain::quote::PriceQuote;

/// Compute one quote for `symbol`.
///
/// # Errors
///
/// Returns `Cancelled` if the call was cancelled before the lookup, or the
/// pre-condition failure reported by the price service.
pub fn quote_once(
    ctx: &CallContext,
    prices: &PriceService,
    symbol: &str,
) -> Result<PriceQuote, ServiceError> {
    if ctx.is_cancelled() {
        return Err(ServiceError::cancelled("Call cancelled by the client."));
    }

    let quote = prices.quote(symbol)?;
    debug!(trace_id = ctx.trace_id(), symbol, "Unary quote computed");
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockPriceSource;
    use crate::application::session::CallKind;
    use crate::domain::error::ErrorKind;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn service() -> PriceService {
        let mut source = MockPriceSource::new();
        source
            .expect_price_for()
            .returning(|_| Decimal::new(9_999, 2));
        PriceService::new(Arc::new(source))
    }

    #[test]
    fn test_quote_once_returns_quote() {
        let ctx = CallContext::new("GetStockPrice", CallKind::Unary, "t");
        let quote = quote_once(&ctx, &service(), "MGLU3").unwrap();
        assert_eq!(quote.symbol, "MGLU3");
        assert_eq!(quote.price, Decimal::new(9_999, 2));
    }

    #[test]
    fn test_quote_once_after_cancel() {
        let ctx = CallContext::new("GetStockPrice", CallKind::Unary, "t");
        ctx.cancel();
        let error = quote_once(&ctx, &service(), "MGLU3").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn test_quote_once_surfaces_injected_fault() {
        let ctx = CallContext::new("GetStockPrice", CallKind::Unary, "t");
        let prices = service().with_fault_injection(true);
        let error = quote_once(&ctx, &prices, "MGLU3").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
    }
}
