use error_stack::{report, Result, ResultExt};
use tracing::instrument;

use crate::domain::{PriceOrigin, PriceQuote};
use crate::ports::price_source::{PriceError, PriceSource};

/// Resolves the BTC quote for this run. An assumed price never touches the network.
#[instrument(skip(source))]
pub async fn get_price(
    source: &dyn PriceSource,
    assume_price: Option<f64>,
) -> Result<PriceQuote, PriceError> {
    let (usd, origin) = match assume_price {
        Some(usd) => (usd, PriceOrigin::Assumed),
        None => {
            let usd = source
                .fetch_usd_price()
                .await
                .attach_printable_lazy(|| format!("Price source: {}", source.name()))?;
            (usd, PriceOrigin::Live)
        }
    };

    if !usd.is_finite() || usd <= 0.0 {
        return Err(report!(PriceError::InvalidPrice(usd)));
    }

    Ok(PriceQuote::from_usd(usd, origin))
}
