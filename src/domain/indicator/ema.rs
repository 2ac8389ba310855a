//! Exponential moving average of close.
//!
//! Decay weight 2/(span+1). The recursion runs from the first bar with no
//! special-case seeding; the output stays undefined until `span` bars have
//! been seen.

use crate::domain::bar::Bar;
use crate::domain::indicator::rolling::ewm;

pub fn calc_ema(bars: &[Bar], span: usize) -> Vec<Option<f64>> {
    let closes: Vec<Option<f64>> = bars.iter().map(|b| Some(b.close)).collect();
    ewm(&closes, span)
}
