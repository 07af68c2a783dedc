//! Age band selection.

use crate::models::AgeBand;

/// First band in list order whose inclusive age interval contains `age_in_months`.
///
/// On overlapping bands the earlier entry wins.
pub fn select_band(bands: &[AgeBand], age_in_months: u32) -> Option<&AgeBand> {
    bands.iter().find(|band| band.contains(age_in_months))
}
