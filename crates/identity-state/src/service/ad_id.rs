use super::core::IdentityService;
use crate::domain::properties::is_valid_ad_id;
use crate::domain::IdentityError;
use crate::events::{AdIdOutcome, ConsentChange};
use tracing::debug;

/// Both the empty string and the all-zero sentinel mean "no identifier";
/// normalize them to empty for comparison.
fn normalized(ad_id: &str) -> &str {
    if is_valid_ad_id(ad_id) {
        ad_id
    } else {
        ""
    }
}

impl IdentityService {
    /// Main entrypoint for advertising identifier changes.
    ///
    /// - The empty string and the all-zero sentinel both count as "no
    ///   identifier" and compare equal to an absent stored value, so sending
    ///   the sentinel twice is a full no-op.
    /// - A consent signal fires only when validity transitions
    ///   (absent→valid or valid→absent); replacing one valid ad ID with a
    ///   different valid one persists and publishes but does not signal.
    pub fn update_advertising_identifier(
        &mut self,
        new_ad_id: &str,
    ) -> Result<AdIdOutcome, IdentityError> {
        let current = self.properties.ad_id().unwrap_or("");
        let incoming = normalized(new_ad_id);

        if current == incoming {
            return Ok(AdIdOutcome::Unchanged);
        }

        let consent = if incoming.is_empty() {
            Some(ConsentChange::Denied)
        } else if current.is_empty() {
            Some(ConsentChange::Granted)
        } else {
            None
        };

        let mut staged = self.properties.clone();
        staged.set_ad_id(new_ad_id);

        self.store.save(&staged)?;
        self.properties = staged;
        debug!(consent = ?consent, "Advertising identifier updated");

        Ok(AdIdOutcome::Updated {
            snapshot: self.properties.to_xdm_map(),
            consent,
        })
    }
}
