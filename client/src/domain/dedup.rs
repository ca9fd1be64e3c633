//! Guard against subscribing twice to the same publication.

use super::{PublicationId, Subscription};

/// Label shown on an enabled subscribe control.
pub const SUBSCRIBE_LABEL: &str = "Subscribe";
/// Label shown when the customer already holds the subscription.
pub const ALREADY_SUBSCRIBED_LABEL: &str = "Already Subscribed";

/// Whether `publication` appears in `subscriptions`.
///
/// # Examples
/// ```
/// use signup_client::domain::{PublicationId, Subscription, is_subscribed};
///
/// let p1 = PublicationId::new("p1").expect("valid id");
/// let p2 = PublicationId::new("p2").expect("valid id");
/// let held = [Subscription::new(p1.clone(), "Asha")];
///
/// assert!(is_subscribed(&p1, &held));
/// assert!(!is_subscribed(&p2, &held));
/// ```
#[must_use]
pub fn is_subscribed(publication: &PublicationId, subscriptions: &[Subscription]) -> bool {
    subscriptions
        .iter()
        .any(|subscription| &subscription.publication == publication)
}

/// Rendering state of a publication's subscribe control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscribeControl {
    /// Whether the control accepts a click.
    pub enabled: bool,
    /// Text on the control.
    pub label: &'static str,
}

impl SubscribeControl {
    /// Control state for `publication` given the current subscribed set.
    #[must_use]
    pub fn for_publication(publication: &PublicationId, subscriptions: &[Subscription]) -> Self {
        if is_subscribed(publication, subscriptions) {
            Self {
                enabled: false,
                label: ALREADY_SUBSCRIBED_LABEL,
            }
        } else {
            Self {
                enabled: true,
                label: SUBSCRIBE_LABEL,
            }
        }
    }
}
