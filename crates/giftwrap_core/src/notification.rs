//! Notification state and banner projection.

use serde::Serialize;

/// Advisory outcome of one observation window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationState {
    #[default]
    None,
    /// The selected delivery method differs from the baseline.
    DeliveryMethodChanged,
    /// The special carrier became selectable after deselecting the gift.
    AlternateCarrierAvailable,
}

impl NotificationState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DeliveryMethodChanged => "delivery_method_changed",
            Self::AlternateCarrierAvailable => "alternate_carrier_available",
        }
    }
}

/// Banner kinds the block can show. At most one is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Banner {
    DeliveryMethodChanged,
    AlternateCarrierAvailable,
}

/// Maps notification state to the banner to show, if any.
pub fn present(state: NotificationState) -> Option<Banner> {
    match state {
        NotificationState::None => None,
        NotificationState::DeliveryMethodChanged => Some(Banner::DeliveryMethodChanged),
        NotificationState::AlternateCarrierAvailable => Some(Banner::AlternateCarrierAvailable),
    }
}

#[cfg(test)]
mod tests {
    use super::{present, Banner, NotificationState};

    #[test]
    fn maps_each_state_to_one_banner() {
        assert_eq!(present(NotificationState::None), None);
        assert_eq!(
            present(NotificationState::DeliveryMethodChanged),
            Some(Banner::DeliveryMethodChanged)
        );
        assert_eq!(
            present(NotificationState::AlternateCarrierAvailable),
            Some(Banner::AlternateCarrierAvailable)
        );
    }
}
