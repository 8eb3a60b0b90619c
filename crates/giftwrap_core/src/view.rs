//! Renderable block model.
//!
//! # Responsibility
//! - Describe the checkbox, its two explanatory notes and the optional banner.
//! - Keep storefront copy in one place so hosts can localize it.
//!
//! # Invariants
//! - A block carries zero or one banner.
//! - Rendering is pure; it never touches controller state.

use crate::notification::{present, Banner, NotificationState};
use serde::Serialize;

/// Storefront copy for the gift option block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockCopy {
    pub checkbox_label: String,
    pub notes: [String; 2],
    pub delivery_method_changed_title: String,
    pub alternate_carrier_available_title: String,
}

impl Default for BlockCopy {
    fn default() -> Self {
        Self {
            checkbox_label: "ラッピングを希望する(+250円)".to_string(),
            notes: [
                "※すべてまとめてラッピングいたします。ラッピングの色は指定できません".to_string(),
                "※ネコポスで配送の場合、ラッピング対応できかねますのでご了承ください。"
                    .to_string(),
            ],
            delivery_method_changed_title: "配送方法が変更されました".to_string(),
            alternate_carrier_available_title: "ネコポスが選択できるようになりました".to_string(),
        }
    }
}

impl BlockCopy {
    pub fn banner_title(&self, banner: Banner) -> &str {
        match banner {
            Banner::DeliveryMethodChanged => &self.delivery_method_changed_title,
            Banner::AlternateCarrierAvailable => &self.alternate_carrier_available_title,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BannerStatus {
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerView {
    pub kind: Banner,
    pub status: BannerStatus,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckboxView {
    pub checked: bool,
    pub label: String,
}

/// One render of the gift option block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GiftOptionBlock {
    pub checkbox: CheckboxView,
    pub notes: Vec<String>,
    pub banner: Option<BannerView>,
}

/// Builds the block for the given mirrored selection and notification.
pub fn render_block(
    selected: bool,
    notification: NotificationState,
    copy: &BlockCopy,
) -> GiftOptionBlock {
    GiftOptionBlock {
        checkbox: CheckboxView {
            checked: selected,
            label: copy.checkbox_label.clone(),
        },
        notes: copy.notes.to_vec(),
        banner: present(notification).map(|kind| BannerView {
            kind,
            status: BannerStatus::Info,
            title: copy.banner_title(kind).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{render_block, BlockCopy};
    use crate::notification::{Banner, NotificationState};

    #[test]
    fn renders_no_banner_for_none() {
        let block = render_block(true, NotificationState::None, &BlockCopy::default());
        assert!(block.checkbox.checked);
        assert_eq!(block.notes.len(), 2);
        assert!(block.banner.is_none());
    }

    #[test]
    fn renders_carrier_banner_with_copy_title() {
        let copy = BlockCopy::default();
        let block = render_block(false, NotificationState::AlternateCarrierAvailable, &copy);
        let banner = block.banner.expect("banner should render");
        assert_eq!(banner.kind, Banner::AlternateCarrierAvailable);
        assert_eq!(banner.title, copy.alternate_carrier_available_title);
    }
}
